//! Block resolution commands

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Subcommand;
use quotes_engine::QuoteEngine;
use quotes_types::{BlockId, OneTimeDescriptor, RecurringDescriptor};

/// Resolve subcommands
#[derive(Debug, Subcommand)]
pub enum ResolveCommands {
    /// Resolve a recurring block by id
    Recurring {
        /// Block id
        #[arg(long)]
        id: Option<String>,

        /// Search expression
        #[arg(short, long)]
        search: Option<String>,

        /// Seconds before the block draws a new quote
        #[arg(short, long)]
        refresh: Option<u64>,

        /// Custom CSS class
        #[arg(long = "class")]
        custom_class: Option<String>,
    },

    /// Resolve a one-time block inside a document
    #[command(alias = "one-time")]
    Once {
        /// Path of the hosting document
        #[arg(short, long)]
        path: String,

        /// Search expression
        #[arg(short, long)]
        search: Option<String>,

        /// Custom CSS class
        #[arg(long = "class")]
        custom_class: Option<String>,
    },
}

/// Execute a resolve command
pub fn execute(command: ResolveCommands, engine: &QuoteEngine, format: OutputFormat) -> CliResult<()> {
    match command {
        ResolveCommands::Recurring {
            id,
            search,
            refresh,
            custom_class,
        } => {
            let descriptor = RecurringDescriptor {
                id: id.map(BlockId::new),
                search,
                custom_class,
                refresh,
            };
            let outcome = engine.resolve_recurring(&descriptor)?;
            output::print_block(&outcome.resolution, outcome.mutated, format)
        }

        ResolveCommands::Once {
            path,
            search,
            custom_class,
        } => {
            let descriptor = OneTimeDescriptor { search, custom_class };
            let outcome = engine.resolve_one_time(&descriptor, &path)?;
            output::print_block(&outcome.resolution, outcome.mutated, format)
        }
    }
}
