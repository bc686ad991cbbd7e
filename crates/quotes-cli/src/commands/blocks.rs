//! Stored block state commands

use crate::error::CliResult;
use crate::output::{self, print_success, OneTimeRow, OutputFormat, RecurringRow};
use clap::{Subcommand, ValueEnum};
use quotes_engine::QuoteEngine;
use quotes_store::BlockStore;

/// Which block store a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlockKind {
    Recurring,
    OneTime,
}

/// Blocks subcommands
#[derive(Debug, Subcommand)]
pub enum BlocksCommands {
    /// List stored block state
    List {
        /// Only this kind of block
        kind: Option<BlockKind>,
    },

    /// Delete all stored state of one kind
    Clear {
        kind: BlockKind,
    },
}

/// Execute a blocks command
pub fn execute(command: BlocksCommands, engine: &QuoteEngine, format: OutputFormat) -> CliResult<()> {
    match command {
        BlocksCommands::List { kind } => {
            if kind != Some(BlockKind::OneTime) {
                let rows: Vec<RecurringRow> = engine
                    .settings()
                    .read(|s| s.block_metadata.all().iter().map(RecurringRow::from).collect())?;
                output::print_output(rows, format)?;
            }
            if kind != Some(BlockKind::Recurring) {
                let rows: Vec<OneTimeRow> = engine
                    .settings()
                    .read(|s| s.one_time_blocks.all().iter().map(OneTimeRow::from).collect())?;
                output::print_output(rows, format)?;
            }
            Ok(())
        }

        BlocksCommands::Clear { kind } => {
            let removed = match kind {
                BlockKind::Recurring => engine.clear_recurring()?,
                BlockKind::OneTime => engine.clear_one_time()?,
            };
            print_success(&format!("Removed {} block(s)", removed));
            Ok(())
        }
    }
}
