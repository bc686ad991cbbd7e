//! Quote vault commands

use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, OutputFormat, QuoteRow};
use clap::Subcommand;
use quotes_engine::QuoteEngine;
use quotes_select::SearchExpr;
use quotes_types::Quote;

/// Vault subcommands
#[derive(Debug, Subcommand)]
pub enum VaultCommands {
    /// List vault quotes
    List {
        /// Only quotes matching this search expression
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a quote to the vault
    Add {
        #[arg(short, long)]
        author: String,

        #[arg(short, long)]
        text: String,

        /// Tag, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

/// Execute a vault command
pub fn execute(command: VaultCommands, engine: &QuoteEngine, format: OutputFormat) -> CliResult<()> {
    match command {
        VaultCommands::List { search } => {
            let expr = match search.as_deref() {
                Some(search) => SearchExpr::parse(search)
                    .map_err(|e| CliError::InvalidInput(format!("search `{}`: {}", search, e)))?,
                None => SearchExpr::All,
            };
            let rows: Vec<QuoteRow> = engine.settings().read(|s| {
                s.quote_vault
                    .iter()
                    .filter(|q| expr.matches(q))
                    .map(QuoteRow::from)
                    .collect()
            })?;
            output::print_output(rows, format)
        }

        VaultCommands::Add { author, text, tags } => {
            if author.trim().is_empty() || text.trim().is_empty() {
                return Err(CliError::InvalidInput("author and text must not be empty".to_string()));
            }
            let size = engine.add_quote(Quote::new(author, text).with_tags(tags))?;
            print_success(&format!("Added quote, vault now holds {}", size));
            Ok(())
        }
    }
}
