//! Output formatting utilities

use crate::error::CliResult;
use colored::*;
use quotes_engine::{BlockResolution, BlockView};
use quotes_types::{fallback, OneTimeBlockState, Quote, RecurringBlockState};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
}

const TEXT_WIDTH: usize = 48;

/// Print a vector of items in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
    }
    Ok(())
}

/// Print a resolved block: the quote itself for tables, the full view for JSON.
pub fn print_block<S: BlockView + Serialize>(
    resolution: &BlockResolution<S>,
    mutated: bool,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            let content = resolution.content();
            if fallback::is_fallback(content) {
                print_warning(&content.text);
            } else {
                println!("{}", content.text.bold());
                println!("  {} {}", "-".dimmed(), content.author.cyan());
            }
            if let Some(id) = resolution.render_id() {
                println!("  {} {}", "id:".dimmed(), id);
            }
            if let Some(class) = resolution.custom_class() {
                println!("  {} {}", "class:".dimmed(), class);
            }
            if mutated {
                print_info("block state updated");
            }
        }
        OutputFormat::Json => {
            let view = serde_json::json!({
                "resolution": resolution,
                "mutated": mutated,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= TEXT_WIDTH {
        return text.to_string();
    }
    let head: String = text.chars().take(TEXT_WIDTH - 1).collect();
    format!("{}…", head)
}

fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Table row for recurring block state
#[derive(Debug, Serialize, Tabled)]
pub struct RecurringRow {
    id: String,
    search: String,
    author: String,
    text: String,
    class: String,
    refresh: String,
    updated: String,
}

impl From<&RecurringBlockState> for RecurringRow {
    fn from(state: &RecurringBlockState) -> Self {
        Self {
            id: state.id.to_string(),
            search: state.search.clone(),
            author: state.content.author.clone(),
            text: truncate(&state.content.text),
            class: or_dash(state.custom_class.as_deref()),
            refresh: state
                .refresh
                .map(|secs| format!("{}s", secs))
                .unwrap_or_else(|| "default".to_string()),
            updated: format_timestamp(state.last_update),
        }
    }
}

/// Table row for one-time block state
#[derive(Debug, Serialize, Tabled)]
pub struct OneTimeRow {
    filename: String,
    search: String,
    author: String,
    text: String,
    class: String,
}

impl From<&OneTimeBlockState> for OneTimeRow {
    fn from(state: &OneTimeBlockState) -> Self {
        Self {
            filename: state.filename.to_string(),
            search: state.search.clone(),
            author: state.content.author.clone(),
            text: truncate(&state.content.text),
            class: or_dash(state.custom_class.as_deref()),
        }
    }
}

/// Table row for a vault entry
#[derive(Debug, Serialize, Tabled)]
pub struct QuoteRow {
    author: String,
    text: String,
    tags: String,
}

impl From<&Quote> for QuoteRow {
    fn from(quote: &Quote) -> Self {
        Self {
            author: quote.author.clone(),
            text: truncate(&quote.text),
            tags: quote
                .tags
                .iter()
                .map(|t| format!("#{}", t.trim_start_matches('#')))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}
