//! Local Quotes CLI
//!
//! Works directly on a plugin settings document (`data.json`):
//! - Resolve recurring and one-time blocks
//! - Inspect and clear stored block state
//! - List and extend the quote vault
//! - Generate ids for new recurring blocks

use clap::{Parser, Subcommand};
use quotes_engine::QuoteEngine;
use quotes_store::{JsonFilePersistence, SettingsHandle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{blocks, resolve, vault};
use config::CliConfig;
use error::{CliError, CliResult};

/// Local Quotes CLI application
#[derive(Debug, Parser)]
#[command(name = "quotes")]
#[command(about = "Local Quotes - cached quote blocks from a curated vault", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QUOTES_CONFIG")]
    config: Option<String>,

    /// Settings document, overrides the configured path
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Seed the random source for reproducible picks
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a block
    Resolve {
        #[command(subcommand)]
        command: resolve::ResolveCommands,
    },

    /// Stored block state
    Blocks {
        #[command(subcommand)]
        command: blocks::BlocksCommands,
    },

    /// Quote vault
    Vault {
        #[command(subcommand)]
        command: vault::VaultCommands,
    },

    /// Generate an id for a new recurring block
    Id,

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let settings_path = cli.settings.clone().unwrap_or_else(|| config.settings_path.clone());

    if let Commands::Config = cli.command {
        println!("Settings: {}", settings_path.display());
        println!("Config: {:?}", config);
        return Ok(());
    }

    let persistence = Arc::new(JsonFilePersistence::new(&settings_path));
    let handle = Arc::new(SettingsHandle::load(persistence).await?);
    let mut engine = QuoteEngine::new(handle).with_options(config.engine_options());
    if let Some(seed) = cli.seed {
        engine = engine.with_rng(StdRng::seed_from_u64(seed));
    }

    let result = run(cli.command, &engine, cli.output);

    if let Err(err) = engine.flush().await {
        tracing::warn!(error = %err, path = %settings_path.display(), "failed to save settings");
        return result.and(Err(CliError::Storage(err)));
    }
    result
}

fn run(command: Commands, engine: &QuoteEngine, format: output::OutputFormat) -> CliResult<()> {
    match command {
        Commands::Resolve { command } => resolve::execute(command, engine, format),
        Commands::Blocks { command } => blocks::execute(command, engine, format),
        Commands::Vault { command } => vault::execute(command, engine, format),
        Commands::Id => {
            println!("{}", engine.generate_block_id()?);
            Ok(())
        }
        Commands::Config => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotes_store::{BlockStore, InMemoryPersistence, QuoteSettings};
    use quotes_types::Quote;

    fn engine() -> QuoteEngine {
        let mut settings = QuoteSettings::default();
        settings.template_folder = "Templates/".to_string();
        settings.quote_vault = vec![Quote::new("Seneca", "Begin at once to live.").with_tag("stoic")];
        let handle = Arc::new(SettingsHandle::new(settings, Arc::new(InMemoryPersistence::new())));
        QuoteEngine::new(handle).with_rng(StdRng::seed_from_u64(1))
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("quotes").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_resolve_recurring() {
        let cli = parse(&["resolve", "recurring", "--id", "q1", "--search", "#stoic", "--refresh", "60"]);
        match cli.command {
            Commands::Resolve {
                command: resolve::ResolveCommands::Recurring { id, refresh, .. },
            } => {
                assert_eq!(id.as_deref(), Some("q1"));
                assert_eq!(refresh, Some(60));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_block_kinds() {
        let cli = parse(&["blocks", "clear", "one-time"]);
        assert!(matches!(
            cli.command,
            Commands::Blocks {
                command: blocks::BlocksCommands::Clear {
                    kind: blocks::BlockKind::OneTime
                }
            }
        ));
        assert!(Cli::try_parse_from(["quotes", "blocks", "clear"]).is_err());
    }

    #[test]
    fn test_run_resolves_and_clears() {
        let engine = engine();
        let format = output::OutputFormat::Json;

        run(parse(&["resolve", "recurring", "--id", "q1", "--search", "*"]).command, &engine, format).unwrap();
        run(parse(&["resolve", "once", "--path", "Daily/a.md", "--search", "#stoic"]).command, &engine, format).unwrap();
        run(parse(&["resolve", "once", "--path", "Templates/a.md", "--search", "#stoic"]).command, &engine, format).unwrap();
        let (recurring, one_time) = engine
            .settings()
            .read(|s| (s.block_metadata.len(), s.one_time_blocks.len()))
            .unwrap();
        assert_eq!((recurring, one_time), (1, 1));

        run(parse(&["blocks", "clear", "recurring"]).command, &engine, format).unwrap();
        assert_eq!(engine.settings().read(|s| s.block_metadata.len()).unwrap(), 0);
    }

    #[test]
    fn test_vault_add_validates_input() {
        let engine = engine();
        let format = output::OutputFormat::Table;

        let err = run(parse(&["vault", "add", "--author", " ", "--text", "x"]).command, &engine, format).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));

        run(
            parse(&["vault", "add", "--author", "Basho", "--text", "The journey itself is home.", "--tag", "travel"]).command,
            &engine,
            format,
        )
        .unwrap();
        assert_eq!(engine.settings().read(|s| s.quote_vault.len()).unwrap(), 2);

        let err = run(parse(&["vault", "list", "--search", "(#travel"]).command, &engine, format).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_settings_survive_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let persistence = Arc::new(JsonFilePersistence::new(&path));
        let engine = QuoteEngine::new(Arc::new(SettingsHandle::load(persistence.clone()).await.unwrap()));
        run(parse(&["vault", "add", "--author", "Seneca", "--text", "Begin at once to live."]).command, &engine, output::OutputFormat::Json).unwrap();
        run(parse(&["resolve", "recurring", "--id", "q1", "--search", "Seneca"]).command, &engine, output::OutputFormat::Json).unwrap();
        assert!(engine.flush().await.unwrap());

        let reloaded = SettingsHandle::load(persistence).await.unwrap();
        let stored = reloaded.snapshot().unwrap();
        assert_eq!(stored.quote_vault.len(), 1);
        assert_eq!(stored.block_metadata.all()[0].content.author, "Seneca");
    }
}
