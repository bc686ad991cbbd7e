//! CLI configuration
//!
//! Layered as defaults, then an optional file, then `QUOTES_*` environment
//! variables (`QUOTES_SETTINGS_PATH`, `QUOTES_LOG_LEVEL`, ...).

use quotes_engine::{EngineOptions, RecurringWeighting};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Settings document (`data.json` of the plugin).
    pub settings_path: PathBuf,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Whether recurring blocks honor `useWeightedRandom`.
    pub recurring_weighting: RecurringWeighting,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("data.json"),
            log_level: "warn".to_string(),
            recurring_weighting: RecurringWeighting::Never,
        }
    }
}

impl CliConfig {
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CliConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Field names contain underscores, so nesting uses a double one.
        builder = builder.add_source(
            config::Environment::with_prefix("QUOTES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            recurring_weighting: self.recurring_weighting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.recurring_weighting, RecurringWeighting::Never);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "settings_path = \"vault/data.json\"\nrecurring_weighting = \"follow_settings\""
        )
        .unwrap();

        let config = CliConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.settings_path, PathBuf::from("vault/data.json"));
        assert_eq!(config.recurring_weighting, RecurringWeighting::FollowSettings);
        assert_eq!(config.engine_options().recurring_weighting, RecurringWeighting::FollowSettings);
    }
}
