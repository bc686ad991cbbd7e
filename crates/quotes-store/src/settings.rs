//! The durable settings document
//!
//! Field names follow the plugin's `data.json` so an existing file loads
//! as-is; anything missing or unreadable falls back to [`QuoteSettings::default`].

use crate::keyed::KeyedStore;
use quotes_types::{lenient, OneTimeBlockState, Quote, RecurringBlockState, SECONDS_IN_DAY};
use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_MINIMAL_QUOTE_LENGTH: usize = 5;
const DEFAULT_ID_LENGTH: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSettings {
    /// TTL in seconds for recurring blocks without their own `refresh`.
    #[serde(deserialize_with = "reload_interval")]
    pub default_reload_interval: u64,

    /// Draw quotes with author-weighted tickets instead of uniformly.
    pub use_weighted_random: bool,

    /// Path prefix of the template folder; empty means unset.
    pub template_folder: String,

    /// Quotes with fewer characters are never selected.
    #[serde(deserialize_with = "minimal_quote_length")]
    pub minimal_quote_length: usize,

    /// Length of generated block ids.
    #[serde(deserialize_with = "auto_generated_id_length")]
    pub auto_generated_id_length: usize,

    pub quote_vault: Vec<Quote>,

    pub block_metadata: KeyedStore<RecurringBlockState>,

    pub one_time_blocks: KeyedStore<OneTimeBlockState>,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            default_reload_interval: SECONDS_IN_DAY,
            use_weighted_random: false,
            template_folder: String::new(),
            minimal_quote_length: DEFAULT_MINIMAL_QUOTE_LENGTH,
            auto_generated_id_length: DEFAULT_ID_LENGTH,
            quote_vault: Vec::new(),
            block_metadata: KeyedStore::default(),
            one_time_blocks: KeyedStore::default(),
        }
    }
}

impl QuoteSettings {
    /// Configured template folder, if any.
    pub fn template_folder(&self) -> Option<&str> {
        let folder = self.template_folder.trim();
        if folder.is_empty() {
            None
        } else {
            Some(folder)
        }
    }
}

fn reload_interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(lenient::optional_u64(deserializer)?.unwrap_or(SECONDS_IN_DAY))
}

fn minimal_quote_length<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    Ok(lenient::optional_u64(deserializer)?
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_MINIMAL_QUOTE_LENGTH))
}

fn auto_generated_id_length<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    Ok(lenient::optional_u64(deserializer)?
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_ID_LENGTH))
}
