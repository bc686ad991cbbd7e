//! Persisted block state
//!
//! Both kinds serialize in camelCase so a settings document written by the
//! plugin (`blockMetadata` / `oneTimeBlocks`) loads unchanged.

use crate::ids::{BlockId, FileName};
use crate::quote::QuoteContent;
use serde::{Deserialize, Serialize};

/// Cached answer for a recurring block, refreshed once its TTL elapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringBlockState {
    pub id: BlockId,
    pub search: String,
    pub content: QuoteContent,
    #[serde(default)]
    pub custom_class: Option<String>,
    /// Per-block TTL in seconds, overriding the global default.
    #[serde(default, deserialize_with = "crate::lenient::optional_u64")]
    pub refresh: Option<u64>,
    /// Epoch seconds of the last successful resolution.
    #[serde(deserialize_with = "crate::lenient::epoch_secs")]
    pub last_update: i64,
}

impl RecurringBlockState {
    /// TTL in effect for this block.
    pub fn effective_ttl(&self, default_ttl: u64) -> u64 {
        self.refresh.unwrap_or(default_ttl)
    }

    /// True once `last_update + ttl` lies strictly before `now`.
    pub fn is_expired(&self, default_ttl: u64, now: i64) -> bool {
        let ttl = i64::try_from(self.effective_ttl(default_ttl)).unwrap_or(i64::MAX);
        self.last_update.saturating_add(ttl) < now
    }
}

/// Answer pinned to one hosting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeBlockState {
    pub filename: FileName,
    pub search: String,
    pub content: QuoteContent,
    #[serde(default)]
    pub custom_class: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(refresh: Option<u64>, last_update: i64) -> RecurringBlockState {
        RecurringBlockState {
            id: BlockId::new("q1"),
            search: "stoic".to_string(),
            content: QuoteContent::new("Seneca", "We suffer more in imagination than in reality."),
            custom_class: None,
            refresh,
            last_update,
        }
    }

    #[test]
    fn test_block_ttl_falls_back_to_default() {
        assert_eq!(state(None, 0).effective_ttl(300), 300);
        assert_eq!(state(Some(60), 0).effective_ttl(300), 60);
    }

    #[test]
    fn test_expiry_is_strict() {
        let s = state(Some(100), 1_000);
        assert!(!s.is_expired(0, 1_099));
        assert!(!s.is_expired(0, 1_100));
        assert!(s.is_expired(0, 1_101));
    }

    #[test]
    fn test_huge_ttl_never_overflows() {
        let s = state(Some(u64::MAX), 1_000);
        assert!(!s.is_expired(0, i64::MAX));
    }

    #[test]
    fn test_hand_edited_numbers_load() {
        let raw = r#"{
            "id": "q1",
            "search": "stoic",
            "content": {"author": "Seneca", "text": "Begin at once to live."},
            "refresh": -1,
            "lastUpdate": 1700000000.25
        }"#;
        let state: RecurringBlockState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.refresh, None);
        assert_eq!(state.last_update, 1_700_000_000);
    }

    #[test]
    fn test_recurring_state_wire_format() {
        let json = serde_json::to_value(state(Some(60), 42)).unwrap();
        assert_eq!(json["lastUpdate"], 42);
        assert_eq!(json["customClass"], serde_json::Value::Null);
        assert_eq!(json["content"]["author"], "Seneca");
    }

    #[test]
    fn test_one_time_state_reads_plugin_layout() {
        let raw = r#"{
            "filename": "2024-03-01.md",
            "search": "stoic",
            "content": {"author": "Marcus Aurelius", "text": "Waste no more time."},
            "customClass": "wide"
        }"#;
        let state: OneTimeBlockState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.filename.as_str(), "2024-03-01.md");
        assert_eq!(state.custom_class.as_deref(), Some("wide"));
    }
}
