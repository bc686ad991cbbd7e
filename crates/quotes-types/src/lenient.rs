//! Forgiving decoders for numbers typed into the plugin's settings tab
//!
//! The plugin stores `parseInt` results, so a bad entry lands in `data.json`
//! as `null` (from `NaN`), and hand edits can leave negatives or fractions.
//! These helpers keep one bad number from rejecting the whole document.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Other(IgnoredAny),
}

/// Non-negative integer, or `None` for null, negative, non-finite or non-numeric values.
/// Fractions are truncated.
pub fn optional_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Number::deserialize(deserializer)? {
        Number::Unsigned(n) => Some(n),
        Number::Float(f) if f.is_finite() && f >= 0.0 && f < u64::MAX as f64 => Some(f.trunc() as u64),
        Number::Signed(_) | Number::Float(_) | Number::Other(_) => None,
    })
}

/// Epoch seconds; anything unreadable becomes 0, which reads as long expired.
pub fn epoch_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Number::deserialize(deserializer)? {
        Number::Unsigned(n) => i64::try_from(n).unwrap_or(i64::MAX),
        Number::Signed(n) => n,
        Number::Float(f) if f.is_finite() => f.trunc() as i64,
        Number::Float(_) | Number::Other(_) => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "optional_u64")]
        refresh: Option<u64>,
        #[serde(default, deserialize_with = "epoch_secs")]
        at: i64,
    }

    fn decode(raw: &str) -> (Option<u64>, i64) {
        let value: Sample = serde_json::from_str(raw).unwrap();
        (value.refresh, value.at)
    }

    #[test]
    fn test_bad_numbers_degrade() {
        assert_eq!(decode(r#"{"refresh": 60, "at": 1700000000}"#), (Some(60), 1_700_000_000));
        assert_eq!(decode(r#"{"refresh": null, "at": null}"#), (None, 0));
        assert_eq!(decode(r#"{"refresh": -1, "at": -5}"#), (None, -5));
        assert_eq!(decode(r#"{"refresh": 1.5, "at": 1700000000.7}"#), (Some(1), 1_700_000_000));
        assert_eq!(decode(r#"{"refresh": "soon", "at": [1]}"#), (None, 0));
        assert_eq!(decode(r#"{}"#), (None, 0));
    }
}
