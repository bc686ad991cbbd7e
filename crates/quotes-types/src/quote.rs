//! Vault entries and resolved content

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single quote in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Quote {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Case-insensitive tag membership; a leading `#` on either side is ignored.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        self.tags.iter().any(|t| normalize_tag(t) == wanted)
    }

    /// Number of characters in the quote text.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn content(&self) -> QuoteContent {
        QuoteContent::new(self.author.clone(), self.text.clone())
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').to_lowercase()
}

/// Resolved `{author, text}` pair, the only thing rendering consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteContent {
    pub author: String,
    pub text: String,
    /// Set on diagnostic content, never on a drawn quote.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub diagnostic: bool,
}

impl QuoteContent {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            diagnostic: false,
        }
    }

    pub(crate) fn diagnostic(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            diagnostic: true,
            ..Self::new(author, text)
        }
    }
}
