//! Already-parsed block declarations
//!
//! The source syntax of a block belongs to the host; absent fields simply
//! decode to `None`.

use crate::ids::BlockId;
use serde::{Deserialize, Serialize};

/// Declaration of a recurring block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDescriptor {
    #[serde(default)]
    pub id: Option<BlockId>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub custom_class: Option<String>,
    #[serde(default)]
    pub refresh: Option<u64>,
}

impl RecurringDescriptor {
    pub fn new(id: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            id: Some(BlockId::new(id)),
            search: Some(search.into()),
            ..Default::default()
        }
    }

    pub fn with_custom_class(mut self, class: impl Into<String>) -> Self {
        self.custom_class = Some(class.into());
        self
    }

    pub fn with_refresh(mut self, seconds: u64) -> Self {
        self.refresh = Some(seconds);
        self
    }

    /// Id when present and non-blank.
    pub fn id(&self) -> Option<&BlockId> {
        self.id.as_ref().filter(|id| !id.as_str().trim().is_empty())
    }

    /// Search expression when present and non-blank.
    pub fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }
}

/// Declaration of a one-time block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeDescriptor {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub custom_class: Option<String>,
}

impl OneTimeDescriptor {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            custom_class: None,
        }
    }

    pub fn with_custom_class(mut self, class: impl Into<String>) -> Self {
        self.custom_class = Some(class.into());
        self
    }

    pub fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
