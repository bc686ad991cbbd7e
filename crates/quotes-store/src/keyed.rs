//! Index-by-key block stores
//!
//! Entries keep their insertion order so listing and persistence see the same
//! ordered array the settings document has always stored; a side index gives
//! O(1) lookup by id or filename.

use quotes_types::{OneTimeBlockState, RecurringBlockState};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// State with a stable identity.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for RecurringBlockState {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for OneTimeBlockState {
    fn key(&self) -> &str {
        self.filename.as_str()
    }
}

/// Store interface the resolvers are written against.
pub trait BlockStore<S: Keyed> {
    fn get(&self, key: &str) -> Option<&S>;

    fn get_mut(&mut self, key: &str) -> Option<&mut S>;

    /// Insert or replace by key. Returns `true` when a new entry was appended.
    fn upsert(&mut self, state: S) -> bool;

    /// Ordered view of every entry.
    fn all(&self) -> &[S];

    /// Drop every entry, returning how many were removed.
    fn clear(&mut self) -> usize;

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered entries plus a key index.
#[derive(Debug, Clone)]
pub struct KeyedStore<S> {
    entries: Vec<S>,
    index: HashMap<String, usize>,
}

impl<S> Default for KeyedStore<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<S: Keyed> KeyedStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered list; the first entry wins on duplicate keys.
    pub fn from_entries(entries: Vec<S>) -> Self {
        let mut store = Self::default();
        for entry in entries {
            if store.index.contains_key(entry.key()) {
                tracing::warn!(key = entry.key(), "dropping duplicate block state");
                continue;
            }
            store.index.insert(entry.key().to_string(), store.entries.len());
            store.entries.push(entry);
        }
        store
    }

    pub fn into_entries(self) -> Vec<S> {
        self.entries
    }
}

impl<S: Keyed> BlockStore<S> for KeyedStore<S> {
    fn get(&self, key: &str) -> Option<&S> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut S> {
        let i = self.index.get(key).copied()?;
        self.entries.get_mut(i)
    }

    fn upsert(&mut self, state: S) -> bool {
        let existing = self.index.get(state.key()).copied();
        match existing {
            Some(i) => {
                self.entries[i] = state;
                false
            }
            None => {
                self.index.insert(state.key().to_string(), self.entries.len());
                self.entries.push(state);
                true
            }
        }
    }

    fn all(&self) -> &[S] {
        &self.entries
    }

    fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.index.clear();
        removed
    }
}

impl<S: Serialize> Serialize for KeyedStore<S> {
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, S: Deserialize<'de> + Keyed> Deserialize<'de> for KeyedStore<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<S>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}
