//! Local Quotes storage.
//!
//! This crate owns everything that outlives a single resolution:
//! - keyed block stores for recurring and one-time blocks
//! - the durable settings document that bundles both stores with the vault
//! - the persistence seam (`SettingsPersistence`) and its JSON file adapter
//! - dirty tracking and the flush policy that decouples resolution from disk I/O
//!
//! Design stance:
//! - Resolvers see a narrow `BlockStore` interface, never the whole document.
//! - Saving is the persistence side's job; mutations only bump a revision.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
mod handle;
mod keyed;
pub mod persistence;
mod settings;

pub use error::{StorageError, StorageResult};
pub use handle::{spawn_flush_task, SettingsGuard, SettingsHandle};
pub use keyed::{BlockStore, Keyed, KeyedStore};
pub use persistence::{InMemoryPersistence, JsonFilePersistence, SettingsPersistence};
pub use settings::QuoteSettings;
