//! Local Quotes Types - core data model
//!
//! Everything the block engine reads or persists is defined here:
//!
//! - **Quote**: one entry of the user-curated vault (author, text, tags)
//! - **QuoteContent**: the resolved `{author, text}` pair handed to rendering
//! - **RecurringBlockState**: cached answer for a block identity, refreshed on a TTL
//! - **OneTimeBlockState**: answer pinned once per hosting document
//! - **Descriptors**: already-parsed block declarations, every field optional
//!
//! Diagnostic content for misconfigured blocks lives in [`fallback`].

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod block;
pub mod descriptor;
pub mod fallback;
pub mod ids;
pub mod lenient;
pub mod quote;

pub use block::{OneTimeBlockState, RecurringBlockState};
pub use descriptor::{OneTimeDescriptor, RecurringDescriptor};
pub use ids::{BlockId, FileName};
pub use quote::{Quote, QuoteContent};

/// Default refresh interval for recurring blocks: one day, in seconds.
pub const SECONDS_IN_DAY: u64 = 86_400;
