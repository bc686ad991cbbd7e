//! Local Quotes block engine.
//!
//! Turns an already-parsed block declaration into renderable content:
//!
//! - **Recurring blocks** (`recurring`): cached per block id and re-drawn once
//!   their TTL elapses or their declaration changes.
//! - **One-time blocks** (`one_time`): drawn once per hosting document and
//!   pinned until the block's search changes.
//!
//! Misconfiguration never fails: the caller always gets a [`BlockResolution`]
//! it can render, either the stored state or a diagnostic [`Placeholder`].
//!
//! [`QuoteEngine`] ties the resolvers to the shared settings document, the
//! clock and the random source.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod clock;
mod engine;
mod error;
pub mod one_time;
pub mod recurring;
mod resolution;
mod vault;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineOptions, QuoteEngine, RecurringWeighting};
pub use error::{EngineError, EngineResult};
pub use resolution::{BlockResolution, BlockView, Placeholder, PlaceholderReason, ResolveOutcome};
pub use vault::Vault;
