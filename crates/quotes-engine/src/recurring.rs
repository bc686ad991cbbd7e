//! Recurring blocks: cached per id, re-drawn on TTL expiry or declaration change.

use crate::resolution::{BlockResolution, PlaceholderReason, ResolveOutcome};
use crate::vault::Vault;
use quotes_select::Strategy;
use quotes_store::BlockStore;
use quotes_types::{RecurringBlockState, RecurringDescriptor};
use rand::Rng;

/// One resolution pass over the recurring block store.
pub struct RecurringResolver<'a, B, R: ?Sized> {
    pub store: &'a mut B,
    pub vault: Vault<'a>,
    /// TTL for blocks without their own `refresh`, in seconds.
    pub default_ttl: u64,
    pub strategy: Strategy,
    pub now: i64,
    pub rng: &'a mut R,
}

impl<B, R> RecurringResolver<'_, B, R>
where
    B: BlockStore<RecurringBlockState>,
    R: Rng + ?Sized,
{
    pub fn resolve(self, descriptor: &RecurringDescriptor) -> ResolveOutcome<RecurringBlockState> {
        let Some(id) = descriptor.id() else {
            return ResolveOutcome::untouched(BlockResolution::placeholder(
                PlaceholderReason::MissingId,
                None,
            ));
        };
        let Some(search) = descriptor.search() else {
            return ResolveOutcome::untouched(BlockResolution::placeholder(
                PlaceholderReason::MissingSearch,
                None,
            ));
        };
        if self.vault.is_empty() {
            return ResolveOutcome::untouched(BlockResolution::placeholder(
                PlaceholderReason::EmptyVault,
                None,
            ));
        }

        let Self {
            store,
            vault,
            default_ttl,
            strategy,
            now,
            rng,
        } = self;

        let Some(state) = store.get_mut(id.as_str()) else {
            let state = RecurringBlockState {
                id: id.clone(),
                search: search.to_string(),
                content: vault.draw(search, strategy, rng),
                custom_class: descriptor.custom_class.clone(),
                refresh: descriptor.refresh,
                last_update: now,
            };
            tracing::debug!(id = %state.id, search, "recurring block created");
            store.upsert(state.clone());
            return ResolveOutcome::stored(state, true);
        };

        let mut redraw = false;
        let mut mutated = false;

        if state.search != search {
            state.search = search.to_string();
            redraw = true;
        }
        if state.custom_class != descriptor.custom_class {
            state.custom_class = descriptor.custom_class.clone();
            mutated = true;
        }
        if state.refresh != descriptor.refresh {
            state.refresh = descriptor.refresh;
            redraw = true;
        }

        let expired = state.is_expired(default_ttl, now);
        if redraw || expired {
            state.content = vault.draw(&state.search, strategy, rng);
            mutated = true;
        }
        if expired {
            state.last_update = now;
        }

        if mutated {
            tracing::debug!(id = %state.id, redraw, expired, "recurring block refreshed");
        } else {
            tracing::trace!(id = %state.id, "recurring block served from cache");
        }

        ResolveOutcome::stored(state.clone(), mutated)
    }
}
