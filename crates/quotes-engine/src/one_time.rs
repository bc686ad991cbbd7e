//! One-time blocks: one draw per hosting document, pinned until the search changes.

use crate::resolution::{BlockResolution, PlaceholderReason, ResolveOutcome};
use crate::vault::Vault;
use quotes_select::Strategy;
use quotes_store::BlockStore;
use quotes_types::{FileName, OneTimeBlockState, OneTimeDescriptor};
use rand::Rng;

pub struct OneTimeResolver<'a, B, R: ?Sized> {
    pub store: &'a mut B,
    pub vault: Vault<'a>,
    /// Configured template folder, `None` when unset.
    pub template_folder: Option<&'a str>,
    pub strategy: Strategy,
    pub rng: &'a mut R,
}

impl<B, R> OneTimeResolver<'_, B, R>
where
    B: BlockStore<OneTimeBlockState>,
    R: Rng + ?Sized,
{
    /// Resolve the block declared by `descriptor` inside the document at `context_path`.
    pub fn resolve(self, descriptor: &OneTimeDescriptor, context_path: &str) -> ResolveOutcome<OneTimeBlockState> {
        let placeholder = |reason| {
            ResolveOutcome::untouched(BlockResolution::placeholder(reason, descriptor.custom_class.clone()))
        };

        let Some(folder) = self.template_folder else {
            return placeholder(PlaceholderReason::TemplateFolderUnset);
        };
        if context_path.starts_with(folder) {
            tracing::trace!(context_path, folder, "one-time block inside template folder");
            return placeholder(PlaceholderReason::InsideTemplateFolder);
        }
        let Some(search) = descriptor.search() else {
            return placeholder(PlaceholderReason::MissingSearch);
        };
        if self.vault.is_empty() {
            return placeholder(PlaceholderReason::EmptyVault);
        }
        let filename = FileName::from_path(context_path);
        if filename.as_str().trim().is_empty() {
            return placeholder(PlaceholderReason::MissingFilename);
        }

        let Self {
            store,
            vault,
            strategy,
            rng,
            ..
        } = self;

        let Some(state) = store.get_mut(filename.as_str()) else {
            let state = OneTimeBlockState {
                filename,
                search: search.to_string(),
                content: vault.draw(search, strategy, rng),
                custom_class: descriptor.custom_class.clone(),
            };
            tracing::debug!(filename = %state.filename, search, "one-time block assigned");
            store.upsert(state.clone());
            return ResolveOutcome::stored(state, true);
        };

        let mut mutated = false;
        if state.custom_class != descriptor.custom_class {
            state.custom_class = descriptor.custom_class.clone();
            mutated = true;
        }
        if state.search != search {
            state.search = search.to_string();
            state.content = vault.draw(search, strategy, rng);
            mutated = true;
            tracing::debug!(filename = %state.filename, search, "one-time block re-drawn for new search");
        }

        ResolveOutcome::stored(state.clone(), mutated)
    }
}
