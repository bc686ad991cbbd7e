//! What a resolver hands back to rendering.

use quotes_types::{fallback, OneTimeBlockState, QuoteContent, RecurringBlockState};
use serde::Serialize;

/// Why a block renders a diagnostic instead of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    MissingId,
    MissingSearch,
    MissingFilename,
    EmptyVault,
    TemplateFolderUnset,
    InsideTemplateFolder,
}

/// Synthetic, never-persisted state carrying diagnostic content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub reason: PlaceholderReason,
    pub content: QuoteContent,
    pub custom_class: Option<String>,
}

impl Placeholder {
    pub fn new(reason: PlaceholderReason, custom_class: Option<String>) -> Self {
        let content = match reason {
            PlaceholderReason::TemplateFolderUnset => fallback::template_folder_unset(),
            PlaceholderReason::InsideTemplateFolder => fallback::inside_template_folder(),
            PlaceholderReason::MissingId
            | PlaceholderReason::MissingSearch
            | PlaceholderReason::MissingFilename
            | PlaceholderReason::EmptyVault => fallback::invalid_block(),
        };
        Self {
            reason,
            content,
            custom_class,
        }
    }
}

/// Common read surface of anything a block can render.
pub trait BlockView {
    fn content(&self) -> &QuoteContent;

    fn custom_class(&self) -> Option<&str>;

    /// Correlation key for re-rendering; only recurring blocks have one.
    fn render_id(&self) -> Option<&str> {
        None
    }
}

impl BlockView for RecurringBlockState {
    fn content(&self) -> &QuoteContent {
        &self.content
    }

    fn custom_class(&self) -> Option<&str> {
        self.custom_class.as_deref()
    }

    fn render_id(&self) -> Option<&str> {
        Some(self.id.as_str())
    }
}

impl BlockView for OneTimeBlockState {
    fn content(&self) -> &QuoteContent {
        &self.content
    }

    fn custom_class(&self) -> Option<&str> {
        self.custom_class.as_deref()
    }
}

impl BlockView for Placeholder {
    fn content(&self) -> &QuoteContent {
        &self.content
    }

    fn custom_class(&self) -> Option<&str> {
        self.custom_class.as_deref()
    }
}

/// Stored state, or a placeholder when the block could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockResolution<S> {
    Resolved(S),
    Placeholder(Placeholder),
}

impl<S> BlockResolution<S> {
    pub fn placeholder(reason: PlaceholderReason, custom_class: Option<String>) -> Self {
        BlockResolution::Placeholder(Placeholder::new(reason, custom_class))
    }

    pub fn state(&self) -> Option<&S> {
        match self {
            BlockResolution::Resolved(state) => Some(state),
            BlockResolution::Placeholder(_) => None,
        }
    }

    pub fn placeholder_reason(&self) -> Option<PlaceholderReason> {
        match self {
            BlockResolution::Resolved(_) => None,
            BlockResolution::Placeholder(p) => Some(p.reason),
        }
    }
}

impl<S: BlockView> BlockView for BlockResolution<S> {
    fn content(&self) -> &QuoteContent {
        match self {
            BlockResolution::Resolved(state) => state.content(),
            BlockResolution::Placeholder(p) => p.content(),
        }
    }

    fn custom_class(&self) -> Option<&str> {
        match self {
            BlockResolution::Resolved(state) => state.custom_class(),
            BlockResolution::Placeholder(p) => p.custom_class(),
        }
    }

    fn render_id(&self) -> Option<&str> {
        match self {
            BlockResolution::Resolved(state) => state.render_id(),
            BlockResolution::Placeholder(p) => p.render_id(),
        }
    }
}

/// Resolution plus whether the store was written.
#[derive(Debug, Clone)]
pub struct ResolveOutcome<S> {
    pub resolution: BlockResolution<S>,
    pub mutated: bool,
}

impl<S> ResolveOutcome<S> {
    pub(crate) fn untouched(resolution: BlockResolution<S>) -> Self {
        Self {
            resolution,
            mutated: false,
        }
    }

    pub(crate) fn stored(state: S, mutated: bool) -> Self {
        Self {
            resolution: BlockResolution::Resolved(state),
            mutated,
        }
    }
}
