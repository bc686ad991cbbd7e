//! Diagnostic content shown in place of a quote
//!
//! Misconfiguration never fails the rendering pipeline: the block renders one
//! of these messages instead.

use crate::quote::QuoteContent;

/// Author shown on every diagnostic block.
pub const FALLBACK_AUTHOR: &str = "Local Quotes";

pub const INVALID_BLOCK_TEXT: &str =
    "You caught an error! If you can't understand what is wrong you can write an issue on GitHub";

pub const TEMPLATE_FOLDER_UNSET_TEXT: &str =
    "Your template folder isn't set! Change it in the settings.";

pub const INSIDE_TEMPLATE_FOLDER_TEXT: &str =
    "Your one time quote will be placed there, when time comes!";

pub fn invalid_block() -> QuoteContent {
    QuoteContent::diagnostic(FALLBACK_AUTHOR, INVALID_BLOCK_TEXT)
}

pub fn template_folder_unset() -> QuoteContent {
    QuoteContent::diagnostic(FALLBACK_AUTHOR, TEMPLATE_FOLDER_UNSET_TEXT)
}

pub fn inside_template_folder() -> QuoteContent {
    QuoteContent::diagnostic(FALLBACK_AUTHOR, INSIDE_TEMPLATE_FOLDER_TEXT)
}

/// Stored when a search matches nothing in the vault.
pub fn no_match(search: &str) -> QuoteContent {
    QuoteContent::diagnostic(FALLBACK_AUTHOR, format!("No quotes match `{}`.", search))
}

/// Stored when a search expression cannot be parsed.
pub fn invalid_search(search: &str, reason: &str) -> QuoteContent {
    QuoteContent::diagnostic(
        FALLBACK_AUTHOR,
        format!("Invalid search expression `{}`: {}", search, reason),
    )
}

/// True for any content produced by this module.
pub fn is_fallback(content: &QuoteContent) -> bool {
    content.diagnostic
}
