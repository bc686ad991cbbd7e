//! Read-only view of the quote vault used during one resolution.

use quotes_select::{select, SearchExpr, Selection, Strategy};
use quotes_types::{fallback, Quote, QuoteContent};
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct Vault<'a> {
    quotes: &'a [Quote],
    min_quote_length: usize,
}

impl<'a> Vault<'a> {
    pub fn new(quotes: &'a [Quote], min_quote_length: usize) -> Self {
        Self {
            quotes,
            min_quote_length,
        }
    }

    /// True when the vault holds no quotes at all, regardless of length filtering.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &'a Quote> + 'a {
        let quotes = self.quotes;
        let min = self.min_quote_length;
        quotes.iter().filter(move |q| q.text_len() >= min)
    }

    /// Draw content for `search`. Unparseable or unmatched searches yield
    /// diagnostic content instead of failing.
    pub fn draw<R: Rng + ?Sized>(&self, search: &str, strategy: Strategy, rng: &mut R) -> QuoteContent {
        let expr = match SearchExpr::parse(search) {
            Ok(expr) => expr,
            Err(err) => {
                tracing::debug!(search, error = %err, "invalid search expression");
                return fallback::invalid_search(search, &err.to_string());
            }
        };

        match select(self.candidates(), &expr, strategy, rng) {
            Selection::Found(content) => content,
            Selection::NoMatch => {
                tracing::debug!(search, "search matched no quotes");
                fallback::no_match(search)
            }
        }
    }
}
