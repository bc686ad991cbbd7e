//! Quote selection over a filtered vault

use crate::expr::SearchExpr;
use quotes_types::{Quote, QuoteContent};
use rand::Rng;

/// How a quote is drawn from the eligible subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Every eligible quote is equally likely.
    #[default]
    Uniform,
    /// Tickets are tallied per author over the eligible subset, so an author
    /// with N eligible quotes is N times as likely as an author with one.
    AuthorWeighted,
}

impl Strategy {
    pub fn from_weighted(weighted: bool) -> Self {
        if weighted {
            Strategy::AuthorWeighted
        } else {
            Strategy::Uniform
        }
    }
}

/// Outcome of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Found(QuoteContent),
    NoMatch,
}

impl Selection {
    pub fn is_match(&self) -> bool {
        matches!(self, Selection::Found(_))
    }
}

/// Draw one quote matching `expr` from `candidates`.
pub fn select<'a, I, R>(candidates: I, expr: &SearchExpr, strategy: Strategy, rng: &mut R) -> Selection
where
    I: IntoIterator<Item = &'a Quote>,
    R: Rng + ?Sized,
{
    let eligible: Vec<&Quote> = candidates.into_iter().filter(|q| expr.matches(q)).collect();
    if eligible.is_empty() {
        tracing::trace!(%expr, "no eligible quotes");
        return Selection::NoMatch;
    }

    let picked = match strategy {
        Strategy::Uniform => eligible[rng.gen_range(0..eligible.len())],
        Strategy::AuthorWeighted => pick_by_author_tickets(&eligible, rng),
    };

    tracing::trace!(%expr, ?strategy, eligible = eligible.len(), author = %picked.author, "quote selected");
    Selection::Found(picked.content())
}

/// Eligible quote count per author, in order of first appearance.
pub fn author_tickets(eligible: &[&Quote]) -> Vec<(String, usize)> {
    group_by_author(eligible)
        .into_iter()
        .map(|(author, quotes)| (author.to_string(), quotes.len()))
        .collect()
}

fn pick_by_author_tickets<'a, R: Rng + ?Sized>(eligible: &[&'a Quote], rng: &mut R) -> &'a Quote {
    let groups = group_by_author(eligible);
    let mut ticket = rng.gen_range(0..eligible.len());

    for (_, quotes) in &groups {
        if ticket < quotes.len() {
            return quotes[ticket];
        }
        ticket -= quotes.len();
    }

    // ticket counts sum to eligible.len()
    eligible[eligible.len() - 1]
}

fn group_by_author<'a>(eligible: &[&'a Quote]) -> Vec<(&'a str, Vec<&'a Quote>)> {
    let mut groups: Vec<(&'a str, Vec<&'a Quote>)> = Vec::new();
    for quote in eligible {
        let author = quote.author.trim();
        match groups.iter_mut().find(|(a, _)| *a == author) {
            Some((_, quotes)) => quotes.push(quote),
            None => groups.push((author, vec![*quote])),
        }
    }
    groups
}
