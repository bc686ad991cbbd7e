//! Search expression AST, parser and matcher
//!
//! ```text
//! expr   := or
//! or     := and ( "|" and )*
//! and    := unary ( "&" unary )*
//! unary  := "!" unary | atom
//! atom   := "(" expr ")" | "*" | term
//! term   := "#"tag | "author:" phrase | phrase
//! phrase := quoted | word+        (words up to the next `#tag`)
//! ```

use crate::error::{SearchParseError, SearchParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use quotes_types::Quote;
use std::fmt;
use std::str::FromStr;

/// Phrase that matches the whole vault.
const MATCH_ALL_PHRASE: &str = "random";

/// Deepest nesting of `!` and parentheses a search may use.
const MAX_DEPTH: usize = 128;

/// Parsed search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchExpr {
    /// Every quote.
    All,
    /// Quote carries this tag.
    Tag(String),
    /// Quote author equals this name, ignoring case.
    Author(String),
    /// Either a tag or the author.
    Phrase(String),
    Not(Box<SearchExpr>),
    And(Vec<SearchExpr>),
    Or(Vec<SearchExpr>),
}

impl SearchExpr {
    pub fn parse(input: &str) -> Result<Self, SearchParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        if parser.check(TokenKind::Eof) {
            return Err(SearchParseError::new(SearchParseErrorKind::Empty, 0));
        }
        let expr = parser.parse_or()?;
        parser.expect_end()?;
        Ok(expr)
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            SearchExpr::All => true,
            SearchExpr::Tag(tag) => quote.has_tag(tag),
            SearchExpr::Author(name) => author_eq(&quote.author, name),
            SearchExpr::Phrase(phrase) => quote.has_tag(phrase) || author_eq(&quote.author, phrase),
            SearchExpr::Not(inner) => !inner.matches(quote),
            SearchExpr::And(items) => items.iter().all(|e| e.matches(quote)),
            SearchExpr::Or(items) => items.iter().any(|e| e.matches(quote)),
        }
    }
}

impl FromStr for SearchExpr {
    type Err = SearchParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SearchExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchExpr::All => f.write_str("*"),
            SearchExpr::Tag(tag) => write!(f, "#{}", tag),
            SearchExpr::Author(name) => write!(f, "author:\"{}\"", name),
            SearchExpr::Phrase(phrase) => write!(f, "\"{}\"", phrase),
            SearchExpr::Not(inner) => write!(f, "!{}", inner),
            SearchExpr::And(items) => write_joined(f, items, " & "),
            SearchExpr::Or(items) => write_joined(f, items, " | "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[SearchExpr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(")")
}

fn author_eq(author: &str, wanted: &str) -> bool {
    author.trim().to_lowercase() == wanted.trim().to_lowercase()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn parse_or(&mut self) -> Result<SearchExpr, SearchParseError> {
        let mut items = vec![self.parse_and()?];
        while self.check(TokenKind::Or) {
            self.advance();
            items.push(self.parse_and()?);
        }
        Ok(collapse(items, SearchExpr::Or))
    }

    fn parse_and(&mut self) -> Result<SearchExpr, SearchParseError> {
        let mut items = vec![self.parse_unary()?];
        while self.check(TokenKind::And) {
            self.advance();
            items.push(self.parse_unary()?);
        }
        Ok(collapse(items, SearchExpr::And))
    }

    fn parse_unary(&mut self) -> Result<SearchExpr, SearchParseError> {
        if self.check(TokenKind::Not) {
            self.descend()?;
            self.advance();
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(SearchExpr::Not(Box::new(inner)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<SearchExpr, SearchParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::OpenParen => {
                self.descend()?;
                self.advance();
                let inner = self.parse_or()?;
                if !self.check(TokenKind::CloseParen) {
                    return Err(SearchParseError::new(
                        SearchParseErrorKind::UnclosedParen,
                        token.position,
                    ));
                }
                self.advance();
                self.depth -= 1;
                Ok(inner)
            }
            TokenKind::Star => {
                self.advance();
                Ok(SearchExpr::All)
            }
            TokenKind::AuthorPrefix => {
                self.advance();
                let name = self.parse_phrase()?;
                Ok(SearchExpr::Author(name))
            }
            TokenKind::Word if token.text.starts_with('#') => {
                self.advance();
                let tag = token.text.trim_start_matches('#');
                if tag.is_empty() {
                    return Err(SearchParseError::new(
                        SearchParseErrorKind::EmptyTag,
                        token.position,
                    ));
                }
                Ok(SearchExpr::Tag(tag.to_string()))
            }
            TokenKind::Word | TokenKind::Quoted => {
                let phrase = self.parse_phrase()?;
                if phrase.eq_ignore_ascii_case(MATCH_ALL_PHRASE) {
                    Ok(SearchExpr::All)
                } else {
                    Ok(SearchExpr::Phrase(phrase))
                }
            }
            TokenKind::Eof => Err(SearchParseError::new(
                SearchParseErrorKind::UnexpectedEnd,
                token.position,
            )),
            _ => Err(unexpected(&token)),
        }
    }

    /// One quoted string, or bare words up to the next `#tag` joined by single spaces.
    fn parse_phrase(&mut self) -> Result<String, SearchParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Quoted => {
                self.advance();
                Ok(token.text)
            }
            TokenKind::Word => {
                self.advance();
                let mut words = vec![token.text];
                while self.check(TokenKind::Word) && !self.peek().text.starts_with('#') {
                    words.push(self.peek().text.clone());
                    self.advance();
                }
                Ok(words.join(" "))
            }
            TokenKind::Eof => Err(SearchParseError::new(
                SearchParseErrorKind::UnexpectedEnd,
                token.position,
            )),
            _ => Err(unexpected(&token)),
        }
    }

    fn descend(&mut self) -> Result<(), SearchParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SearchParseError::new(
                SearchParseErrorKind::TooDeep,
                self.peek().position,
            ));
        }
        Ok(())
    }

    fn expect_end(&self) -> Result<(), SearchParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(unexpected(token))
        }
    }

    fn peek(&self) -> &Token {
        // the lexer always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }
}

fn unexpected(token: &Token) -> SearchParseError {
    SearchParseError::new(
        SearchParseErrorKind::UnexpectedToken(token.text.clone()),
        token.position,
    )
}

fn collapse(mut items: Vec<SearchExpr>, wrap: fn(Vec<SearchExpr>) -> SearchExpr) -> SearchExpr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seneca() -> Quote {
        Quote::new("Seneca", "Luck is what happens when preparation meets opportunity.")
            .with_tags(["stoic", "luck"])
    }

    fn marcus() -> Quote {
        Quote::new("Marcus Aurelius", "Waste no more time arguing what a good man should be.")
            .with_tags(["stoic", "virtue"])
    }

    #[test]
    fn test_tag_and_negation() {
        let expr = SearchExpr::parse("#stoic & !#luck").unwrap();
        assert!(!expr.matches(&seneca()));
        assert!(expr.matches(&marcus()));
    }

    #[test]
    fn test_multi_word_phrase_matches_author() {
        let expr = SearchExpr::parse("Marcus Aurelius").unwrap();
        assert_eq!(expr, SearchExpr::Phrase("Marcus Aurelius".to_string()));
        assert!(expr.matches(&marcus()));
        assert!(!expr.matches(&seneca()));
    }

    #[test]
    fn test_author_prefix_binds_phrase() {
        let expr = SearchExpr::parse("author:marcus aurelius | #luck").unwrap();
        assert!(expr.matches(&marcus()));
        assert!(expr.matches(&seneca()));
        let quoted = SearchExpr::parse("author:\"Seneca\"").unwrap();
        assert_eq!(quoted, SearchExpr::Author("Seneca".to_string()));
    }

    #[test]
    fn test_match_all_forms() {
        assert_eq!(SearchExpr::parse("*").unwrap(), SearchExpr::All);
        assert_eq!(SearchExpr::parse("Random").unwrap(), SearchExpr::All);
        assert!(SearchExpr::parse("*").unwrap().matches(&seneca()));
    }

    #[test]
    fn test_precedence_and_binds_tighter() {
        let expr = SearchExpr::parse("#luck | #virtue & !#stoic").unwrap();
        assert!(matches!(expr, SearchExpr::Or(ref items) if items.len() == 2));
        assert!(expr.matches(&seneca()));
        assert!(!expr.matches(&marcus()));
    }

    #[test]
    fn test_parse_errors_report_position() {
        let err = SearchExpr::parse("").unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::Empty);

        let err = SearchExpr::parse("(#stoic | #luck").unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::UnclosedParen);
        assert_eq!(err.position, 0);

        let err = SearchExpr::parse("#stoic &").unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::UnexpectedEnd);

        let err = SearchExpr::parse("#stoic )").unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::UnexpectedToken(")".to_string()));
        assert_eq!(err.position, 7);

        let err = SearchExpr::parse("# & x").unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::EmptyTag);
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let negations = format!("{}#stoic", "!".repeat(200_000));
        let err = SearchExpr::parse(&negations).unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::TooDeep);
        assert_eq!(err.position, MAX_DEPTH);

        let parens = format!("{}#stoic{}", "(".repeat(50_000), ")".repeat(50_000));
        let err = SearchExpr::parse(&parens).unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::TooDeep);

        let limit = format!("{}#luck", "!".repeat(MAX_DEPTH));
        assert!(SearchExpr::parse(&limit).is_ok());
        let nested = format!("{}#luck{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(SearchExpr::parse(&nested).unwrap().matches(&seneca()));
    }

    #[test]
    fn test_phrase_stops_at_tag() {
        let err = SearchExpr::parse("Seneca #stoic").unwrap_err();
        assert_eq!(err.kind, SearchParseErrorKind::UnexpectedToken("#stoic".to_string()));
        assert_eq!(err.position, 7);

        let expr = SearchExpr::parse("Seneca & #stoic").unwrap();
        assert!(expr.matches(&seneca()));
    }

    #[test]
    fn test_display_round_trips_meaning() {
        let expr = SearchExpr::parse("#stoic & !author:Seneca").unwrap();
        let reparsed = SearchExpr::parse(&expr.to_string()).unwrap();
        assert_eq!(expr, reparsed);
    }
}
