//! Lexer: tokenizes a search expression
//!
//! Words run until whitespace, an operator, a parenthesis or a quote. A word
//! spelled `author:` (any case) is split into its own token so the parser can
//! bind the phrase that follows it.

use crate::error::{SearchParseError, SearchParseErrorKind};

/// A token produced by the lexer
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Char offset in the input
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    And,
    Or,
    Not,
    OpenParen,
    CloseParen,
    Star,
    AuthorPrefix,
    Word,
    Quoted,
    Eof,
}

const AUTHOR_PREFIX: &str = "author:";

pub(crate) struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, SearchParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.pos >= self.input.len() {
                tokens.push(Token::new(TokenKind::Eof, "", self.pos));
                break;
            }

            self.next_tokens(&mut tokens)?;
        }

        Ok(tokens)
    }

    fn next_tokens(&mut self, tokens: &mut Vec<Token>) -> Result<(), SearchParseError> {
        let start = self.pos;
        let single = |kind, text: &str| Token::new(kind, text, start);

        match self.input[self.pos] {
            '&' => {
                self.pos += 1;
                tokens.push(single(TokenKind::And, "&"));
            }
            '|' => {
                self.pos += 1;
                tokens.push(single(TokenKind::Or, "|"));
            }
            '!' => {
                self.pos += 1;
                tokens.push(single(TokenKind::Not, "!"));
            }
            '(' => {
                self.pos += 1;
                tokens.push(single(TokenKind::OpenParen, "("));
            }
            ')' => {
                self.pos += 1;
                tokens.push(single(TokenKind::CloseParen, ")"));
            }
            '*' => {
                self.pos += 1;
                tokens.push(single(TokenKind::Star, "*"));
            }
            '"' => tokens.push(self.read_quoted()?),
            _ => self.read_word(tokens),
        }

        Ok(())
    }

    fn read_quoted(&mut self) -> Result<Token, SearchParseError> {
        let start = self.pos;
        self.pos += 1; // opening quote

        let mut text = String::new();
        while self.pos < self.input.len() && self.input[self.pos] != '"' {
            if self.input[self.pos] == '\\' && self.input.get(self.pos + 1) == Some(&'"') {
                self.pos += 1;
            }
            text.push(self.input[self.pos]);
            self.pos += 1;
        }

        if self.pos >= self.input.len() {
            return Err(SearchParseError::new(
                SearchParseErrorKind::UnterminatedQuote,
                start,
            ));
        }

        self.pos += 1; // closing quote
        Ok(Token::new(TokenKind::Quoted, text, start))
    }

    fn read_word(&mut self, tokens: &mut Vec<Token>) {
        let start = self.pos;
        let mut text = String::new();
        while self.pos < self.input.len() && !is_boundary(self.input[self.pos]) {
            text.push(self.input[self.pos]);
            self.pos += 1;
        }

        let prefix_len = AUTHOR_PREFIX.chars().count();
        let lowered = text.to_lowercase();
        if lowered.starts_with(AUTHOR_PREFIX) {
            tokens.push(Token::new(TokenKind::AuthorPrefix, AUTHOR_PREFIX, start));
            let rest: String = text.chars().skip(prefix_len).collect();
            if !rest.is_empty() {
                tokens.push(Token::new(TokenKind::Word, rest, start + prefix_len));
            }
        } else {
            tokens.push(Token::new(TokenKind::Word, text, start));
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '&' | '|' | '!' | '(' | ')' | '"')
}
