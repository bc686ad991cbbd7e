use thiserror::Error;

/// Search expression parse failure, with the char offset it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct SearchParseError {
    pub kind: SearchParseErrorKind,
    pub position: usize,
}

impl SearchParseError {
    pub(crate) fn new(kind: SearchParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchParseErrorKind {
    #[error("empty expression")]
    Empty,

    #[error("unexpected `{0}`")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unterminated quoted phrase")]
    UnterminatedQuote,

    #[error("missing closing parenthesis")]
    UnclosedParen,

    #[error("empty tag")]
    EmptyTag,

    #[error("expression nested too deeply")]
    TooDeep,
}
