//! Quote search and selection.
//!
//! A block declares *what* it wants with a small tag expression
//! (`#stoic & !#war`, `author:Seneca | #courage`, `*`); this crate parses it
//! into a [`SearchExpr`] and draws one matching quote from the vault with a
//! caller-supplied random source, so selection stays reproducible under test.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
mod expr;
mod lexer;
mod select;

pub use error::{SearchParseError, SearchParseErrorKind};
pub use expr::SearchExpr;
pub use select::{author_tickets, select, Selection, Strategy};
