//! # Case File Parsing
//!
//! Turns the text of a case file into a preamble and an ordered list of test
//! cases. Parsing is a pure function of the input: no I/O, no shared mutable
//! state, and the first error aborts the whole file.
//!
//! ## Pipeline
//!
//! raw text → [`Lexer`] (drives the [`rules`] over the input) → flat [`Token`]
//! stream → [`Cases`] → [`ParsedFile`]
//!
//! ## Modules
//!
//! - **`grammar`**: `Grammar`, the compiled patterns built from a `GrammarConfig`
//! - **`rules`**: the ordered recognizers (comment, blank run, case header,
//!   inline item, item head, string block, item body)
//! - **`lexer`**: `Lexer`, the single-pass tokenizer
//! - **`cases`**: `Cases`, which folds tokens into `Case` records
//! - **`token`**: `Token`, `Item` and `Options`
//! - **`error`**: `ParseError` and `GrammarError`
//! - **`snapshot`**: normalized snapshots and invariant checks for tests

pub mod cases;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod rules;
pub mod snapshot;
pub mod token;

#[cfg(test)]
mod tests;

pub use cases::{Case, Cases, ParsedFile, Preamble};
pub use error::{GrammarError, ParseError};
pub use grammar::{CASE_KEYWORD, Grammar};
pub use lexer::Lexer;
pub use token::{Item, Options, Token};

/// Parses with the standard grammar.
pub fn parse_document(text: &str) -> Result<ParsedFile, ParseError> {
    parse_with(text, Grammar::standard(), false)
}

pub fn parse_with(text: &str, grammar: &Grammar, verbose: bool) -> Result<ParsedFile, ParseError> {
    let tokens = tokenize(text, grammar, verbose)?;
    Ok(Cases::new().group(tokens))
}

pub fn tokenize(text: &str, grammar: &Grammar, verbose: bool) -> Result<Vec<Token>, ParseError> {
    Lexer::new(grammar).verbose(verbose).tokenize(text)
}
