pub mod parsing;

// Re-export key types for easier usage
pub use parsing::{
    CASE_KEYWORD, Case, Cases, Grammar, GrammarError, Item, Lexer, Options, ParseError,
    ParsedFile, Preamble, Token, parse_document, parse_with, tokenize,
};
pub use ztest_config::{ConfigError, GrammarConfig};
