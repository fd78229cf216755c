use thiserror::Error;
use ztest_config::ConfigError;

/// A hard stop while lexing a case file. There is no recovery: the whole
/// file fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No recognizer matched and no headless item was waiting for a body.
    #[error("line {line}: unexpected text: {fragment}")]
    UnexpectedText { line: usize, fragment: String },

    /// A fenced string block with no headless item to receive it.
    #[error("line {line}: unexpected string block: {fragment}")]
    UnexpectedStringBlock { line: usize, fragment: String },

    /// The body scanner ran without a pending headless item.
    #[error("line {line}: unexpected block: {fragment}")]
    UnexpectedBlock { line: usize, fragment: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedText { line, .. }
            | ParseError::UnexpectedStringBlock { line, .. }
            | ParseError::UnexpectedBlock { line, .. } => *line,
        }
    }

    pub fn fragment(&self) -> &str {
        match self {
            ParseError::UnexpectedText { fragment, .. }
            | ParseError::UnexpectedStringBlock { fragment, .. }
            | ParseError::UnexpectedBlock { fragment, .. } => fragment,
        }
    }
}

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid grammar pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
