use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Failed to read style sheet {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Style sheet has {} malformed rule(s)", .0.len())]
    Parse(Vec<StyleParseError>),
}

pub type Result<T> = std::result::Result<T, StyleError>;

/// A rule that was skipped while loading a sheet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind} in `{selector}`")]
pub struct StyleParseError {
    /// 1-based line where the rule starts
    pub line: usize,
    /// Selector text as written, trimmed
    pub selector: String,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unterminated block")]
    UnterminatedBlock,
    #[error("empty selector")]
    EmptySelector,
    #[error("invalid selector")]
    InvalidSelector,
}
