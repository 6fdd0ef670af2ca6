use thiserror::Error;

use crate::ValueType;

pub type Result<T> = std::result::Result<T, Error>;

/// A compilation failure. Every failure is fatal; the first one aborts the run.
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: {kind}")]
pub struct Error {
    pub kind: ErrorKind,
    pub line: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum ErrorKind {
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),
    #[error("unknown keyword '{0}'")]
    UnknownKeyword(String),
    #[error("unterminated string literal \"{0}")]
    UnterminatedString(String),
    #[error("{0}")]
    Parse(String),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },
    /// A value type reached a construct with no behaviour defined for it.
    #[error("{0}")]
    Unsupported(String),
}

impl Error {
    pub fn new(kind: ErrorKind, line: usize) -> Self {
        Error { kind, line }
    }
}
