use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorklogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected input; nothing was written.
    #[error("invalid report: {0}")]
    Validation(String),

    #[error("no report store at {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed report store: {0}")]
    Parse(String),

    #[error("no report at row {index} (store has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("admin secret required")]
    EmptySecret,

    #[error("admin secret does not match")]
    Unauthorized,
}

impl WorklogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WorklogError::Validation(msg.into())
    }

    pub fn parse_at(line: Option<u64>, msg: impl std::fmt::Display) -> Self {
        match line {
            Some(l) => WorklogError::Parse(format!("line {l}: {msg}")),
            None => WorklogError::Parse(msg.to_string()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WorklogError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WorklogError::NotFound(_))
    }
}

impl From<csv::Error> for WorklogError {
    fn from(e: csv::Error) -> Self {
        let msg = e.to_string();
        match e.into_kind() {
            csv::ErrorKind::Io(io) => WorklogError::Io(io),
            _ => WorklogError::Parse(msg),
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, WorklogError>;
