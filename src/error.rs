//! Error types for parsing and solving.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SatError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("degenerate instance: variable count is {num_vars}, expected at least 1")]
    DegenerateInstance { num_vars: u32 },

    #[error("instance too large for exhaustive search: {num_vars} variables (limit {limit})")]
    TooLarge { num_vars: u32, limit: u32 },

    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl SatError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
