use thiserror::Error;

/// Errors from KVLM parsing and document construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KvlmError {
    /// The input violates the header/message grammar at `offset`.
    #[error("malformed kvlm at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// The key cannot be written without changing its meaning on re-parse.
    #[error("invalid header key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },
}

/// Convenience alias for KVLM results.
pub type Result<T> = std::result::Result<T, KvlmError>;

impl KvlmError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset where a parse error was detected, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Malformed { offset, .. } => Some(*offset),
            Self::InvalidKey { .. } => None,
        }
    }
}
