//! Error types for VoteChain

use std::fmt;

#[derive(Debug, Clone)]
pub enum LedgerError {
    DatabaseError(String),
    CorruptChain(String),
    ProofOfWorkExhausted(u64),
    IoError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            LedgerError::CorruptChain(msg) => write!(f, "Corrupt chain: {}", msg),
            LedgerError::ProofOfWorkExhausted(attempts) => {
                write!(f, "Proof of work exhausted after {} attempts", attempts)
            }
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
