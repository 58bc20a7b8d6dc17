//! Error types for the store module.

use pda_ledger_core::{AuthError, DerivedAddress};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record at the address.
    #[error("account not found: {0}")]
    NotFound(DerivedAddress),

    /// A record already exists at the address.
    #[error("account already exists: {0}")]
    AlreadyExists(DerivedAddress),

    /// The instruction's authority may not touch this account.
    #[error("unauthorized access to {address}: {source}")]
    Unauthorized {
        address: DerivedAddress,
        #[source]
        source: AuthError,
    },

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The backing service could not be reached or did not answer.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
