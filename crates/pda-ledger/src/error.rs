//! Error types for the ledger service.

use std::fmt;

use pda_ledger_core::{AuthError, CoreError, Identity};
use pda_ledger_store::StoreError;
use thiserror::Error;

/// The lifecycle step that was running when an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStep {
    Derive,
    Check,
    Read,
    Create,
    Mutate,
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleStep::Derive => "derive",
            LifecycleStep::Check => "check",
            LifecycleStep::Read => "read",
            LifecycleStep::Create => "create",
            LifecycleStep::Mutate => "mutate",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during ledger operations.
///
/// Every variant names the owner and category the request was for.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The category is malformed, or no address could be derived for it.
    #[error("cannot derive address for {owner}/{category:?}: {source}")]
    Derivation {
        owner: Identity,
        category: String,
        #[source]
        source: CoreError,
    },

    /// An instruction could not be encoded for signing.
    #[error("cannot build {step} instruction for {owner}/{category:?}: {source}")]
    Instruction {
        owner: Identity,
        category: String,
        step: LifecycleStep,
        #[source]
        source: CoreError,
    },

    /// The store refused the caller as authority for the address.
    #[error("{owner} not authorized to {step} {category:?}: {source}")]
    Unauthorized {
        owner: Identity,
        category: String,
        step: LifecycleStep,
        #[source]
        source: AuthError,
    },

    /// The record stayed absent after the creation budget was spent.
    #[error("record {owner}/{category:?} still absent after {attempts} creation attempts")]
    LifecycleExhausted {
        owner: Identity,
        category: String,
        attempts: u32,
    },

    /// Any other store failure, transport errors included.
    #[error("store failed during {step} for {owner}/{category:?}: {source}")]
    Store {
        owner: Identity,
        category: String,
        step: LifecycleStep,
        #[source]
        source: StoreError,
    },
}

impl LedgerError {
    /// The step the error surfaced in, if it belongs to one.
    pub fn step(&self) -> Option<LifecycleStep> {
        match self {
            LedgerError::Derivation { .. } => Some(LifecycleStep::Derive),
            LedgerError::Instruction { step, .. }
            | LedgerError::Unauthorized { step, .. }
            | LedgerError::Store { step, .. } => Some(*step),
            LedgerError::LifecycleExhausted { .. } => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LedgerError::Unauthorized { .. })
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
