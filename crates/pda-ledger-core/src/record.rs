//! Ledger record: the `{category, balance}` pair stored at a derived address.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::CategoryKey;

/// A persisted ledger record.
///
/// `category` is set once at creation and never changes; only `balance` is
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub category: CategoryKey,
    pub balance: u64,
}

impl LedgerRecord {
    /// A fresh record with zero balance.
    pub fn new(category: CategoryKey) -> Self {
        Self {
            category,
            balance: 0,
        }
    }

    /// Copy of this record with a new balance and the same category.
    pub fn with_balance(&self, balance: u64) -> Self {
        Self {
            category: self.category.clone(),
            balance,
        }
    }
}

impl fmt::Display for LedgerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.category, self.balance)
    }
}
