//! # PDA Ledger
//!
//! A deterministic-address keyed ledger: every account lives at an address
//! computed from its owner and a category key, is created on first use, and
//! is then mutated only by that owner.
//!
//! ## Overview
//!
//! - **Derivation**: `(owner, category)` maps to one off-curve address. No
//!   directory of accounts is ever kept.
//! - **Lifecycle**: a mutation for a pair that has never been seen allocates
//!   the record first. Concurrent first requests converge on one record.
//! - **Authorization**: only the owner that derives an address can create or
//!   change the record there.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pda_ledger::{LedgerConfig, LedgerService};
//! use pda_ledger::core::Keypair;
//! use pda_ledger::store::SqliteStore;
//!
//! async fn example() {
//!     let owner = Keypair::generate();
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!     let ledger = LedgerService::new(store, LedgerConfig::default());
//!
//!     // First call creates the record, then sets its balance.
//!     let record = ledger.modify(&owner, "red", 2).await.unwrap();
//!     assert_eq!(record.balance, 2);
//!
//!     let again = ledger.fetch(&owner.identity(), "red").await.unwrap();
//!     assert_eq!(again, Some(record));
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `pda_ledger::core` - Derivation, records, signed instructions
//! - `pda_ledger::store` - Storage abstraction and SQLite

pub mod config;
pub mod error;
pub mod service;

// Re-export component crates
pub use pda_ledger_core as core;
pub use pda_ledger_store as store;

pub use config::LedgerConfig;
pub use error::{LedgerError, LifecycleStep, Result};
pub use service::LedgerService;

// Re-export commonly used core types
pub use pda_ledger_core::{CategoryKey, DerivedAddress, Identity, Keypair, LedgerRecord, ProgramId};
