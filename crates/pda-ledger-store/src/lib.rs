//! # PDA Ledger Store
//!
//! Storage abstraction for the PDA Ledger. Provides a trait-based interface
//! for account persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The [`AccountStore`] trait is the boundary between the lifecycle logic and
//! whatever actually holds the accounts: a local database, an in-memory map,
//! or an RPC client to a remote ledger. Every method is one round trip.
//!
//! ## Key Types
//!
//! - [`AccountStore`] - The async trait for all account operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pda_ledger_store::{AccountStore, SqliteStore};
//! use pda_ledger_core::DerivedAddress;
//!
//! async fn example() {
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!     let present = store.exists(&DerivedAddress::from_bytes([0; 32])).await.unwrap();
//!     assert!(!present);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Atomic create**: a second `create` at the same address fails with `AlreadyExists`
//! - **Authorization inside the store**: `create` and `update` run the
//!   [`AuthorizationGate`](pda_ledger_core::AuthorizationGate) before touching state
//! - **Immutable category**: `update` only ever replaces the balance

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{AccountStore, AccountStoreExt};
