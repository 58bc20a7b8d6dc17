//! AccountStore trait: the abstract interface for account persistence.
//!
//! This trait allows the ledger service to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests). A remote ledger client
//! would implement the same four round trips.

use async_trait::async_trait;
use pda_ledger_core::{CreateInstruction, DerivedAddress, LedgerRecord, Signed, UpdateInstruction};

use crate::error::{Result, StoreError};

/// The AccountStore trait: async interface for account persistence.
///
/// # Design Notes
///
/// - **Atomic create**: `create` must reject a second allocation at the same
///   address with `AlreadyExists`. This is the only concurrency safeguard the
///   ledger relies on.
/// - **Authorization**: `create` and `update` verify the signed instruction
///   before any state is read or written, failing with `Unauthorized`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Check whether a record exists at the address. Side-effect free.
    async fn exists(&self, address: &DerivedAddress) -> Result<bool>;

    /// Read the record at the address.
    ///
    /// Fails with `NotFound` if absent.
    async fn read(&self, address: &DerivedAddress) -> Result<LedgerRecord>;

    /// Allocate a zero-balance record for a signed create instruction.
    ///
    /// Fails with `AlreadyExists` if the address is taken.
    async fn create(&self, signed: &Signed<CreateInstruction>) -> Result<LedgerRecord>;

    /// Replace the balance of an existing record.
    ///
    /// Fails with `NotFound` if absent. The category is never touched.
    async fn update(&self, signed: &Signed<UpdateInstruction>) -> Result<LedgerRecord>;

    /// Number of records held.
    async fn count(&self) -> Result<usize>;
}

/// Extension trait for common store patterns.
pub trait AccountStoreExt: AccountStore {
    /// Read a record, mapping `NotFound` to `None`.
    fn lookup(
        &self,
        address: &DerivedAddress,
    ) -> impl std::future::Future<Output = Result<Option<LedgerRecord>>> + Send;
}

impl<S: AccountStore + ?Sized> AccountStoreExt for S {
    async fn lookup(&self, address: &DerivedAddress) -> Result<Option<LedgerRecord>> {
        match self.read(address).await {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
