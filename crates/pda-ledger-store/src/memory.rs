//! In-memory implementation of the AccountStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, warn};

use pda_ledger_core::{
    AuthorizationGate, CreateInstruction, DerivedAddress, LedgerRecord, ProgramId, Signed,
    UpdateInstruction,
};

use crate::error::{Result, StoreError};
use crate::traits::AccountStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; the
/// write lock makes `create` atomic.
pub struct MemoryStore {
    gate: AuthorizationGate,
    accounts: RwLock<HashMap<DerivedAddress, LedgerRecord>>,
}

impl MemoryStore {
    /// Create a new empty store for the default program.
    pub fn new() -> Self {
        Self::with_program(ProgramId::default())
    }

    /// Create a new empty store owned by the given program.
    pub fn with_program(program: ProgramId) -> Self {
        Self {
            gate: AuthorizationGate::new(program),
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn exists(&self, address: &DerivedAddress) -> Result<bool> {
        let accounts = self.accounts.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(accounts.contains_key(address))
    }

    async fn read(&self, address: &DerivedAddress) -> Result<LedgerRecord> {
        let accounts = self.accounts.read().map_err(|_| StoreError::LockPoisoned)?;
        accounts
            .get(address)
            .cloned()
            .ok_or(StoreError::NotFound(*address))
    }

    async fn create(&self, signed: &Signed<CreateInstruction>) -> Result<LedgerRecord> {
        let ix = &signed.instruction;

        if let Err(source) = self.gate.authorize_create(signed) {
            warn!(address = %ix.address, authority = %ix.authority, error = %source, "create rejected");
            return Err(StoreError::Unauthorized {
                address: ix.address,
                source,
            });
        }

        let mut accounts = self.accounts.write().map_err(|_| StoreError::LockPoisoned)?;
        if accounts.contains_key(&ix.address) {
            return Err(StoreError::AlreadyExists(ix.address));
        }

        let record = LedgerRecord::new(ix.category.clone());
        accounts.insert(ix.address, record.clone());
        debug!(address = %ix.address, category = %ix.category, bump = ix.bump, "account allocated");

        Ok(record)
    }

    async fn update(&self, signed: &Signed<UpdateInstruction>) -> Result<LedgerRecord> {
        let ix = &signed.instruction;
        let mut accounts = self.accounts.write().map_err(|_| StoreError::LockPoisoned)?;

        let record = accounts
            .get_mut(&ix.address)
            .ok_or(StoreError::NotFound(ix.address))?;

        if let Err(source) = self.gate.authorize_update(record, signed) {
            warn!(address = %ix.address, authority = %ix.authority, error = %source, "update rejected");
            return Err(StoreError::Unauthorized {
                address: ix.address,
                source,
            });
        }

        record.balance = ix.balance;
        Ok(record.clone())
    }

    async fn count(&self) -> Result<usize> {
        let accounts = self.accounts.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(accounts.len())
    }
}
