//! The LedgerService: the creation-then-mutation lifecycle.
//!
//! A mutation request for an (owner, category) pair that has never been
//! seen first allocates the record, then replaces its balance. The service
//! drives this as an explicit state machine over independent store round
//! trips, so a request abandoned between steps always leaves a valid record.

use std::sync::Arc;

use pda_ledger_core::{
    AddressDeriver, CategoryKey, CoreError, CreateInstruction, DerivedAddress, Identity, Keypair,
    LedgerRecord, Signed, UpdateInstruction,
};
use pda_ledger_store::{AccountStore, AccountStoreExt, StoreError};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LifecycleStep, Result};

/// Where a request is in the lifecycle.
#[derive(Debug)]
enum LifecycleState {
    Checking,
    Creating,
    Mutating(LedgerRecord),
    Done(LedgerRecord),
}

impl LifecycleState {
    fn name(&self) -> &'static str {
        match self {
            LifecycleState::Checking => "checking",
            LifecycleState::Creating => "creating",
            LifecycleState::Mutating(_) => "mutating",
            LifecycleState::Done(_) => "done",
        }
    }
}

/// What the caller wants once the record is known to exist.
#[derive(Debug, Clone, Copy)]
enum Goal {
    Ensure,
    SetBalance(u64),
}

/// A resolved (owner, category) pair.
struct Target {
    owner: Identity,
    category: CategoryKey,
    address: DerivedAddress,
    bump: u8,
}

impl Target {
    fn store_error(&self, step: LifecycleStep, err: StoreError) -> LedgerError {
        match err {
            StoreError::Unauthorized { source, .. } => LedgerError::Unauthorized {
                owner: self.owner,
                category: self.category.to_string(),
                step,
                source,
            },
            source => LedgerError::Store {
                owner: self.owner,
                category: self.category.to_string(),
                step,
                source,
            },
        }
    }

    fn instruction_error(&self, step: LifecycleStep, source: CoreError) -> LedgerError {
        LedgerError::Instruction {
            owner: self.owner,
            category: self.category.to_string(),
            step,
            source,
        }
    }
}

/// The ledger service.
///
/// Holds the store handle and configuration; callers pass their own keypair
/// with every request. Cloning is cheap and shares the store, so independent
/// requests can run on separate tasks.
pub struct LedgerService<S: AccountStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Derives addresses under the configured program.
    deriver: AddressDeriver,
    /// Configuration.
    config: LedgerConfig,
}

impl<S: AccountStore> LedgerService<S> {
    /// Create a new service owning the store.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self::with_shared(Arc::new(store), config)
    }

    /// Create a service over a store that is shared with other holders.
    pub fn with_shared(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            deriver: AddressDeriver::new(config.program_id),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the balance of `owner`'s record for `category`, creating the
    /// record first if it does not exist yet.
    ///
    /// Returns the record as it stands after the update.
    #[tracing::instrument(skip(self, owner), fields(owner = %owner.identity()))]
    pub async fn modify(
        &self,
        owner: &Keypair,
        category: &str,
        balance: u64,
    ) -> Result<LedgerRecord> {
        let target = self.resolve(&owner.identity(), category)?;
        self.run(owner, &target, Goal::SetBalance(balance)).await
    }

    /// Make sure `owner`'s record for `category` exists, without touching
    /// its balance.
    ///
    /// Returns the existing record, or the freshly created zero-balance one.
    #[tracing::instrument(skip(self, owner), fields(owner = %owner.identity()))]
    pub async fn ensure(&self, owner: &Keypair, category: &str) -> Result<LedgerRecord> {
        let target = self.resolve(&owner.identity(), category)?;
        self.run(owner, &target, Goal::Ensure).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read `owner`'s record for `category` without mutating anything.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, owner: &Identity, category: &str) -> Result<Option<LedgerRecord>> {
        let target = self.resolve(owner, category)?;
        self.store
            .lookup(&target.address)
            .await
            .map_err(|e| target.store_error(LifecycleStep::Read, e))
    }

    /// The address and discriminant of `owner`'s record for `category`.
    pub fn address_of(&self, owner: &Identity, category: &str) -> Result<(DerivedAddress, u8)> {
        let target = self.resolve(owner, category)?;
        Ok((target.address, target.bump))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State Machine
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve(&self, owner: &Identity, category: &str) -> Result<Target> {
        let derivation_error = |source| LedgerError::Derivation {
            owner: *owner,
            category: category.to_string(),
            source,
        };

        let category = CategoryKey::new(category).map_err(derivation_error)?;
        let (address, bump) = self
            .deriver
            .derive(owner, &category)
            .map_err(derivation_error)?;

        Ok(Target {
            owner: *owner,
            category,
            address,
            bump,
        })
    }

    async fn run(&self, owner: &Keypair, target: &Target, goal: Goal) -> Result<LedgerRecord> {
        let budget = self.config.creation_budget();
        let mut creations = 0u32;
        let mut state = LifecycleState::Checking;

        loop {
            debug!(
                owner = %target.owner,
                category = %target.category,
                address = %target.address,
                state = state.name(),
                "lifecycle transition"
            );

            state = match state {
                LifecycleState::Checking => self.check(target).await?,

                LifecycleState::Creating => {
                    if creations >= budget {
                        return Err(LedgerError::LifecycleExhausted {
                            owner: target.owner,
                            category: target.category.to_string(),
                            attempts: creations,
                        });
                    }
                    creations += 1;
                    self.create(owner, target).await?
                }

                LifecycleState::Mutating(current) => match goal {
                    Goal::Ensure => LifecycleState::Done(current),
                    Goal::SetBalance(balance) => {
                        LifecycleState::Done(self.mutate(owner, target, &current, balance).await?)
                    }
                },

                LifecycleState::Done(record) => return Ok(record),
            };
        }
    }

    async fn check(&self, target: &Target) -> Result<LifecycleState> {
        let present = self
            .store
            .exists(&target.address)
            .await
            .map_err(|e| target.store_error(LifecycleStep::Check, e))?;

        if !present {
            return Ok(LifecycleState::Creating);
        }

        match self.store.read(&target.address).await {
            Ok(record) => Ok(LifecycleState::Mutating(record)),
            // Vanished between the two round trips.
            Err(StoreError::NotFound(_)) => Ok(LifecycleState::Creating),
            Err(e) => Err(target.store_error(LifecycleStep::Read, e)),
        }
    }

    async fn create(&self, owner: &Keypair, target: &Target) -> Result<LifecycleState> {
        let ix = CreateInstruction {
            address: target.address,
            bump: target.bump,
            category: target.category.clone(),
            authority: target.owner,
        };
        let signed = Signed::sign(ix, owner)
            .map_err(|e| target.instruction_error(LifecycleStep::Create, e))?;

        match self.store.create(&signed).await {
            Ok(record) => {
                info!(
                    owner = %target.owner,
                    category = %target.category,
                    address = %target.address,
                    bump = target.bump,
                    "created record"
                );
                if self.config.verify_after_create {
                    Ok(LifecycleState::Checking)
                } else {
                    Ok(LifecycleState::Mutating(record))
                }
            }
            Err(StoreError::AlreadyExists(_)) => {
                warn!(
                    owner = %target.owner,
                    category = %target.category,
                    address = %target.address,
                    "record created concurrently, re-checking"
                );
                Ok(LifecycleState::Checking)
            }
            Err(e) => Err(target.store_error(LifecycleStep::Create, e)),
        }
    }

    async fn mutate(
        &self,
        owner: &Keypair,
        target: &Target,
        current: &LedgerRecord,
        balance: u64,
    ) -> Result<LedgerRecord> {
        info!(
            owner = %target.owner,
            category = %target.category,
            from = current.balance,
            to = balance,
            "modifying balance"
        );

        let ix = UpdateInstruction {
            address: target.address,
            balance,
            authority: target.owner,
        };
        let signed = Signed::sign(ix, owner)
            .map_err(|e| target.instruction_error(LifecycleStep::Mutate, e))?;

        self.store
            .update(&signed)
            .await
            .map_err(|e| target.store_error(LifecycleStep::Mutate, e))
    }
}

impl<S: AccountStore> Clone for LedgerService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            deriver: self.deriver,
            config: self.config.clone(),
        }
    }
}
