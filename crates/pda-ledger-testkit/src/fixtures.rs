//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use pda_ledger::{LedgerConfig, LedgerService};
use pda_ledger_core::{
    CategoryKey, CreateInstruction, DerivedAddress, Identity, Keypair, Signed, UpdateInstruction,
};
use pda_ledger_store::MemoryStore;

/// A test fixture with a keypair and a ledger over a memory store.
pub struct TestFixture {
    pub keypair: Keypair,
    pub ledger: LedgerService<MemoryStore>,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::from_parts(Keypair::generate(), Arc::new(MemoryStore::new()))
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_parts(Keypair::from_seed(&seed), Arc::new(MemoryStore::new()))
    }

    /// Create with a deterministic keypair over a store shared with other fixtures.
    pub fn with_shared_store(seed: [u8; 32], store: Arc<MemoryStore>) -> Self {
        Self::from_parts(Keypair::from_seed(&seed), store)
    }

    fn from_parts(keypair: Keypair, store: Arc<MemoryStore>) -> Self {
        Self {
            keypair,
            ledger: LedgerService::with_shared(store, LedgerConfig::default()),
        }
    }

    pub fn identity(&self) -> Identity {
        self.keypair.identity()
    }

    /// Derive this fixture's address for a category.
    ///
    /// Panics on an invalid category.
    pub fn address(&self, category: &str) -> (DerivedAddress, u8) {
        self.ledger
            .address_of(&self.identity(), category)
            .expect("fixture category must be valid")
    }

    /// A create instruction for this fixture's own address, signed by it.
    pub fn signed_create(&self, category: &str) -> Signed<CreateInstruction> {
        let (address, bump) = self.address(category);
        let ix = CreateInstruction {
            address,
            bump,
            category: CategoryKey::new(category).expect("fixture category must be valid"),
            authority: self.identity(),
        };
        Signed::sign(ix, &self.keypair).expect("instruction encodes")
    }

    /// An update instruction aimed at `address`, claimed and signed by this fixture.
    pub fn signed_update(&self, address: DerivedAddress, balance: u64) -> Signed<UpdateInstruction> {
        let ix = UpdateInstruction {
            address,
            balance,
            authority: self.identity(),
        };
        Signed::sign(ix, &self.keypair).expect("instruction encodes")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
///
/// All fixtures share one store, as parties on one ledger would.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    let store = Arc::new(MemoryStore::new());
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            TestFixture::with_shared_store(seed, Arc::clone(&store))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pda_ledger_store::{AccountStore, StoreError};
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_fixture_modify() {
        let fixture = TestFixture::new();
        let record = fixture.ledger.modify(&fixture.keypair, "red", 2).await.unwrap();

        assert_eq!(record.balance, 2);
        assert_eq!(fixture.ledger.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fixture_instructions_accepted() {
        let fixture = TestFixture::with_seed([9u8; 32]);
        let store = fixture.ledger.store();
        let (address, _) = fixture.address("blue");

        store.create(&fixture.signed_create("blue")).await.unwrap();
        let record = store
            .update(&fixture.signed_update(address, 6))
            .await
            .unwrap();
        assert_eq!(record.balance, 6);
    }

    #[tokio::test]
    async fn test_multi_party() {
        let parties = multi_party_fixtures(3);

        // Each party has unique keys
        let ids: Vec<_> = parties.iter().map(|p| p.identity()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);

        // One ledger, separate records
        for (i, party) in parties.iter().enumerate() {
            party.ledger.modify(&party.keypair, "red", i as u64).await.unwrap();
        }
        assert_eq!(parties[0].ledger.store().count().await.unwrap(), 3);

        // No party may write another's record
        let (victim, _) = parties[0].address("red");
        let err = parties[1]
            .ledger
            .store()
            .update(&parties[1].signed_update(victim, 99))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized { .. }));
    }

    #[test]
    fn test_many_parties_have_distinct_keys() {
        let parties = multi_party_fixtures(300);
        let ids: HashSet<_> = parties.iter().map(|p| p.identity()).collect();
        assert_eq!(ids.len(), 300);
    }
}
