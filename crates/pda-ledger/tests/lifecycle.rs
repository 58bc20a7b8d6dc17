//! End-to-end lifecycle tests against both store backends.
//!
//! The scenario sequence is the one every deployment of the ledger is
//! checked with: two owners, three categories, creation on first use.

use std::sync::Arc;

use pda_ledger::core::{Signed, UpdateInstruction};
use pda_ledger::store::{AccountStore, MemoryStore, SqliteStore, StoreError};
use pda_ledger::{Keypair, LedgerConfig, LedgerError, LedgerService, LifecycleStep};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn owner_one() -> Keypair {
    Keypair::from_seed(&[0x11; 32])
}

fn owner_two() -> Keypair {
    Keypair::from_seed(&[0x22; 32])
}

async fn run_scenarios<S: AccountStore>(ledger: &LedgerService<S>) -> anyhow::Result<()> {
    let o1 = owner_one();
    let o2 = owner_two();

    // A: first mutation creates the record.
    assert!(ledger.fetch(&o1.identity(), "red").await?.is_none());
    let red = ledger.modify(&o1, "red", 2).await?;
    assert_eq!((red.category.as_str(), red.balance), ("red", 2));
    assert_eq!(ledger.store().count().await?, 1);

    // B: same pair, no new record.
    let red = ledger.modify(&o1, "red", 4).await?;
    assert_eq!((red.category.as_str(), red.balance), ("red", 4));
    assert_eq!(ledger.store().count().await?, 1);

    // C: second category for the same owner.
    let blue = ledger.modify(&o1, "blue", 2).await?;
    assert_eq!((blue.category.as_str(), blue.balance), ("blue", 2));
    assert_ne!(
        ledger.address_of(&o1.identity(), "red")?,
        ledger.address_of(&o1.identity(), "blue")?
    );
    assert_eq!(ledger.fetch(&o1.identity(), "red").await?.map(|r| r.balance), Some(4));

    // D: same category, different owner.
    let other_red = ledger.modify(&o2, "red", 3).await?;
    assert_eq!((other_red.category.as_str(), other_red.balance), ("red", 3));
    assert_ne!(
        ledger.address_of(&o1.identity(), "red")?,
        ledger.address_of(&o2.identity(), "red")?
    );
    assert_eq!(ledger.fetch(&o1.identity(), "red").await?.map(|r| r.balance), Some(4));

    let green = ledger.modify(&o2, "green", 3).await?;
    assert_eq!((green.category.as_str(), green.balance), ("green", 3));

    assert_eq!(ledger.store().count().await?, 4);
    Ok(())
}

#[tokio::test]
async fn test_scenarios_memory() -> anyhow::Result<()> {
    init_tracing();
    let ledger = LedgerService::new(MemoryStore::new(), LedgerConfig::default());
    run_scenarios(&ledger).await
}

#[tokio::test]
async fn test_scenarios_sqlite() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let store = SqliteStore::open(dir.path().join("ledger.db"))?;
    let ledger = LedgerService::new(store, LedgerConfig::default());
    run_scenarios(&ledger).await
}

async fn concurrent_first_use<S: AccountStore + 'static>(store: S) -> anyhow::Result<()> {
    let ledger = LedgerService::new(store, LedgerConfig::default());
    let owner = owner_one();

    let tasks: Vec<_> = (0..8u64)
        .map(|balance| {
            let ledger = ledger.clone();
            let owner = owner.clone();
            tokio::spawn(async move { ledger.modify(&owner, "red", balance).await })
        })
        .collect();

    for task in tasks {
        let record = task.await??;
        assert_eq!(record.category.as_str(), "red");
    }

    assert_eq!(ledger.store().count().await?, 1);
    let last = ledger
        .fetch(&owner.identity(), "red")
        .await?
        .ok_or_else(|| anyhow::anyhow!("record missing after concurrent creation"))?;
    assert!(last.balance < 8);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_use_memory() -> anyhow::Result<()> {
    init_tracing();
    concurrent_first_use(MemoryStore::new()).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_use_sqlite() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    concurrent_first_use(SqliteStore::open(dir.path().join("ledger.db"))?).await
}

#[tokio::test]
async fn test_only_owner_mutates() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ledger = LedgerService::with_shared(Arc::clone(&store), LedgerConfig::default());
    let owner = owner_one();
    let intruder = owner_two();

    ledger.modify(&owner, "red", 4).await?;
    let (address, _) = ledger.address_of(&owner.identity(), "red")?;

    // A well-signed update from someone who does not derive the address.
    let forged = Signed::sign(
        UpdateInstruction {
            address,
            balance: 1_000,
            authority: intruder.identity(),
        },
        &intruder,
    )?;
    let err = store.update(&forged).await.unwrap_err();
    assert!(matches!(err, StoreError::Unauthorized { .. }));

    // The intruder's own request lands at the intruder's own address.
    ledger.modify(&intruder, "red", 1_000).await?;

    assert_eq!(ledger.fetch(&owner.identity(), "red").await?.map(|r| r.balance), Some(4));
    assert_eq!(store.count().await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_category_survives_mutation() -> anyhow::Result<()> {
    let ledger = LedgerService::new(SqliteStore::open_memory()?, LedgerConfig::default());
    let owner = owner_one();

    for balance in [7, 0, u64::MAX, 1] {
        let record = ledger.modify(&owner, "blue", balance).await?;
        assert_eq!(record.category.as_str(), "blue");
        assert_eq!(record.balance, balance);
    }
    Ok(())
}

#[tokio::test]
async fn test_reopened_database_keeps_records() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ledger.db");
    let owner = owner_two();

    {
        let ledger = LedgerService::new(SqliteStore::open(&path)?, LedgerConfig::default());
        ledger.modify(&owner, "green", 3).await?;
    }

    let ledger = LedgerService::new(SqliteStore::open(&path)?, LedgerConfig::default());
    let record = ledger.modify(&owner, "green", 5).await?;
    assert_eq!(record.balance, 5);
    assert_eq!(ledger.store().count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_addresses_are_off_curve() -> anyhow::Result<()> {
    let ledger = LedgerService::new(MemoryStore::new(), LedgerConfig::default());

    for owner in [owner_one(), owner_two()] {
        for category in ["red", "blue", "green"] {
            let (address, _) = ledger.address_of(&owner.identity(), category)?;
            assert!(!address.is_on_curve());
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_oversized_category_rejected() {
    let ledger = LedgerService::new(MemoryStore::new(), LedgerConfig::default());
    let category = "c".repeat(pda_ledger::core::MAX_CATEGORY_LEN + 1);

    let err = ledger.modify(&owner_one(), &category, 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::Derivation { .. }));
    assert_eq!(err.step(), Some(LifecycleStep::Derive));
}
