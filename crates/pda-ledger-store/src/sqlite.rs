//! SQLite implementation of the AccountStore trait.
//!
//! This is the primary storage backend for the PDA Ledger. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, warn};

use pda_ledger_core::{
    AuthorizationGate, CategoryKey, CreateInstruction, DerivedAddress, LedgerRecord, ProgramId,
    Signed, UpdateInstruction,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::AccountStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    gate: AuthorizationGate,
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path for the default program.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_program(path, ProgramId::default())
    }

    /// Open a SQLite database owned by the given program.
    pub fn open_with_program(path: impl AsRef<Path>, program: ProgramId) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, program)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, ProgramId::default())
    }

    fn from_connection(mut conn: Connection, program: ProgramId) -> Result<Self> {
        migration::migrate(&mut conn)?;
        Ok(Self {
            gate: AuthorizationGate::new(program),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

// Balances are u64 on the wire; SQLite integers are i64. The cast is a
// lossless bit reinterpretation in both directions.
fn balance_to_sql(balance: u64) -> i64 {
    balance as i64
}

fn balance_from_sql(raw: i64) -> u64 {
    raw as u64
}

fn read_record(conn: &Connection, address: &DerivedAddress) -> Result<Option<LedgerRecord>> {
    let row: Option<(String, i64)> = conn
        .query_row(
            "SELECT category, balance FROM accounts WHERE address = ?1",
            params![address.0.as_slice()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    row.map(|(category, balance)| {
        let category = CategoryKey::new(category)
            .map_err(|e| StoreError::InvalidData(format!("account {}: {}", address, e)))?;
        Ok(LedgerRecord {
            category,
            balance: balance_from_sql(balance),
        })
    })
    .transpose()
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn exists(&self, address: &DerivedAddress) -> Result<bool> {
        let address = *address;

        self.with_conn(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM accounts WHERE address = ?1",
                    params![address.0.as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    async fn read(&self, address: &DerivedAddress) -> Result<LedgerRecord> {
        let address = *address;

        self.with_conn(move |conn| {
            read_record(conn, &address)?.ok_or(StoreError::NotFound(address))
        })
        .await
    }

    async fn create(&self, signed: &Signed<CreateInstruction>) -> Result<LedgerRecord> {
        let ix = signed.instruction.clone();

        if let Err(source) = self.gate.authorize_create(signed) {
            warn!(address = %ix.address, authority = %ix.authority, error = %source, "create rejected");
            return Err(StoreError::Unauthorized {
                address: ix.address,
                source,
            });
        }

        self.with_conn(move |conn| {
            let now = now_millis();
            let record = LedgerRecord::new(ix.category.clone());

            let inserted = conn.execute(
                "INSERT INTO accounts (address, bump, category, balance, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![
                    ix.address.0.as_slice(),
                    ix.bump,
                    ix.category.as_str(),
                    balance_to_sql(record.balance),
                    now,
                ],
            );

            match inserted {
                Ok(_) => {
                    debug!(address = %ix.address, category = %ix.category, bump = ix.bump, "account allocated");
                    Ok(record)
                }
                // The primary key makes the insert itself the existence check.
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::AlreadyExists(ix.address))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn update(&self, signed: &Signed<UpdateInstruction>) -> Result<LedgerRecord> {
        let signed = signed.clone();
        let gate = self.gate;

        self.with_conn(move |conn| {
            let ix = &signed.instruction;
            let tx = conn.transaction()?;

            let current = read_record(&tx, &ix.address)?.ok_or(StoreError::NotFound(ix.address))?;

            if let Err(source) = gate.authorize_update(&current, &signed) {
                warn!(address = %ix.address, authority = %ix.authority, error = %source, "update rejected");
                return Err(StoreError::Unauthorized {
                    address: ix.address,
                    source,
                });
            }

            tx.execute(
                "UPDATE accounts SET balance = ?1, updated_at = ?2 WHERE address = ?3",
                params![balance_to_sql(ix.balance), now_millis(), ix.address.0.as_slice()],
            )?;
            tx.commit()?;

            Ok(current.with_balance(ix.balance))
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
            usize::try_from(n).map_err(|_| StoreError::InvalidData(format!("negative count {}", n)))
        })
        .await
    }
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
