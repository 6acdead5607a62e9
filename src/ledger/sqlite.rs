//! SQLite-backed ledger.
//!
//! ## Schema
//!
//! ```sql
//! labels(id, code UNIQUE, prefix, number, width, created_at)
//! UNIQUE (prefix, width, number)
//! ```
//!
//! Prefix, number and width are typed columns, so "last number for this
//! prefix at this width" is an indexed `MAX()` rather than string matching.
//!
//! Deleting the database file is the documented way to reset numbering.

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, TransactionBehavior, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{LabelRecord, Ledger, LedgerStats};
use crate::allocator::{BlockRequest, codes_for, plan_block};
use crate::code::Code;
use crate::error::LabelError;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS labels (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT    NOT NULL UNIQUE,
    prefix      TEXT    NOT NULL,
    number      INTEGER NOT NULL,
    width       INTEGER NOT NULL,
    created_at  TEXT    NOT NULL,
    UNIQUE (prefix, width, number)
);
"#;

/// How long a writer waits for another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Ledger stored in a single SQLite file.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open (or create) the ledger at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;

        tracing::debug!(path = %path.display(), "opened ledger");
        Self::init(conn)
    }

    /// Private, non-durable ledger. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, LabelError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, LabelError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, LabelError> {
        self.conn
            .lock()
            .map_err(|_| LabelError::Persistence("ledger connection poisoned".into()))
    }
}

impl Ledger for SqliteLedger {
    fn allocate(&self, request: &BlockRequest) -> Result<Vec<Code>, LabelError> {
        let mut conn = self.lock()?;

        // IMMEDIATE takes the write lock before the MAX() read, so two
        // allocators can never compute the same next number.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let last: Option<i64> = tx.query_row(
            "SELECT MAX(number) FROM labels WHERE prefix = ?1 AND width = ?2",
            params![request.prefix.as_str(), request.width.digits()],
            |row| row.get(0),
        )?;

        // Dropping `tx` on any early return rolls the block back.
        let range = plan_block(last.map(|n| n as u64), request)?;
        let codes = codes_for(range, request)?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        {
            let mut insert = tx.prepare_cached(
                "INSERT INTO labels (code, prefix, number, width, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for code in &codes {
                insert.execute(params![
                    code.to_string(),
                    code.prefix().as_str(),
                    code.number() as i64,
                    code.width().digits(),
                    created_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(codes)
    }

    fn recent(&self, limit: usize) -> Result<Vec<LabelRecord>, LabelError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, code, prefix, number, width, created_at
             FROM labels ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(LabelRecord {
                id: row.get(0)?,
                code: row.get(1)?,
                prefix: row.get(2)?,
                number: row.get::<_, i64>(3)? as u64,
                width: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(LabelError::from)
    }

    fn stats(&self) -> Result<LedgerStats, LabelError> {
        let conn = self.lock()?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM labels", [], |row| row.get(0))?;
        Ok(LedgerStats {
            total: total as u64,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
