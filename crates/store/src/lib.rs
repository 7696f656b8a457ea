//! `pricebook-store` — the price master, a SQLite file.
//!
//! Rows are keyed by rowid, not by code: an all-null placeholder record is
//! allowed to coexist with an imported record for the same material, since
//! placeholders are preserved rather than replaced.

use std::fmt;
use std::path::Path;

use rusqlite::{params, Connection};

use pricebook_recon::model::{ImportResult, MaterialClass};
use pricebook_recon::transform::MasterRecord;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS price_master (
    code TEXT NOT NULL,
    class_code TEXT NOT NULL,          -- 'RM' or 'PM'
    name TEXT NOT NULL DEFAULT '',
    unit TEXT,
    currency TEXT,
    price REAL,
    previous_price REAL,
    normalized_price REAL,             -- comparison basis used at selection
    was_duplicate INTEGER NOT NULL DEFAULT 0,
    submitted_by TEXT,
    imported_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_price_master_code
    ON price_master (class_code, code);
"#;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StoreError {
    /// Database open / SQL failure.
    Sql(String),
    /// The batch carries blocking validation failures; nothing was written.
    BlockedBatch,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(msg) => write!(f, "price master error: {msg}"),
            Self::BlockedBatch => {
                write!(f, "batch has blocking validation failures, refusing to write")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sql(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Open (or create) the master file and ensure the schema exists.
pub fn open_master(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

/// Snapshot of the master for one class, in the shape the engine's
/// delete-set computation consumes.
pub fn load_master(conn: &Connection, class: MaterialClass) -> Result<Vec<MasterRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT code, price, previous_price FROM price_master WHERE class_code = ?1 ORDER BY rowid",
    )?;
    let records = stmt
        .query_map(params![class.class_code()], |row| {
            Ok(MasterRecord {
                code: row.get(0)?,
                class,
                price: row.get(1)?,
                previous_price: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Apply an import result: delete the plan's delete-set for the target
/// class, then bulk-insert the admitted records, as one transaction. A
/// half-applied replace is never visible to readers.
///
/// Returns the number of inserted records.
pub fn apply_import(conn: &mut Connection, result: &ImportResult) -> Result<usize, StoreError> {
    if !result.batch.admissible {
        return Err(StoreError::BlockedBatch);
    }

    let class_code = result.meta.class.class_code();
    let tx = conn.transaction()?;

    {
        let mut delete = tx.prepare(
            "DELETE FROM price_master WHERE class_code = ?1 AND code = ?2
                 AND (price IS NOT NULL OR previous_price IS NOT NULL)",
        )?;
        for code in &result.plan.delete_codes {
            delete.execute(params![class_code, code])?;
        }

        let mut insert = tx.prepare(
            "INSERT INTO price_master
                 (code, class_code, name, unit, currency, price, previous_price,
                  normalized_price, was_duplicate, submitted_by, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8, ?9, ?10)",
        )?;
        for record in &result.plan.records {
            insert.execute(params![
                record.code,
                record.class_code,
                record.name,
                record.unit,
                record.currency,
                record.price,
                record.normalized_price,
                record.was_duplicate as i64,
                record.submitted_by,
                result.meta.run_at,
            ])?;
        }
    }

    tx.commit()?;
    Ok(result.plan.records.len())
}
