//! Database layer for wound-orders.

mod schema;
mod catalog;
mod patients;
mod ivr;
mod orders;

pub use schema::*;
#[allow(unused_imports)]
pub use catalog::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use ivr::*;
pub use orders::*;

use std::path::Path;
use std::str::FromStr;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid decimal value: {0}")]
    Decimal(#[from] rust_decimal::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin an IMMEDIATE transaction on the shared connection.
    ///
    /// The write lock is taken up front, so a read-check-write sequence run
    /// through `&self` methods cannot interleave with another writer.
    /// Dropping the returned transaction without committing rolls back.
    pub fn begin_immediate(&self) -> DbResult<Transaction<'_>> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    /// Run `f` under a named savepoint: all of its writes land, or none do.
    ///
    /// Works both inside an open transaction and on its own.
    pub(crate) fn with_savepoint<T>(
        &self,
        name: &str,
        f: impl FnOnce() -> DbResult<T>,
    ) -> DbResult<T> {
        self.conn.execute_batch(&format!("SAVEPOINT {name}"))?;
        match f() {
            Ok(value) => {
                self.conn.execute_batch(&format!("RELEASE {name}"))?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self
                    .conn
                    .execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"))
                {
                    tracing::error!(savepoint = name, error = %rollback_err, "savepoint rollback failed");
                }
                Err(e)
            }
        }
    }
}

/// Render an optional decimal for a TEXT column.
pub(crate) fn decimal_to_sql(value: &Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// Parse an optional decimal read from a TEXT column.
pub(crate) fn decimal_from_sql(value: Option<String>) -> DbResult<Option<Decimal>> {
    value
        .map(|s| Decimal::from_str(&s))
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"patients".to_string()));
        assert!(tables.contains(&"ivr_records".to_string()));
        assert!(tables.contains(&"products".to_string()));
        assert!(tables.contains(&"product_variants".to_string()));
        assert!(tables.contains(&"orders".to_string()));
        assert!(tables.contains(&"order_items".to_string()));
        assert!(tables.contains(&"order_documents".to_string()));
    }

    #[test]
    fn test_savepoint_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let result: DbResult<()> = db.with_savepoint("sp_test", || {
            db.conn().execute(
                "INSERT INTO products (product_id, name) VALUES ('P1', 'Test')",
                [],
            )?;
            Err(DbError::Constraint("forced".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_immediate_transaction_rolls_back_on_drop() {
        let db = Database::open_in_memory().unwrap();
        {
            let _tx = db.begin_immediate().unwrap();
            db.conn()
                .execute("INSERT INTO products (product_id, name) VALUES ('P1', 'Test')", [])
                .unwrap();
        }

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_decimal_helpers() {
        let value = Some(Decimal::new(425, 2));
        let text = decimal_to_sql(&value);
        assert_eq!(text.as_deref(), Some("4.25"));
        assert_eq!(decimal_from_sql(text).unwrap(), value);
        assert_eq!(decimal_from_sql(None).unwrap(), None);
        assert!(decimal_from_sql(Some("four".into())).is_err());
    }
}
