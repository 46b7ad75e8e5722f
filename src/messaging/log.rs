//! Communication Log
//!
//! Append-only SQLite record of every message routed through the system,
//! independent of the bus backend that carried it.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "communications.db";

/// One logged message. Ids are assigned by SQLite and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    pub queue: String,
    pub message: String,
}

pub struct CommunicationLog {
    conn: Mutex<Option<Connection>>,
    db_path: PathBuf,
}

impl CommunicationLog {
    /// Open (or create) the log database at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;

        tracing::debug!("[CommunicationLog] Opened {:?}", db_path);
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            db_path,
        })
    }

    /// Log backed by a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        // AUTOINCREMENT keeps ids monotonic even after the highest row is gone.
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                queue TEXT NOT NULL,
                message TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Append a record and return its id
    pub fn log(&self, queue: &str, message: &str) -> Result<i64> {
        let mut guard = self.conn.lock();
        let conn = guard.as_mut().ok_or(Error::Closed("communication log"))?;

        // Dropping the transaction without commit rolls it back.
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO messages (queue, message) VALUES (?1, ?2)",
            params![queue, message],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(record_id = id, queue, "Message logged");
        Ok(id)
    }

    /// Every record, oldest first
    pub fn fetch_all(&self) -> Result<Vec<LogRecord>> {
        self.query("SELECT id, queue, message FROM messages ORDER BY id ASC", params![])
    }

    /// Records of a single queue, oldest first
    pub fn fetch_queue(&self, queue: &str) -> Result<Vec<LogRecord>> {
        self.query(
            "SELECT id, queue, message FROM messages WHERE queue = ?1 ORDER BY id ASC",
            params![queue],
        )
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<LogRecord>> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or(Error::Closed("communication log"))?;

        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(LogRecord {
                id: row.get(0)?,
                queue: row.get(1)?,
                message: row.get(2)?,
            })
        })?;

        let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Release the database handle. Later reads and writes fail with `Closed`.
    pub fn close(&self) -> Result<()> {
        let conn = self.conn.lock().take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, e)| Error::Storage(e))?;
            tracing::debug!("[CommunicationLog] Closed {:?}", self.db_path);
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_and_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let log = CommunicationLog::open(temp_dir.path().join("comm.db")).unwrap();

        log.log("queue", "hello").unwrap();

        let rows = log.fetch_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].queue, "queue");
        assert_eq!(rows[0].message, "hello");
    }

    #[test]
    fn test_ids_strictly_increase() {
        let log = CommunicationLog::open_in_memory().unwrap();

        let first = log.log("a", "1").unwrap();
        let second = log.log("b", "2").unwrap();
        let third = log.log("a", "3").unwrap();
        assert!(first < second && second < third);

        let ids: Vec<i64> = log.fetch_all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn test_fetch_queue_filters() {
        let log = CommunicationLog::open_in_memory().unwrap();
        log.log("a", "1").unwrap();
        log.log("b", "2").unwrap();
        log.log("a", "3").unwrap();

        let messages: Vec<String> = log
            .fetch_queue("a")
            .unwrap()
            .into_iter()
            .map(|r| r.message)
            .collect();
        assert_eq!(messages, vec!["1", "3"]);
    }

    #[test]
    fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("comm.db");

        let log = CommunicationLog::open(&path).unwrap();
        let id = log.log("queue", "persisted").unwrap();
        log.close().unwrap();

        let reopened = CommunicationLog::open(&path).unwrap();
        let rows = reopened.fetch_all().unwrap();
        assert_eq!(
            rows,
            vec![LogRecord {
                id,
                queue: "queue".to_string(),
                message: "persisted".to_string(),
            }]
        );
        assert!(reopened.log("queue", "next").unwrap() > id);
    }

    #[test]
    fn test_close_is_idempotent() {
        let log = CommunicationLog::open_in_memory().unwrap();
        log.close().unwrap();
        log.close().unwrap();
        assert!(log.is_closed());

        assert!(matches!(log.log("q", "m"), Err(Error::Closed(_))));
        assert!(matches!(log.fetch_all(), Err(Error::Closed(_))));
    }
}
