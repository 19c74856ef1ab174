//! SQLite-backed single-document store.
//!
//! # Responsibility
//! - Keep the portal document as one JSON text row for offline runs.
//! - Mirror the HTTP backend's whole-document replace semantics.
//!
//! # Invariants
//! - Returned stores have migrations fully applied.
//! - `replace` upserts exactly one row keyed by the document name.

use super::migrations::apply_migrations;
use super::{DocumentError, DocumentResult, DocumentStore};
use crate::model::dataset::Dataset;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Row name used when no explicit document name is given.
pub const DEFAULT_DOCUMENT_NAME: &str = "portal";

/// Local document store persisted in one SQLite table.
pub struct SqliteDocumentStore {
    conn: Connection,
    name: String,
}

impl SqliteDocumentStore {
    /// Opens (or creates) a document database file.
    ///
    /// # Side effects
    /// - Applies pending schema migrations.
    /// - Emits `document_open` log events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> DocumentResult<Self> {
        Self::bootstrap("file", || Connection::open(path))
    }

    /// Opens a throwaway in-memory document database.
    pub fn open_in_memory() -> DocumentResult<Self> {
        Self::bootstrap("memory", Connection::open_in_memory)
    }

    /// Selects which row this store reads and writes.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn bootstrap(
        mode: &str,
        open: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> DocumentResult<Self> {
        let started_at = Instant::now();
        info!("event=document_open module=document backend=sqlite status=start mode={mode}");

        let result = open().map_err(DocumentError::from).and_then(|mut conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            apply_migrations(&mut conn)?;
            Ok(conn)
        });

        match result {
            Ok(conn) => {
                info!(
                    "event=document_open module=document backend=sqlite status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    conn,
                    name: DEFAULT_DOCUMENT_NAME.to_string(),
                })
            }
            Err(err) => {
                error!(
                    "event=document_open module=document backend=sqlite status=error mode={mode} duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn fetch(&self) -> DocumentResult<Value> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE name = ?1;",
                params![self.name],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            None => Ok(Value::Null),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|err| DocumentError::Decode(err.to_string()))
            }
        }
    }

    fn replace(&self, document: &Dataset) -> DocumentResult<()> {
        let body = serde_json::to_string(document).map_err(DocumentError::Encode)?;
        self.conn.execute(
            "INSERT INTO documents (name, body, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at;",
            params![self.name, body, now_epoch_ms()],
        )?;
        info!(
            "event=document_replace module=document backend=sqlite status=ok stores={} employees={} payslips={}",
            document.stores.len(),
            document.employees.len(),
            document.payslips.len()
        );
        Ok(())
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
