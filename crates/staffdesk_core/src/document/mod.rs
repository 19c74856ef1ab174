//! Whole-document persistence boundary.
//!
//! # Responsibility
//! - Define the `DocumentStore` contract: fetch the portal document, replace
//!   it wholesale.
//! - Provide the HTTP backend used in production and a SQLite backend for
//!   local runs and tests.
//!
//! # Invariants
//! - `replace` always overwrites the entire document in one call.
//! - `fetch` returns the stored body as-is; shape checks belong to the
//!   repository.
//! - Errors distinguish "could not reach storage" from "reached storage but
//!   the body is unreadable" so callers can decide whether to self-heal.

use crate::model::dataset::Dataset;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http;
pub mod migrations;
pub mod sqlite;

pub use http::JsonBinStore;
pub use sqlite::SqliteDocumentStore;

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Persistence error for document fetch/replace.
#[derive(Debug)]
pub enum DocumentError {
    /// Request never completed (DNS, connect, TLS, timeout).
    Transport(reqwest::Error),
    /// Storage answered with a non-success status.
    Status { code: u16 },
    /// Storage answered but the body is not valid JSON.
    Decode(String),
    /// Document could not be serialized for writing.
    Encode(serde_json::Error),
    /// Local SQLite backend failure.
    Sqlite(rusqlite::Error),
    /// Local database was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DocumentError {
    /// Returns whether storage was reached and produced an unusable body.
    ///
    /// The repository overwrites such documents with the seed dataset; pure
    /// transport failures are never answered with a write.
    pub fn is_data_shape(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Stable short code for structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "http_status",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::Sqlite(_) => "sqlite",
            Self::UnsupportedSchemaVersion { .. } => "schema_version",
        }
    }
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "document store unreachable: {err}"),
            Self::Status { code } => write!(f, "document store returned HTTP {code}"),
            Self::Decode(details) => write!(f, "document body is not valid JSON: {details}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "document database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::Status { .. } | Self::Decode(_) | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<reqwest::Error> for DocumentError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<rusqlite::Error> for DocumentError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Storage contract for the single portal document.
pub trait DocumentStore {
    /// Short backend name used in log lines.
    fn backend(&self) -> &'static str;

    /// Returns the stored document body.
    ///
    /// `Value::Null` means storage holds no document yet.
    fn fetch(&self) -> DocumentResult<Value>;

    /// Overwrites the stored document with `document`.
    fn replace(&self, document: &Dataset) -> DocumentResult<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn fetch(&self) -> DocumentResult<Value> {
        (**self).fetch()
    }

    fn replace(&self, document: &Dataset) -> DocumentResult<()> {
        (**self).replace(document)
    }
}
