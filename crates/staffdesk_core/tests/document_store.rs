mod support;

use rusqlite::Connection;
use staffdesk_core::document::migrations::latest_version;
use staffdesk_core::document::sqlite::DEFAULT_DOCUMENT_NAME;
use staffdesk_core::{
    Dataset, DocumentError, DocumentStore, JsonBinStore, RemoteStoreConfig, SqliteDocumentStore,
};
use std::time::Duration;

fn unreachable_store() -> JsonBinStore {
    let config = RemoteStoreConfig::new("test-bin", "test-key")
        .unwrap()
        .with_base_url("http://127.0.0.1:1")
        .unwrap()
        .with_timeout(Some(Duration::from_secs(2)));
    JsonBinStore::new(config).unwrap()
}

#[test]
fn empty_sqlite_store_fetches_null() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    assert!(store.fetch().unwrap().is_null());
    assert_eq!(store.name(), DEFAULT_DOCUMENT_NAME);
}

#[test]
fn sqlite_replace_overwrites_whole_document() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    store.replace(&Dataset::seed()).unwrap();

    let mut smaller = Dataset::seed();
    smaller.stores.truncate(1);
    store.replace(&smaller).unwrap();

    let body = store.fetch().unwrap();
    assert_eq!(body["stores"].as_array().unwrap().len(), 1);
    assert_eq!(body["employees"][0]["isAdmin"], true);
    assert_eq!(body["stores"][0]["employeeCount"], 0);
}

#[test]
fn sqlite_documents_are_isolated_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portal.db");

    let first = SqliteDocumentStore::open(&path).unwrap();
    first.replace(&Dataset::seed()).unwrap();
    drop(first);

    let other = SqliteDocumentStore::open(&path).unwrap().with_name("staging");
    assert!(other.fetch().unwrap().is_null());

    let reopened = SqliteDocumentStore::open(&path).unwrap();
    assert_eq!(reopened.fetch().unwrap()["stores"].as_array().unwrap().len(), 6);
}

#[test]
fn sqlite_store_applies_migrations_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portal.db");

    drop(SqliteDocumentStore::open(&path).unwrap());
    drop(SqliteDocumentStore::open(&path).unwrap());

    let conn = Connection::open(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn sqlite_store_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteDocumentStore::open(&path) {
        Err(DocumentError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be rejected"),
    }
}

#[test]
fn corrupt_sqlite_body_is_a_data_shape_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portal.db");
    drop(SqliteDocumentStore::open(&path).unwrap());

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO documents (name, body, updated_at) VALUES (?1, '{not json', 0);",
        [DEFAULT_DOCUMENT_NAME],
    )
    .unwrap();
    drop(conn);

    let store = SqliteDocumentStore::open(&path).unwrap();
    let err = store.fetch().unwrap_err();
    assert!(err.is_data_shape());
}

#[test]
fn unreachable_http_store_reports_transport_errors() {
    let store = unreachable_store();
    assert_eq!(store.config().document_url(), "http://127.0.0.1:1/b/test-bin");

    let fetch_err = store.fetch().unwrap_err();
    assert!(matches!(fetch_err, DocumentError::Transport(_)));
    assert!(!fetch_err.is_data_shape());

    let replace_err = store.replace(&Dataset::seed()).unwrap_err();
    assert_eq!(replace_err.code(), "transport");
}

#[test]
fn truncated_http_body_is_a_transport_error() {
    let server = support::CannedServer::start(support::TRUNCATED_BODY);
    let err = server.store().fetch().unwrap_err();

    assert!(matches!(err, DocumentError::Transport(_)));
    assert!(!err.is_data_shape());
}

#[test]
fn garbled_http_body_is_a_data_shape_error() {
    let server = support::CannedServer::start(support::GARBLED_BODY);
    let err = server.store().fetch().unwrap_err();

    assert!(err.is_data_shape());
    assert_eq!(err.code(), "decode");
}
