//! Portal repository over a whole-document store.
//!
//! # Responsibility
//! - Load the shared document, validating its minimum shape.
//! - Fall back to the seed dataset and heal the remote copy when needed.
//! - Save full three-collection snapshots with recomputed store headcounts.
//!
//! # Invariants
//! - Transport failures on load return the seed without writing.
//! - Shape failures on load (bad JSON, `stores`/`employees` missing or not
//!   arrays) return the seed and write it back once.
//! - A single unreadable record is skipped and logged; it never discards the
//!   rest of the document.
//! - A failed save leaves the in-memory snapshot untouched.
//! - No concurrency token: the last successful save wins.

use crate::document::{DocumentError, DocumentStore};
use crate::model::dataset::Dataset;
use crate::model::employee::Employee;
use crate::model::payslip::Payslip;
use crate::model::store::Store;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;

/// Why a fetched document could not be used.
#[derive(Debug)]
enum LoadFailure {
    Unreachable(DocumentError),
    Malformed(String),
}

/// Repository reconciling the portal snapshot with its document store.
pub struct PortalRepository<S: DocumentStore> {
    store: S,
    snapshot: Dataset,
}

impl<S: DocumentStore> PortalRepository<S> {
    /// Creates a repository with an empty snapshot; call [`Self::load`] next.
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: Dataset::default(),
        }
    }

    /// Creates a repository and loads the current document.
    pub fn open(store: S) -> Self {
        let mut repo = Self::new(store);
        repo.load();
        repo
    }

    /// Current in-memory snapshot.
    pub fn snapshot(&self) -> &Dataset {
        &self.snapshot
    }

    /// Underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches the document and replaces the in-memory snapshot.
    ///
    /// Never fails: unreachable storage yields the seed dataset, and a
    /// malformed document is additionally overwritten with the seed so the
    /// remote converges to a valid state.
    pub fn load(&mut self) -> Dataset {
        let started_at = Instant::now();
        let backend = self.store.backend();

        let dataset = match self.fetch_dataset() {
            Ok(dataset) => {
                info!(
                    "event=portal_load module=repo backend={backend} status=ok duration_ms={} stores={} employees={} payslips={}",
                    started_at.elapsed().as_millis(),
                    dataset.stores.len(),
                    dataset.employees.len(),
                    dataset.payslips.len()
                );
                dataset
            }
            Err(LoadFailure::Unreachable(err)) => {
                error!(
                    "event=portal_load module=repo backend={backend} status=error duration_ms={} error_code={} fallback=seed error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Dataset::seed()
            }
            Err(LoadFailure::Malformed(details)) => {
                warn!(
                    "event=portal_load module=repo backend={backend} status=error duration_ms={} error_code=invalid_shape fallback=seed_and_heal details={}",
                    started_at.elapsed().as_millis(),
                    details
                );
                let seed = Dataset::seed();
                if let Err(err) = self.store.replace(&seed) {
                    error!(
                        "event=portal_heal module=repo backend={backend} status=error error_code={} error={}",
                        err.code(),
                        err
                    );
                }
                seed
            }
        };

        self.snapshot = dataset.clone();
        dataset
    }

    /// Persists a full proposed next state.
    ///
    /// Store headcounts are recomputed from `employees` before writing. On
    /// success the snapshot becomes the written state and `true` is returned;
    /// on any failure the snapshot is unchanged and `false` is returned.
    pub fn save(
        &mut self,
        stores: Vec<Store>,
        employees: Vec<Employee>,
        payslips: Vec<Payslip>,
    ) -> bool {
        self.save_dataset(Dataset::new(stores, employees, payslips))
    }

    /// Same as [`Self::save`] for an already assembled snapshot.
    pub fn save_dataset(&mut self, mut next: Dataset) -> bool {
        let started_at = Instant::now();
        let backend = self.store.backend();
        next.recount_employees();

        match self.store.replace(&next) {
            Ok(()) => {
                info!(
                    "event=portal_save module=repo backend={backend} status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                self.snapshot = next;
                true
            }
            Err(err) => {
                error!(
                    "event=portal_save module=repo backend={backend} status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                false
            }
        }
    }

    fn fetch_dataset(&self) -> Result<Dataset, LoadFailure> {
        let body = match self.store.fetch() {
            Ok(body) => body,
            Err(err) if err.is_data_shape() => return Err(LoadFailure::Malformed(err.to_string())),
            Err(err) => return Err(LoadFailure::Unreachable(err)),
        };
        parse_document(body).map_err(LoadFailure::Malformed)
    }
}

/// Validates the minimum document shape and builds a snapshot.
///
/// `stores` and `employees` must be arrays; missing or null `payslips`
/// defaults to empty. Stored headcounts are ignored and recomputed.
fn parse_document(body: Value) -> Result<Dataset, String> {
    let mut document = match body {
        Value::Object(document) => document,
        Value::Null => return Err("document is empty".to_string()),
        _ => return Err("document is not a JSON object".to_string()),
    };
    let stores = required_collection(&mut document, "stores")?;
    let employees = required_collection(&mut document, "employees")?;
    let payslips = match document.remove("payslips") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => return Err("`payslips` is not an array".to_string()),
    };

    Ok(Dataset::new(
        decode_records::<Store>("stores", stores),
        decode_records::<Employee>("employees", employees),
        decode_records::<Payslip>("payslips", payslips),
    ))
}

fn required_collection(
    document: &mut serde_json::Map<String, Value>,
    key: &str,
) -> Result<Vec<Value>, String> {
    match document.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        None | Some(Value::Null) => Err(format!("document has no `{key}` collection")),
        Some(_) => Err(format!("`{key}` is not an array")),
    }
}

fn decode_records<T: DeserializeOwned>(collection: &str, items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=portal_load module=repo status=skip_record collection={collection} index={index} error={err}"
                );
                None
            }
        })
        .collect()
}
