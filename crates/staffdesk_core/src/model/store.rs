//! Store (branch) model.
//!
//! # Invariants
//! - `id` is a lowercase code with no whitespace.
//! - `employee_count` is derived from the employees collection on every
//!   save and load; callers can read it but never set it.

use once_cell::sync::Lazy;
use regex::Regex;
use crate::model::wire::null_as_default;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable store code, also used as foreign key by employees and payslips.
pub type StoreId = String;

/// One physical store employees are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Normalized store code.
    pub id: StoreId,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    // Recomputed after every read.
    #[serde(default, skip_deserializing)]
    employee_count: u32,
}

impl Store {
    /// Creates a store with no counted employees.
    ///
    /// `id` is stored as given; use [`normalize_store_code`] for user input.
    pub fn new(id: impl Into<StoreId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            employee_count: 0,
        }
    }

    /// Number of non-admin employees assigned to this store at last recount.
    pub fn employee_count(&self) -> u32 {
        self.employee_count
    }

    pub(crate) fn set_employee_count(&mut self, count: u32) {
        self.employee_count = count;
    }
}

/// Normalizes a user-entered store code: lowercase with all whitespace removed.
pub fn normalize_store_code(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw, "").to_lowercase()
}
