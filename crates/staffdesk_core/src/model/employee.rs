//! Employee (login account) model.
//!
//! # Invariants
//! - `id` doubles as the login username and is unique across employees.
//! - Admin accounts carry an empty `store_id`.
//! - `password` is plaintext; comparisons go through
//!   `service::credentials::CredentialVerifier`.

use crate::model::store::StoreId;
use crate::model::wire::null_as_default;
use serde::{Deserialize, Serialize};

/// Login username / registration number.
pub type EmployeeId = String;

/// One portal account, either an admin or a store employee.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    /// Empty for admin accounts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub store_id: StoreId,
}

impl Employee {
    /// Creates a non-admin employee assigned to `store_id`.
    pub fn new(
        id: impl Into<EmployeeId>,
        name: impl Into<String>,
        password: impl Into<String>,
        store_id: impl Into<StoreId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            password: password.into(),
            is_admin: false,
            store_id: store_id.into(),
        }
    }

    /// Creates an admin account, which is never attached to a store.
    pub fn admin(
        id: impl Into<EmployeeId>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            password: password.into(),
            is_admin: true,
            store_id: StoreId::new(),
        }
    }

    /// Returns whether this employee counts toward `store_id`'s headcount.
    pub fn counts_toward(&self, store_id: &str) -> bool {
        !self.is_admin && self.store_id == store_id
    }
}

// Manual impl keeps plaintext passwords out of debug logs.
impl std::fmt::Debug for Employee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Employee")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .field("store_id", &self.store_id)
            .finish()
    }
}
