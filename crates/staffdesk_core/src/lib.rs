//! Core domain logic for the staffdesk employee portal.
//! This crate is the single source of truth for portal data invariants.

pub mod config;
pub mod document;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, RemoteStoreConfig};
pub use document::{DocumentError, DocumentResult, DocumentStore, JsonBinStore, SqliteDocumentStore};
pub use logging::{default_log_level, init_console_logging, init_logging, logging_status, LogSink};
pub use model::dataset::{Dataset, StoreFilter};
pub use model::employee::Employee;
pub use model::payslip::Payslip;
pub use model::store::Store;
pub use model::validation::ValidationError;
pub use repo::portal_repo::PortalRepository;
pub use service::account_service::{AccountService, PasswordChange, Role, Session};
pub use service::admin_service::{AdminService, EmployeeUpdate, NewEmployee, NewPayslip, NewStore};
pub use service::credentials::{CredentialVerifier, PlaintextCredentials};
pub use service::error::{ServiceError, ServiceResult};

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
