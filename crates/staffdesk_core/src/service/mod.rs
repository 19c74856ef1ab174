//! Portal use-case services.
//!
//! # Responsibility
//! - Enforce every data rule before a write reaches the repository.
//! - Build the full next snapshot for each mutation and hand it to `save`.
//! - Keep callers (CLI, UI bindings) decoupled from storage details.
//!
//! # Invariants
//! - A rejected operation performs no write and leaves the snapshot as-is.
//! - A failed write surfaces as `ServiceError::PersistFailed`, and the
//!   snapshot keeps its pre-operation state.

pub mod account_service;
pub mod admin_service;
pub mod credentials;
pub mod error;
