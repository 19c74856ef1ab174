//! Repository layer: the in-memory portal snapshot and its persistence.
//!
//! # Responsibility
//! - Own the three collections in memory behind one repository object.
//! - Mediate every read/write against a `DocumentStore`.
//!
//! # Invariants
//! - `load` never fails; unusable storage resolves to the seed dataset.
//! - `save` recomputes derived fields and replaces the whole document.
//! - The in-memory snapshot only changes after a successful write or load.

pub mod portal_repo;
