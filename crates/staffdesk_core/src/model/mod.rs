//! Portal domain model shared by repository and service layers.
//!
//! # Responsibility
//! - Define the persisted shapes of stores, employees and payslips.
//! - Keep derived fields (`employee_count`) out of caller control.
//! - Provide the seed dataset used when the remote document is unusable.
//!
//! # Invariants
//! - `Store::employee_count` is only written by `Dataset::recount_employees`.
//! - Wire names are camelCase to match the stored JSON document.

pub mod dataset;
pub mod employee;
pub mod payslip;
pub mod store;
pub mod validation;
pub mod wire;
