//! Payslip link model and input normalization.
//!
//! # Responsibility
//! - Define the persisted payslip record.
//! - Transcode month input (`YYYY-MM`) into the display form `Maio/2023`.
//! - Check that links point at the approved document-sharing domain.
//! - Generate time-based payslip ids.
//!
//! # Invariants
//! - `store_id` is a copy of the owning employee's store at creation time.
//! - Generated ids never collide with ids already present in the dataset.

use crate::model::employee::EmployeeId;
use crate::model::store::StoreId;
use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::model::wire::null_as_default;
use serde::{Deserialize, Serialize};

/// Host fragment every payslip link must contain.
pub const APPROVED_LINK_DOMAIN: &str = "drive.google.com";

/// Month names indexed by `MM - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

static MONTH_INPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("valid month input regex"));

/// One payslip document link published for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    /// Time-based id (epoch milliseconds as decimal string).
    pub id: String,
    pub employee_id: EmployeeId,
    /// Display month, e.g. `Maio/2023`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub month: String,
    /// External document URL; opened by clients, never fetched here.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pdf_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub store_id: StoreId,
}

/// Converts `YYYY-MM` into `<MonthName>/<YYYY>`.
///
/// # Errors
/// - `InvalidMonth` when the input does not match `YYYY-MM` or the month is
///   outside `01..=12`.
pub fn format_month(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidMonth(trimmed.to_string());
    let caps = MONTH_INPUT_RE.captures(trimmed).ok_or_else(invalid)?;
    let year = caps.get(1).map(|m| m.as_str()).ok_or_else(invalid)?;
    let month = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .ok_or_else(invalid)?;
    let name = month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index))
        .ok_or_else(invalid)?;
    Ok(format!("{name}/{year}"))
}

/// Rejects links outside the approved sharing domain.
pub fn check_link(link: &str) -> Result<(), ValidationError> {
    if link.contains(APPROVED_LINK_DOMAIN) {
        Ok(())
    } else {
        Err(ValidationError::UnapprovedLink(link.to_string()))
    }
}

/// Produces a time-based id that is unique within `existing`.
///
/// Starts from `now_epoch_ms` and steps forward on collision, so two
/// payslips created within the same millisecond still get distinct ids.
pub fn next_payslip_id(existing: &[Payslip], now_epoch_ms: u128) -> String {
    let mut candidate = now_epoch_ms;
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|payslip| payslip.id == id) {
            return id;
        }
        candidate += 1;
    }
}
