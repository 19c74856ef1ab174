//! Field-level validation shared by all write use-cases.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field or format violation detected before any write is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required input was empty or whitespace-only.
    MissingField(&'static str),
    /// Month input was not `YYYY-MM` with a month in `01..=12`.
    InvalidMonth(String),
    /// Payslip link does not point at the approved sharing domain.
    UnapprovedLink(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::InvalidMonth(value) => {
                write!(f, "month must use YYYY-MM format, got `{value}`")
            }
            Self::UnapprovedLink(value) => {
                write!(f, "payslip link must be a shared document link, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns the trimmed value, or `MissingField` when nothing is left.
pub fn require_field<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

/// Returns whether a free-form input should be treated as "not provided".
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
