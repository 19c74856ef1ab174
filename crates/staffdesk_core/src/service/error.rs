//! Service error taxonomy surfaced to callers.

use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rejection or persistence failure for a portal use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input field or format violation.
    Validation(ValidationError),
    /// Normalized store code is already taken.
    DuplicateStoreCode(String),
    /// Referenced store does not exist.
    StoreNotFound(String),
    /// Store still has employees assigned and cannot be removed.
    StoreHasEmployees { store_id: String, employees: usize },
    /// Employee id (login) is already taken.
    DuplicateEmployeeId(String),
    /// Referenced employee does not exist.
    EmployeeNotFound(String),
    /// Payslip target is an admin or belongs to another store.
    EmployeeNotInStore {
        employee_id: String,
        store_id: String,
    },
    /// Referenced payslip does not exist.
    PayslipNotFound(String),
    /// Login id/password pair did not match any account.
    InvalidCredentials,
    /// Supplied current password does not match the stored one.
    WrongCurrentPassword,
    /// New password and confirmation differ.
    PasswordConfirmationMismatch,
    /// Document store rejected or never received the write.
    PersistFailed,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateStoreCode(code) => write!(f, "store code already exists: {code}"),
            Self::StoreNotFound(id) => write!(f, "store not found: {id}"),
            Self::StoreHasEmployees {
                store_id,
                employees,
            } => write!(
                f,
                "store {store_id} still has {employees} employee(s); reassign or remove them first"
            ),
            Self::DuplicateEmployeeId(id) => write!(f, "employee id already exists: {id}"),
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::EmployeeNotInStore {
                employee_id,
                store_id,
            } => write!(f, "employee {employee_id} is not a member of store {store_id}"),
            Self::PayslipNotFound(id) => write!(f, "payslip not found: {id}"),
            Self::InvalidCredentials => write!(f, "invalid user or password"),
            Self::WrongCurrentPassword => write!(f, "current password is incorrect"),
            Self::PasswordConfirmationMismatch => {
                write!(f, "new password and confirmation do not match")
            }
            Self::PersistFailed => write!(f, "failed to save portal data"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
