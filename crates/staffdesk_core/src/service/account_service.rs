//! Employee self-service use-cases: login, own payslips, password change.

use crate::document::DocumentStore;
use crate::model::employee::Employee;
use crate::model::payslip::Payslip;
use crate::model::validation::require_field;
use crate::repo::portal_repo::PortalRepository;
use crate::service::credentials::{CredentialVerifier, PlaintextCredentials};
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Which portal area an authenticated account may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employee,
}

/// Authenticated account plus its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub employee: Employee,
    pub role: Role,
}

/// Input for changing one's own password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current: String,
    pub new_password: String,
    pub confirmation: String,
}

/// Self-service facade over the portal repository.
pub struct AccountService<'repo, S: DocumentStore, C: CredentialVerifier = PlaintextCredentials> {
    repo: &'repo mut PortalRepository<S>,
    credentials: C,
}

impl<'repo, S: DocumentStore> AccountService<'repo, S> {
    /// Creates a service using plaintext password comparison.
    pub fn new(repo: &'repo mut PortalRepository<S>) -> Self {
        Self::with_credentials(repo, PlaintextCredentials)
    }
}

impl<'repo, S: DocumentStore, C: CredentialVerifier> AccountService<'repo, S, C> {
    /// Creates a service with a custom credential verifier.
    pub fn with_credentials(repo: &'repo mut PortalRepository<S>, credentials: C) -> Self {
        Self { repo, credentials }
    }

    /// Authenticates by linear scan over accounts.
    ///
    /// No lockout or rate limiting is applied.
    pub fn login(&self, id: &str, password: &str) -> ServiceResult<Session> {
        // Blank checks trim; the id match itself is exact.
        require_field("id", id)?;
        require_field("password", password)?;

        let matched = self
            .repo
            .snapshot()
            .employees
            .iter()
            .find(|employee| employee.id == id && self.credentials.verify(employee, password));

        match matched {
            Some(employee) => {
                let role = if employee.is_admin {
                    Role::Admin
                } else {
                    Role::Employee
                };
                info!("event=login module=service status=ok employee_id={id} role={role:?}");
                Ok(Session {
                    employee: employee.clone(),
                    role,
                })
            }
            None => {
                warn!("event=login module=service status=error error_code=invalid_credentials");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Payslips of `employee_id`, optionally restricted to one display month.
    pub fn own_payslips(&self, employee_id: &str, month: Option<&str>) -> Vec<Payslip> {
        self.repo
            .snapshot()
            .payslips_of(employee_id, month)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct months available to `employee_id`, first-seen order.
    pub fn own_payslip_months(&self, employee_id: &str) -> Vec<String> {
        self.repo
            .snapshot()
            .payslip_months_of(employee_id)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Display name of the employee's store.
    pub fn store_name(&self, store_id: &str) -> String {
        self.repo.snapshot().store_name(store_id).to_string()
    }

    /// Replaces the account password after checking the current one.
    ///
    /// Check order: all fields present, current password matches,
    /// confirmation matches.
    pub fn change_password(
        &mut self,
        employee_id: &str,
        change: &PasswordChange,
    ) -> ServiceResult<()> {
        require_field("current", &change.current)?;
        require_field("new_password", &change.new_password)?;
        require_field("confirmation", &change.confirmation)?;

        let current = self.repo.snapshot();
        let employee = current
            .find_employee(employee_id)
            .ok_or_else(|| ServiceError::EmployeeNotFound(employee_id.to_string()))?;
        if !self.credentials.verify(employee, &change.current) {
            return Err(ServiceError::WrongCurrentPassword);
        }
        if change.new_password != change.confirmation {
            return Err(ServiceError::PasswordConfirmationMismatch);
        }

        let encoded = self.credentials.encode(&change.new_password);
        let mut next = current.clone();
        for employee in next.employees.iter_mut().filter(|e| e.id == employee_id) {
            employee.password = encoded.clone();
        }
        if !self.repo.save_dataset(next) {
            return Err(ServiceError::PersistFailed);
        }

        info!("event=password_change module=service status=ok employee_id={employee_id}");
        Ok(())
    }
}
