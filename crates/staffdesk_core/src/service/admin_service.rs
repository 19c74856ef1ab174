//! Administrator use-cases: stores, employees and payslip links.
//!
//! # Responsibility
//! - Validate admin input against the current snapshot.
//! - Apply cascades (store -> payslips, employee -> payslips).
//! - Persist the complete next snapshot through the repository.
//!
//! # Invariants
//! - Store codes are lowercase, whitespace-free and unique ignoring case.
//! - Stores with employees are never removed.
//! - Employee ids are unique; non-admin employees reference an existing store.
//! - Payslips reference a non-admin employee of the payslip's store.

use crate::document::DocumentStore;
use crate::model::dataset::Dataset;
use crate::model::employee::Employee;
use crate::model::payslip::{check_link, format_month, next_payslip_id, Payslip};
use crate::model::store::{normalize_store_code, Store};
use crate::model::validation::{is_blank, require_field};
use crate::repo::portal_repo::PortalRepository;
use crate::service::credentials::{CredentialVerifier, PlaintextCredentials};
use crate::service::error::{ServiceError, ServiceResult};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};

/// Input for registering a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewStore {
    pub name: String,
    /// Free-form code; normalized to lowercase without whitespace.
    pub code: String,
}

/// Input for registering an employee account.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NewEmployee {
    pub id: String,
    pub name: String,
    pub store_id: String,
    pub password: String,
}

/// Input for editing an employee account.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    pub name: String,
    pub store_id: String,
    /// Blank keeps the current password.
    pub password: String,
}

/// Input for publishing a payslip link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPayslip {
    pub store_id: String,
    pub employee_id: String,
    /// `YYYY-MM`, as produced by month pickers.
    pub month: String,
    pub link: String,
}

/// Admin facade over the portal repository.
pub struct AdminService<'repo, S: DocumentStore, C: CredentialVerifier = PlaintextCredentials> {
    repo: &'repo mut PortalRepository<S>,
    credentials: C,
}

impl<'repo, S: DocumentStore> AdminService<'repo, S> {
    /// Creates a service using plaintext password storage.
    pub fn new(repo: &'repo mut PortalRepository<S>) -> Self {
        Self::with_credentials(repo, PlaintextCredentials)
    }
}

impl<'repo, S: DocumentStore, C: CredentialVerifier> AdminService<'repo, S, C> {
    /// Creates a service with a custom password encoding scheme.
    pub fn with_credentials(repo: &'repo mut PortalRepository<S>, credentials: C) -> Self {
        Self { repo, credentials }
    }

    /// Current snapshot, for list views and lookups.
    pub fn snapshot(&self) -> &Dataset {
        self.repo.snapshot()
    }

    /// Registers a store under a normalized, unused code.
    pub fn add_store(&mut self, request: &NewStore) -> ServiceResult<Store> {
        let name = require_field("name", &request.name)?;
        require_field("code", &request.code)?;
        let code = normalize_store_code(&request.code);

        let current = self.repo.snapshot();
        if current.has_store_code(&code) {
            return Err(ServiceError::DuplicateStoreCode(code));
        }

        let store = Store::new(code, name);
        let mut next = current.clone();
        next.stores.push(store.clone());
        self.commit(next)?;

        info!(
            "event=store_add module=service status=ok store_id={}",
            store.id
        );
        Ok(store)
    }

    /// Removes an empty store together with every payslip filed under it.
    pub fn delete_store(&mut self, store_id: &str) -> ServiceResult<()> {
        let current = self.repo.snapshot();
        if current.find_store(store_id).is_none() {
            return Err(ServiceError::StoreNotFound(store_id.to_string()));
        }
        let employees = current.employees_referencing(store_id);
        if employees > 0 {
            return Err(ServiceError::StoreHasEmployees {
                store_id: store_id.to_string(),
                employees,
            });
        }

        let next = current.without_store(store_id);
        self.commit(next)?;

        info!("event=store_delete module=service status=ok store_id={store_id}");
        Ok(())
    }

    /// Registers a non-admin employee in an existing store.
    pub fn add_employee(&mut self, request: &NewEmployee) -> ServiceResult<Employee> {
        let name = require_field("name", &request.name)?;
        let id = require_field("id", &request.id)?;
        let store_id = require_field("store_id", &request.store_id)?;
        require_field("password", &request.password)?;

        let current = self.repo.snapshot();
        if current.find_employee(id).is_some() {
            return Err(ServiceError::DuplicateEmployeeId(id.to_string()));
        }
        if current.find_store(store_id).is_none() {
            return Err(ServiceError::StoreNotFound(store_id.to_string()));
        }

        let employee = Employee::new(
            id,
            name,
            self.credentials.encode(&request.password),
            store_id,
        );
        let mut next = current.clone();
        next.employees.push(employee.clone());
        self.commit(next)?;

        info!(
            "event=employee_add module=service status=ok employee_id={} store_id={}",
            employee.id, employee.store_id
        );
        Ok(employee)
    }

    /// Updates name and store; replaces the password only when one is given.
    ///
    /// Only non-admin employees can be edited.
    pub fn edit_employee(
        &mut self,
        employee_id: &str,
        update: &EmployeeUpdate,
    ) -> ServiceResult<Employee> {
        let name = require_field("name", &update.name)?;
        let store_id = require_field("store_id", &update.store_id)?;

        let current = self.repo.snapshot();
        // Admin accounts are not staff and never carry a store.
        if !current
            .find_employee(employee_id)
            .is_some_and(|employee| !employee.is_admin)
        {
            return Err(ServiceError::EmployeeNotFound(employee_id.to_string()));
        }
        if current.find_store(store_id).is_none() {
            return Err(ServiceError::StoreNotFound(store_id.to_string()));
        }

        let new_password = if is_blank(&update.password) {
            None
        } else {
            Some(self.credentials.encode(&update.password))
        };

        let mut next = current.clone();
        let mut edited = None;
        for employee in next
            .employees
            .iter_mut()
            .filter(|e| e.id == employee_id && !e.is_admin)
        {
            employee.name = name.to_string();
            employee.store_id = store_id.to_string();
            if let Some(password) = &new_password {
                employee.password = password.clone();
            }
            edited = Some(employee.clone());
        }
        let edited =
            edited.ok_or_else(|| ServiceError::EmployeeNotFound(employee_id.to_string()))?;
        self.commit(next)?;

        info!(
            "event=employee_edit module=service status=ok employee_id={} store_id={} password_changed={}",
            edited.id,
            edited.store_id,
            new_password.is_some()
        );
        Ok(edited)
    }

    /// Removes an employee together with every payslip issued to them.
    pub fn delete_employee(&mut self, employee_id: &str) -> ServiceResult<()> {
        let current = self.repo.snapshot();
        if current.find_employee(employee_id).is_none() {
            return Err(ServiceError::EmployeeNotFound(employee_id.to_string()));
        }

        let next = current.without_employee(employee_id);
        self.commit(next)?;

        info!("event=employee_delete module=service status=ok employee_id={employee_id}");
        Ok(())
    }

    /// Publishes a payslip link, stamping a time-based id.
    pub fn add_payslip(&mut self, request: &NewPayslip) -> ServiceResult<Payslip> {
        self.add_payslip_at(request, now_epoch_ms())
    }

    /// Same as [`Self::add_payslip`] with an explicit clock reading.
    pub fn add_payslip_at(
        &mut self,
        request: &NewPayslip,
        now_epoch_ms: u128,
    ) -> ServiceResult<Payslip> {
        let store_id = require_field("store_id", &request.store_id)?;
        let employee_id = require_field("employee_id", &request.employee_id)?;
        let month_input = require_field("month", &request.month)?;
        let link = require_field("link", &request.link)?;
        check_link(link)?;
        let month = format_month(month_input)?;

        let current = self.repo.snapshot();
        if current.find_store(store_id).is_none() {
            return Err(ServiceError::StoreNotFound(store_id.to_string()));
        }
        let employee = current
            .find_employee(employee_id)
            .ok_or_else(|| ServiceError::EmployeeNotFound(employee_id.to_string()))?;
        if !employee.counts_toward(store_id) {
            return Err(ServiceError::EmployeeNotInStore {
                employee_id: employee_id.to_string(),
                store_id: store_id.to_string(),
            });
        }

        let payslip = Payslip {
            id: next_payslip_id(&current.payslips, now_epoch_ms),
            employee_id: employee.id.clone(),
            month,
            pdf_link: link.to_string(),
            store_id: employee.store_id.clone(),
        };
        let mut next = current.clone();
        next.payslips.push(payslip.clone());
        self.commit(next)?;

        info!(
            "event=payslip_add module=service status=ok payslip_id={} employee_id={} store_id={}",
            payslip.id, payslip.employee_id, payslip.store_id
        );
        Ok(payslip)
    }

    /// Removes one payslip.
    pub fn delete_payslip(&mut self, payslip_id: &str) -> ServiceResult<()> {
        let current = self.repo.snapshot();
        if current.find_payslip(payslip_id).is_none() {
            return Err(ServiceError::PayslipNotFound(payslip_id.to_string()));
        }

        let next = current.without_payslip(payslip_id);
        self.commit(next)?;

        info!("event=payslip_delete module=service status=ok payslip_id={payslip_id}");
        Ok(())
    }

    fn commit(&mut self, next: Dataset) -> ServiceResult<()> {
        if self.repo.save_dataset(next) {
            Ok(())
        } else {
            Err(ServiceError::PersistFailed)
        }
    }
}

fn now_epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}
