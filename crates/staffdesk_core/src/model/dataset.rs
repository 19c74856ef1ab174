//! The three-collection snapshot persisted as one document.
//!
//! # Responsibility
//! - Hold stores, employees and payslips as one unit of persistence.
//! - Recompute derived store headcounts.
//! - Apply cascading removals and serve read-side projections.
//!
//! # Invariants
//! - After `recount_employees`, every store's count equals the number of
//!   non-admin employees referencing it.
//! - Cascade helpers never touch records outside the removed parent's
//!   dependents.

use crate::model::employee::Employee;
use crate::model::payslip::Payslip;
use crate::model::store::Store;
use serde::{Deserialize, Serialize};

/// Fallback store name for dangling store references.
pub const UNKNOWN_STORE_NAME: &str = "Desconhecida";
/// Fallback employee name for dangling employee references.
pub const UNKNOWN_EMPLOYEE_NAME: &str = "Desconhecido";

const SEED_STORES: [(&str, &str); 6] = [
    ("tacaruna", "Tacaruna"),
    ("riomar", "Riomar"),
    ("patteo", "Patteo"),
    ("northway", "North Way"),
    ("difusora", "Difusora"),
    ("caruaru", "Caruaru"),
];
const SEED_ADMIN_ID: &str = "admin";
const SEED_ADMIN_NAME: &str = "Administrador";
const SEED_ADMIN_PASSWORD: &str = "admin123";

/// Full persisted state: the document body written on every save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub stores: Vec<Store>,
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub payslips: Vec<Payslip>,
}

/// Store scope used by admin list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFilter<'a> {
    All,
    Store(&'a str),
}

impl StoreFilter<'_> {
    fn matches(&self, store_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Store(id) => *id == store_id,
        }
    }
}

impl Dataset {
    /// Creates a snapshot and immediately derives store headcounts.
    pub fn new(stores: Vec<Store>, employees: Vec<Employee>, payslips: Vec<Payslip>) -> Self {
        let mut dataset = Self {
            stores,
            employees,
            payslips,
        };
        dataset.recount_employees();
        dataset
    }

    /// Built-in dataset used when the remote document is missing or unusable.
    ///
    /// Six stores with no employees, one admin account, no payslips.
    pub fn seed() -> Self {
        let stores = SEED_STORES
            .iter()
            .map(|(id, name)| Store::new(*id, *name))
            .collect();
        let employees = vec![Employee::admin(
            SEED_ADMIN_ID,
            SEED_ADMIN_NAME,
            SEED_ADMIN_PASSWORD,
        )];
        Self::new(stores, employees, Vec::new())
    }

    /// Recomputes `employee_count` for every store from `employees`.
    pub fn recount_employees(&mut self) {
        let employees = &self.employees;
        for store in &mut self.stores {
            let count = employees
                .iter()
                .filter(|employee| employee.counts_toward(&store.id))
                .count();
            store.set_employee_count(u32::try_from(count).unwrap_or(u32::MAX));
        }
    }

    pub fn find_store(&self, store_id: &str) -> Option<&Store> {
        self.stores.iter().find(|store| store.id == store_id)
    }

    pub fn find_employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees
            .iter()
            .find(|employee| employee.id == employee_id)
    }

    pub fn find_payslip(&self, payslip_id: &str) -> Option<&Payslip> {
        self.payslips.iter().find(|payslip| payslip.id == payslip_id)
    }

    /// Case-insensitive store code lookup.
    pub fn has_store_code(&self, code: &str) -> bool {
        let code = code.to_lowercase();
        self.stores
            .iter()
            .any(|store| store.id.to_lowercase() == code)
    }

    /// Number of employees of any role whose `store_id` points at `store_id`.
    pub fn employees_referencing(&self, store_id: &str) -> usize {
        self.employees
            .iter()
            .filter(|employee| employee.store_id == store_id)
            .count()
    }

    /// Removes one store and every payslip filed under it.
    pub fn without_store(&self, store_id: &str) -> Self {
        Self {
            stores: self
                .stores
                .iter()
                .filter(|store| store.id != store_id)
                .cloned()
                .collect(),
            employees: self.employees.clone(),
            payslips: self
                .payslips
                .iter()
                .filter(|payslip| payslip.store_id != store_id)
                .cloned()
                .collect(),
        }
    }

    /// Removes one employee and every payslip issued to them.
    pub fn without_employee(&self, employee_id: &str) -> Self {
        Self {
            stores: self.stores.clone(),
            employees: self
                .employees
                .iter()
                .filter(|employee| employee.id != employee_id)
                .cloned()
                .collect(),
            payslips: self
                .payslips
                .iter()
                .filter(|payslip| payslip.employee_id != employee_id)
                .cloned()
                .collect(),
        }
    }

    /// Removes one payslip; payslips have no dependents.
    pub fn without_payslip(&self, payslip_id: &str) -> Self {
        Self {
            stores: self.stores.clone(),
            employees: self.employees.clone(),
            payslips: self
                .payslips
                .iter()
                .filter(|payslip| payslip.id != payslip_id)
                .cloned()
                .collect(),
        }
    }

    /// Non-admin employees, optionally limited to one store.
    pub fn employees_in_store(&self, filter: StoreFilter<'_>) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|employee| !employee.is_admin && filter.matches(&employee.store_id))
            .collect()
    }

    /// Employees a payslip for `store_id` may be issued to.
    pub fn employees_eligible_for_payslip(&self, store_id: &str) -> Vec<&Employee> {
        self.employees_in_store(StoreFilter::Store(store_id))
    }

    /// All payslips, optionally limited to one store.
    pub fn payslips_in_store(&self, filter: StoreFilter<'_>) -> Vec<&Payslip> {
        self.payslips
            .iter()
            .filter(|payslip| filter.matches(&payslip.store_id))
            .collect()
    }

    /// One employee's payslips, optionally limited to one display month.
    pub fn payslips_of(&self, employee_id: &str, month: Option<&str>) -> Vec<&Payslip> {
        self.payslips
            .iter()
            .filter(|payslip| payslip.employee_id == employee_id)
            .filter(|payslip| month.map_or(true, |wanted| payslip.month == wanted))
            .collect()
    }

    /// Distinct display months of one employee's payslips, first-seen order.
    pub fn payslip_months_of(&self, employee_id: &str) -> Vec<&str> {
        let mut months: Vec<&str> = Vec::new();
        for payslip in self.payslips_of(employee_id, None) {
            if !months.contains(&payslip.month.as_str()) {
                months.push(payslip.month.as_str());
            }
        }
        months
    }

    /// Display name for a store reference, with a fallback for dangling ids.
    pub fn store_name(&self, store_id: &str) -> &str {
        self.find_store(store_id)
            .map_or(UNKNOWN_STORE_NAME, |store| store.name.as_str())
    }

    /// Display name for an employee reference, with a fallback for dangling ids.
    pub fn employee_name(&self, employee_id: &str) -> &str {
        self.find_employee(employee_id)
            .map_or(UNKNOWN_EMPLOYEE_NAME, |employee| employee.name.as_str())
    }
}
