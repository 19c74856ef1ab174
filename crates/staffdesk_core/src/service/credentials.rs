//! Password verification seam.
//!
//! Accounts store plaintext passwords; every comparison goes through
//! `CredentialVerifier` so a hashed scheme can replace `PlaintextCredentials`
//! without touching service callers.

use crate::model::employee::Employee;

/// Checks a supplied secret against an account and encodes new secrets.
pub trait CredentialVerifier {
    /// Returns whether `supplied` unlocks `employee`.
    fn verify(&self, employee: &Employee, supplied: &str) -> bool;

    /// Produces the value stored in `Employee::password` for `new_password`.
    fn encode(&self, new_password: &str) -> String;
}

/// Exact string comparison against the stored plaintext password.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCredentials;

impl CredentialVerifier for PlaintextCredentials {
    fn verify(&self, employee: &Employee, supplied: &str) -> bool {
        employee.password == supplied
    }

    fn encode(&self, new_password: &str) -> String {
        new_password.to_string()
    }
}
