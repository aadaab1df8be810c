//! Employee registry use-case service.
//!
//! # Responsibility
//! - Decide whether a registration or update is accepted, and why not.
//! - Delegate persistence to the repository contract.
//!
//! # Invariants
//! - Rejections are values, never errors; storage failures propagate
//!   unchanged because the service has no compensating action.
//! - The employee code is checked before the national number, and a code
//!   duplicate short-circuits the number check.
//! - `id` and `registered_at` are never rewritten by `update`.
//! - The service holds no lock around check-then-act; concurrent duplicate
//!   submissions are resolved by the store's own uniqueness constraints.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, RepoResult};
use serde::{Deserialize, Serialize};

/// Why a registration or update was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Another record already carries the submitted employee code.
    DuplicateCode,
    /// Another record already carries the submitted national number.
    DuplicateNumber,
}

/// Logical form field a rejection concerns.
///
/// Presentation callers map this to their own field-error mechanism; the
/// core does not know any concrete form binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeField {
    EmployeeCode,
    NationalNumber,
}

impl RejectReason {
    /// Returns the field the rejection should be attached to.
    pub fn field(self) -> EmployeeField {
        match self {
            Self::DuplicateCode => EmployeeField::EmployeeCode,
            Self::DuplicateNumber => EmployeeField::NationalNumber,
        }
    }
}

/// Outcome of [`EmployeeService::register`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterOutcome {
    /// Record persisted; carries the saved record with identity assigned.
    Accepted(Employee),
    Rejected(RejectReason),
}

/// Outcome of [`EmployeeService::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Record persisted; carries the saved record.
    Updated(Employee),
    /// No record with the submitted identity exists. A normal outcome,
    /// not an error.
    NotFound,
    Rejected(RejectReason),
}

/// Use-case service for employee registry operations.
///
/// Generic over the repository contract so decision logic is testable
/// against an in-memory fake without a real database.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all employees in store order.
    pub fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.repo.list_employees()
    }

    /// Looks up one employee; `Ok(None)` when the identity is unknown.
    pub fn find_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.repo.get_employee(id)
    }

    /// Registers a new employee.
    ///
    /// # Contract
    /// - The caller has already run field-format validation on `candidate`.
    /// - The employee code must be unused; a present, non-empty national
    ///   number must be unused. Code is checked first and wins when both
    ///   collide.
    /// - On acceptance, `registered_at` is stamped with today's date and the
    ///   returned record carries the store-assigned identity.
    pub fn register(&self, candidate: &Employee) -> RepoResult<RegisterOutcome> {
        if self.repo.exists_by_code(&candidate.employee_code)? {
            return Ok(RegisterOutcome::Rejected(RejectReason::DuplicateCode));
        }

        if let Some(number) = candidate.national_number_value() {
            if self.repo.exists_by_national_number(number)? {
                return Ok(RegisterOutcome::Rejected(RejectReason::DuplicateNumber));
            }
        }

        let mut record = candidate.clone();
        // Identity is store-assigned; a caller-supplied id must not turn a
        // registration into an overwrite.
        record.id = None;
        record.registered_at = Some(chrono::Local::now().date_naive());

        let saved = self.repo.save_employee(&record)?;
        Ok(RegisterOutcome::Accepted(saved))
    }

    /// Updates an existing employee.
    ///
    /// # Contract
    /// - The caller has already run field-format validation on `candidate`.
    /// - `candidate.id` names the record to update; a missing or unknown
    ///   identity yields [`UpdateOutcome::NotFound`].
    /// - Duplicate checks skip the record itself, so keeping one's own code
    ///   or number is always allowed.
    /// - Only `employee_code`, `name`, `national_number` and `remarks` are
    ///   replaced; `id` and `registered_at` stay untouched.
    pub fn update(&self, candidate: &Employee) -> RepoResult<UpdateOutcome> {
        let Some(id) = candidate.id else {
            return Ok(UpdateOutcome::NotFound);
        };
        let Some(mut existing) = self.repo.get_employee(id)? else {
            return Ok(UpdateOutcome::NotFound);
        };

        if self
            .repo
            .exists_by_code_excluding(&candidate.employee_code, id)?
        {
            return Ok(UpdateOutcome::Rejected(RejectReason::DuplicateCode));
        }

        if let Some(number) = candidate.national_number_value() {
            if self.repo.exists_by_national_number_excluding(number, id)? {
                return Ok(UpdateOutcome::Rejected(RejectReason::DuplicateNumber));
            }
        }

        existing.employee_code = candidate.employee_code.clone();
        existing.name = candidate.name.clone();
        existing.national_number = candidate.national_number.clone();
        existing.remarks = candidate.remarks.clone();

        let saved = self.repo.save_employee(&existing)?;
        Ok(UpdateOutcome::Updated(saved))
    }

    /// Deletes an employee by identity.
    ///
    /// Idempotent: deleting an unknown identity succeeds and changes
    /// nothing.
    pub fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        self.repo.delete_employee(id)
    }
}
