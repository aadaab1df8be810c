//! Employee domain model.
//!
//! # Responsibility
//! - Define the employee record shape shared by repository and service.
//! - Provide field-format validation mirroring the registry's form rules.
//!
//! # Invariants
//! - `id` is store-assigned and never reused for another employee.
//! - `national_number`, when present and non-empty, is exactly 12 digits.
//! - Length limits count characters, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier assigned by the record store on first save.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EmployeeId = i64;

/// Maximum character length of `employee_code`.
pub const EMPLOYEE_CODE_MAX_CHARS: usize = 20;
/// Maximum character length of `name`.
pub const NAME_MAX_CHARS: usize = 50;
/// Exact digit count of a national number.
pub const NATIONAL_NUMBER_DIGITS: usize = 12;
/// Maximum character length of `remarks`.
pub const REMARKS_MAX_CHARS: usize = 255;

static NATIONAL_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{12}$").expect("valid national number regex"));

/// Canonical employee record.
///
/// The same shape is used for not-yet-persisted candidates (`id == None`)
/// and for persisted records (`id == Some`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Store-assigned identity. `None` until the first successful save.
    pub id: Option<EmployeeId>,
    /// User-supplied business identifier, unique across all records.
    pub employee_code: String,
    /// Display name.
    pub name: String,
    /// Optional 12-digit identifier, unique among present non-empty values.
    pub national_number: Option<String>,
    /// Stamped by the service at registration. Never user-supplied.
    pub registered_at: Option<chrono::NaiveDate>,
    /// Free-form note.
    pub remarks: Option<String>,
}

/// Field-format violation detected by [`Employee::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// `employee_code` is empty or whitespace-only.
    BlankEmployeeCode,
    /// `employee_code` exceeds [`EMPLOYEE_CODE_MAX_CHARS`].
    EmployeeCodeTooLong { length: usize },
    /// `name` is empty or whitespace-only.
    BlankName,
    /// `name` exceeds [`NAME_MAX_CHARS`].
    NameTooLong { length: usize },
    /// `national_number` is non-empty but not exactly 12 decimal digits.
    ///
    /// The offending value is deliberately not carried; national numbers
    /// must never end up in logs or error strings.
    MalformedNationalNumber,
    /// `remarks` exceeds [`REMARKS_MAX_CHARS`].
    RemarksTooLong { length: usize },
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankEmployeeCode => write!(f, "employee code must not be blank"),
            Self::EmployeeCodeTooLong { length } => write!(
                f,
                "employee code must be at most {EMPLOYEE_CODE_MAX_CHARS} characters, got {length}"
            ),
            Self::BlankName => write!(f, "name must not be blank"),
            Self::NameTooLong { length } => write!(
                f,
                "name must be at most {NAME_MAX_CHARS} characters, got {length}"
            ),
            Self::MalformedNationalNumber => write!(
                f,
                "national number must be exactly {NATIONAL_NUMBER_DIGITS} decimal digits"
            ),
            Self::RemarksTooLong { length } => write!(
                f,
                "remarks must be at most {REMARKS_MAX_CHARS} characters, got {length}"
            ),
        }
    }
}

impl Error for EmployeeValidationError {}

impl Employee {
    /// Creates a not-yet-persisted candidate with the required fields.
    ///
    /// Optional fields start as `None`; `id` and `registered_at` stay unset
    /// until the service persists the record.
    pub fn new(employee_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            employee_code: employee_code.into(),
            name: name.into(),
            national_number: None,
            registered_at: None,
            remarks: None,
        }
    }

    /// Returns the national number only when it is present and non-empty.
    ///
    /// An empty string submitted by a form is equivalent to no number at
    /// all; uniqueness checks and persistence share this definition.
    pub fn national_number_value(&self) -> Option<&str> {
        self.national_number
            .as_deref()
            .filter(|value| !value.is_empty())
    }

    /// Checks field-format rules.
    ///
    /// Duplicate detection is out of scope here; it needs store access and
    /// lives in the service layer.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.employee_code.trim().is_empty() {
            return Err(EmployeeValidationError::BlankEmployeeCode);
        }
        let code_chars = self.employee_code.chars().count();
        if code_chars > EMPLOYEE_CODE_MAX_CHARS {
            return Err(EmployeeValidationError::EmployeeCodeTooLong { length: code_chars });
        }

        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::BlankName);
        }
        let name_chars = self.name.chars().count();
        if name_chars > NAME_MAX_CHARS {
            return Err(EmployeeValidationError::NameTooLong { length: name_chars });
        }

        if let Some(number) = self.national_number_value() {
            if !NATIONAL_NUMBER_RE.is_match(number) {
                return Err(EmployeeValidationError::MalformedNationalNumber);
            }
        }

        if let Some(remarks) = self.remarks.as_deref() {
            let remarks_chars = remarks.chars().count();
            if remarks_chars > REMARKS_MAX_CHARS {
                return Err(EmployeeValidationError::RemarksTooLong {
                    length: remarks_chars,
                });
            }
        }

        Ok(())
    }
}
