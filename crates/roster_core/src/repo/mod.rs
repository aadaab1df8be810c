//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract the service orchestrates against.
//! - Isolate SQLite query details from business decision logic.
//!
//! # Invariants
//! - Repository writes must enforce `Employee::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod employee_repo;
