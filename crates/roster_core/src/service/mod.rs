//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into registry use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod employee_service;
