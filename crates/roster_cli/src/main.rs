//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `roster_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use roster_core::db::open_db_in_memory;
use roster_core::{Employee, EmployeeService, RegisterOutcome, SqliteEmployeeRepository};

fn main() {
    // Opt-in file logging; the probe stays silent on disk by default.
    if let Ok(log_dir) = std::env::var("ROSTER_LOG_DIR") {
        if let Err(err) = roster_core::init_logging(roster_core::default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("roster_core version={}", roster_core::core_version());

    match smoke() {
        Ok(count) => println!("in-memory smoke employees={count}"),
        Err(err) => {
            eprintln!("in-memory smoke failed: {err}");
            std::process::exit(1);
        }
    }
}

/// Registers one employee against an in-memory store and counts the list.
fn smoke() -> Result<usize, Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteEmployeeRepository::try_new(&conn)?;
    let service = EmployeeService::new(repo);

    let candidate = Employee::new("E001", "Smoke Probe");
    if let RegisterOutcome::Rejected(reason) = service.register(&candidate)? {
        return Err(format!("unexpected rejection: {reason:?}").into());
    }

    Ok(service.list_employees()?.len())
}
