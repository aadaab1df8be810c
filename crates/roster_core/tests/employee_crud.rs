use chrono::NaiveDate;
use roster_core::db::migrations::latest_version;
use roster_core::db::open_db_in_memory;
use roster_core::{
    Employee, EmployeeRepository, EmployeeService, RegisterOutcome, RepoError,
    SqliteEmployeeRepository,
};
use rusqlite::Connection;

fn sample(code: &str, name: &str) -> Employee {
    Employee::new(code, name)
}

#[test]
fn save_inserts_and_assigns_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut employee = sample("E001", "Yamada");
    employee.national_number = Some("123456789012".to_string());
    employee.registered_at = Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    employee.remarks = Some("first hire".to_string());

    let saved = repo.save_employee(&employee).unwrap();
    let id = saved.id.unwrap();
    assert!(id > 0);

    let loaded = repo.get_employee(id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.employee_code, "E001");
    assert_eq!(loaded.name, "Yamada");
    assert_eq!(loaded.national_number.as_deref(), Some("123456789012"));
    assert_eq!(
        loaded.registered_at,
        Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
    );
    assert_eq!(loaded.remarks.as_deref(), Some("first hire"));
}

#[test]
fn save_with_identity_overwrites_existing_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let saved = repo.save_employee(&sample("E001", "Yamada")).unwrap();

    let mut changed = saved.clone();
    changed.name = "Yamada Taro".to_string();
    changed.remarks = Some("renamed".to_string());
    repo.save_employee(&changed).unwrap();

    let loaded = repo.get_employee(saved.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.name, "Yamada Taro");
    assert_eq!(loaded.remarks.as_deref(), Some("renamed"));
    assert_eq!(loaded.id, saved.id);
}

#[test]
fn save_with_unknown_identity_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut employee = sample("E001", "Yamada");
    employee.id = Some(999);

    let err = repo.save_employee(&employee).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(999)));
}

#[test]
fn empty_national_number_is_persisted_as_absent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut employee = sample("E001", "Yamada");
    employee.national_number = Some(String::new());

    let saved = repo.save_employee(&employee).unwrap();
    assert_eq!(saved.national_number, None);

    let loaded = repo.get_employee(saved.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.national_number, None);
}

#[test]
fn absent_national_numbers_never_collide() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut first = sample("E001", "Yamada");
    first.national_number = Some(String::new());
    repo.save_employee(&first).unwrap();

    let second = sample("E002", "Suzuki");
    repo.save_employee(&second).unwrap();

    assert_eq!(repo.list_employees().unwrap().len(), 2);
}

#[test]
fn exists_by_code_and_excluding_variant() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let saved = repo.save_employee(&sample("E001", "Yamada")).unwrap();
    let id = saved.id.unwrap();

    assert!(repo.exists_by_code("E001").unwrap());
    assert!(!repo.exists_by_code("E002").unwrap());

    // The record itself is excluded; any other record is not.
    assert!(!repo.exists_by_code_excluding("E001", id).unwrap());
    assert!(repo.exists_by_code_excluding("E001", id + 1).unwrap());
}

#[test]
fn exists_by_national_number_and_excluding_variant() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut employee = sample("E001", "Yamada");
    employee.national_number = Some("123456789012".to_string());
    let saved = repo.save_employee(&employee).unwrap();
    let id = saved.id.unwrap();

    assert!(repo.exists_by_national_number("123456789012").unwrap());
    assert!(!repo.exists_by_national_number("000000000000").unwrap());

    assert!(!repo
        .exists_by_national_number_excluding("123456789012", id)
        .unwrap());
    assert!(repo
        .exists_by_national_number_excluding("123456789012", id + 1)
        .unwrap());
}

#[test]
fn unique_constraints_are_the_store_side_backstop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    repo.save_employee(&sample("E001", "Yamada")).unwrap();

    // Bypassing the service's existence checks, the schema still refuses
    // a duplicate code.
    let err = repo.save_employee(&sample("E001", "Suzuki")).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    let mut first_numbered = sample("E002", "Sato");
    first_numbered.national_number = Some("123456789012".to_string());
    repo.save_employee(&first_numbered).unwrap();

    let mut second_numbered = sample("E003", "Tanaka");
    second_numbered.national_number = Some("123456789012".to_string());
    let err = repo.save_employee(&second_numbered).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let saved = repo.save_employee(&sample("E001", "Yamada")).unwrap();
    let id = saved.id.unwrap();

    repo.delete_employee(id).unwrap();
    repo.delete_employee(id).unwrap();

    assert_eq!(repo.get_employee(id).unwrap(), None);
    assert!(repo.list_employees().unwrap().is_empty());
}

#[test]
fn delete_unknown_identity_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    repo.save_employee(&sample("E001", "Yamada")).unwrap();
    repo.delete_employee(42).unwrap();

    assert_eq!(repo.list_employees().unwrap().len(), 1);
}

#[test]
fn validation_failure_blocks_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut invalid = sample("E001", "Yamada");
    invalid.national_number = Some("not-a-number".to_string());

    let err = repo.save_employee(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_employees().unwrap().is_empty());
}

#[test]
fn corrupt_registered_at_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO employees (employee_code, name, registered_at)
         VALUES ('E001', 'Yamada', 'yesterday');",
        [],
    )
    .unwrap();

    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let err = repo.get_employee(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_employees_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("employees"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_employees_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "employees",
            column: "national_number"
        })
    ));
}

#[test]
fn service_runs_against_the_sqlite_repository() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let service = EmployeeService::new(repo);

    let outcome = service.register(&sample("E001", "Yamada")).unwrap();
    let saved = match outcome {
        RegisterOutcome::Accepted(saved) => saved,
        RegisterOutcome::Rejected(reason) => panic!("unexpected rejection: {reason:?}"),
    };

    assert!(saved.id.is_some());
    assert_eq!(saved.registered_at, Some(chrono::Local::now().date_naive()));

    let listed = service.list_employees().unwrap();
    assert_eq!(listed, vec![saved]);
}
