//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the record-store operations the registry service depends on:
//!   listing, lookup, existence checks and persistence.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Employee::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - An empty national number is persisted as SQL `NULL`, never as `''`,
//!   so the `UNIQUE` index only ever compares real values.

use crate::db::{migrations, DbError};
use crate::model::employee::{Employee, EmployeeId, EmployeeValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEES_TABLE: &str = "employees";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "employee_code",
    "name",
    "national_number",
    "registered_at",
    "remarks",
];

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    employee_code,
    name,
    national_number,
    registered_at,
    remarks
FROM employees";

const REGISTERED_AT_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Db(DbError),
    NotFound(EmployeeId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open the database through db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` does not exist")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` does not exist")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record-store contract for employee records. No business rules live here;
/// duplicate policy is decided by the service on top of the existence checks.
pub trait EmployeeRepository {
    /// Full snapshot of all records. Order carries no semantic meaning.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Looks up one record by identity. Absence is a normal outcome.
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// True iff any record carries this employee code.
    fn exists_by_code(&self, code: &str) -> RepoResult<bool>;
    /// True iff some record other than `id` carries this employee code.
    fn exists_by_code_excluding(&self, code: &str, id: EmployeeId) -> RepoResult<bool>;
    /// True iff any record carries this national number.
    fn exists_by_national_number(&self, number: &str) -> RepoResult<bool>;
    /// True iff some record other than `id` carries this national number.
    fn exists_by_national_number_excluding(
        &self,
        number: &str,
        id: EmployeeId,
    ) -> RepoResult<bool>;
    /// Inserts (`id == None`, identity assigned by the store) or overwrites
    /// the record with matching identity. Returns the persisted record.
    fn save_employee(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Removes the record with this identity. No-op when absent.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a connection after verifying it carries the expected schema.
    ///
    /// Rejects connections that skipped `db::open_db` bootstrap: wrong
    /// `user_version`, missing `employees` table or missing columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        let expected_version = migrations::latest_version();
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        if !table_exists(conn, EMPLOYEES_TABLE)? {
            return Err(RepoError::MissingRequiredTable(EMPLOYEES_TABLE));
        }

        let columns = table_columns(conn, EMPLOYEES_TABLE)?;
        for &column in REQUIRED_COLUMNS {
            if !columns.contains(column) {
                return Err(RepoError::MissingRequiredColumn {
                    table: EMPLOYEES_TABLE,
                    column,
                });
            }
        }

        Ok(Self { conn })
    }

    fn exists_where(&self, sql: &str, bind: impl rusqlite::Params) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(sql, bind, |row| row.get(0))?;
        Ok(exists == 1)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        // id order keeps list output stable for presentation callers.
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn exists_by_code(&self, code: &str) -> RepoResult<bool> {
        self.exists_where(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_code = ?1);",
            params![code],
        )
    }

    fn exists_by_code_excluding(&self, code: &str, id: EmployeeId) -> RepoResult<bool> {
        self.exists_where(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_code = ?1 AND id <> ?2);",
            params![code, id],
        )
    }

    fn exists_by_national_number(&self, number: &str) -> RepoResult<bool> {
        self.exists_where(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE national_number = ?1);",
            params![number],
        )
    }

    fn exists_by_national_number_excluding(
        &self,
        number: &str,
        id: EmployeeId,
    ) -> RepoResult<bool> {
        self.exists_where(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE national_number = ?1 AND id <> ?2);",
            params![number, id],
        )
    }

    fn save_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        // Empty string and None both persist as NULL; see module invariants.
        let national_number = employee.national_number_value();
        let registered_at = employee
            .registered_at
            .map(|date| date.format(REGISTERED_AT_FORMAT).to_string());

        let mut saved = employee.clone();
        saved.national_number = national_number.map(str::to_string);

        match employee.id {
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE employees
                     SET
                        employee_code = ?1,
                        name = ?2,
                        national_number = ?3,
                        registered_at = ?4,
                        remarks = ?5
                     WHERE id = ?6;",
                    params![
                        employee.employee_code.as_str(),
                        employee.name.as_str(),
                        national_number,
                        registered_at,
                        employee.remarks.as_deref(),
                        id,
                    ],
                )?;

                if changed == 0 {
                    return Err(RepoError::NotFound(id));
                }
            }
            None => {
                self.conn.execute(
                    "INSERT INTO employees (
                        employee_code,
                        name,
                        national_number,
                        registered_at,
                        remarks
                    ) VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        employee.employee_code.as_str(),
                        employee.name.as_str(),
                        national_number,
                        registered_at,
                        employee.remarks.as_deref(),
                    ],
                )?;

                saved.id = Some(self.conn.last_insert_rowid());
            }
        }

        Ok(saved)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        // Affected-row count is deliberately ignored: deleting an absent
        // identity is a successful no-op.
        self.conn
            .execute("DELETE FROM employees WHERE id = ?1;", params![id])?;
        Ok(())
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let registered_at = match row.get::<_, Option<String>>("registered_at")? {
        Some(text) => {
            let date = NaiveDate::parse_from_str(&text, REGISTERED_AT_FORMAT).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid date `{text}` in employees.registered_at"
                ))
            })?;
            Some(date)
        }
        None => None,
    };

    let employee = Employee {
        id: Some(row.get("id")?),
        employee_code: row.get("employee_code")?,
        name: row.get("name")?,
        national_number: row.get("national_number")?,
        registered_at,
        remarks: row.get("remarks")?,
    };
    employee.validate()?;
    Ok(employee)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<HashSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = HashSet::new();
    while let Some(row) = rows.next()? {
        columns.insert(row.get::<_, String>("name")?);
    }
    Ok(columns)
}
