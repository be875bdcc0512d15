//! Repository pattern implementation for data access layer
//!
//! Repositories translate store-level failures into the API error
//! taxonomy: UNIQUE violations surface as `Conflict`, everything else as
//! `DatabaseError`.

use crate::core::error::{Result, StaffdeskError};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Employee, EmployeeType, User};
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use std::sync::Arc;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Find an entity by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Find all entities
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<()>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<()>;

    /// Delete an entity by its ID
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Map a rusqlite error to the API taxonomy, treating constraint
/// violations as uniqueness conflicts
fn map_write_error(err: rusqlite::Error, conflict_message: &str) -> StaffdeskError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StaffdeskError::Conflict(conflict_message.to_string())
        }
        _ => StaffdeskError::DatabaseError(err),
    }
}

/// Escape LIKE wildcard characters so user input always matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

const EMPLOYEE_COLUMNS: &str =
    "id, name, email, phone, employee_type, profile_pic, created_at, updated_at";

fn employee_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
    let type_raw: String = row.get(4)?;
    let employee_type = EmployeeType::parse(&type_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        employee_type,
        profile_pic: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Repository for Employee entities
pub struct EmployeeRepository {
    db: Arc<DatabaseManager>,
}

impl EmployeeRepository {
    /// Create a new EmployeeRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find employees whose name or email contains the query,
    /// case-insensitively; the query is matched literally
    pub async fn search(&self, query: &str) -> Result<Vec<Employee>> {
        let pattern = format!("%{}%", escape_like(query));
        self.db
            .execute(move |conn| {
                let sql = format!(
                    "SELECT {} FROM employees \
                     WHERE name LIKE ?1 ESCAPE '\\' OR email LIKE ?1 ESCAPE '\\' \
                     ORDER BY created_at",
                    EMPLOYEE_COLUMNS
                );
                let mut stmt = conn.prepare(&sql).map_err(StaffdeskError::DatabaseError)?;

                let employees = stmt
                    .query_map([&pattern], employee_from_row)
                    .map_err(StaffdeskError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(StaffdeskError::DatabaseError)?;

                Ok(employees)
            })
            .await
    }
}

#[async_trait]
impl Repository<Employee> for EmployeeRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS),
                    [&id],
                    employee_from_row,
                )
                .optional()
                .map_err(StaffdeskError::DatabaseError)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<Employee>> {
        self.db
            .execute(|conn| {
                let sql = format!(
                    "SELECT {} FROM employees ORDER BY created_at",
                    EMPLOYEE_COLUMNS
                );
                let mut stmt = conn.prepare(&sql).map_err(StaffdeskError::DatabaseError)?;

                let employees = stmt
                    .query_map([], employee_from_row)
                    .map_err(StaffdeskError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(StaffdeskError::DatabaseError)?;

                Ok(employees)
            })
            .await
    }

    async fn create(&self, entity: &Employee) -> Result<()> {
        let employee = entity.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO employees \
                     (id, name, email, phone, employee_type, profile_pic, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        employee.id,
                        employee.name,
                        employee.email,
                        employee.phone,
                        employee.employee_type.as_str(),
                        employee.profile_pic,
                        employee.created_at,
                        employee.updated_at,
                    ],
                )
                .map_err(|e| map_write_error(e, "An employee with this email already exists"))?;
                Ok(())
            })
            .await
    }

    async fn update(&self, entity: &Employee) -> Result<()> {
        let employee = entity.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "UPDATE employees \
                     SET name = ?, email = ?, phone = ?, employee_type = ?, \
                         profile_pic = ?, updated_at = ? \
                     WHERE id = ?",
                    rusqlite::params![
                        employee.name,
                        employee.email,
                        employee.phone,
                        employee.employee_type.as_str(),
                        employee.profile_pic,
                        employee.updated_at,
                        employee.id,
                    ],
                )
                .map_err(|e| map_write_error(e, "An employee with this email already exists"))?;
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.execute("DELETE FROM employees WHERE id = ?", [&id])
                    .map_err(StaffdeskError::DatabaseError)?;
                Ok(())
            })
            .await
    }
}

/// Repository for User entities
///
/// Users are created via registration and read back for login and token
/// verification; no update or delete surface exists.
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Create a new user; fails with `Conflict` if the email is taken
    pub async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, username, email, password_hash, created_at) \
                     VALUES (?, ?, ?, ?, ?)",
                    rusqlite::params![
                        user.id,
                        user.username,
                        user.email,
                        user.password_hash,
                        user.created_at,
                    ],
                )
                .map_err(|e| map_write_error(e, "Email is already registered"))?;
                Ok(())
            })
            .await
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, username, email, password_hash, created_at \
                     FROM users WHERE id = ?",
                    [&id],
                    user_from_row,
                )
                .optional()
                .map_err(StaffdeskError::DatabaseError)
            })
            .await
    }

    /// Find a user by email (stored lower-cased)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, username, email, password_hash, created_at \
                     FROM users WHERE email = ?",
                    [&email],
                    user_from_row,
                )
                .optional()
                .map_err(StaffdeskError::DatabaseError)
            })
            .await
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}
