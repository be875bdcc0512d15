//! Employee resource handlers
//!
//! Every route here sits behind the authentication middleware; handlers
//! translate HTTP input into repository calls and map failures to the
//! error taxonomy.

use crate::api::models::{EmployeeForm, MessageResponse, SearchQuery};
use crate::auth::middleware::AuthUser;
use crate::core::error::{Result, StaffdeskError};
use crate::db::models::{Employee, EmployeeType};
use crate::db::repository::Repository;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::AppState;

/// Handler for GET /api/employees - List all employees
pub async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>> {
    let employees = state.employee_repo.find_all().await?;
    Ok(Json(employees))
}

/// Handler for POST /api/employees - Create a new employee
///
/// Multipart body: name, email, phone, employeeType, optional profilePic.
pub async fn create_employee(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = EmployeeForm::from_multipart(&mut multipart).await?;

    let name = require_field(form.name, "name")?;
    let email = require_field(form.email, "email")?.to_lowercase();
    let phone = require_field(form.phone, "phone")?;
    let employee_type = EmployeeType::parse(&require_field(form.employee_type, "employeeType")?)?;

    // Store the picture before the record; a failed insert leaves an
    // orphaned file, never a record pointing at a missing file
    let profile_pic = match form.profile_pic {
        Some(file) => Some(
            state
                .uploads
                .save(&file.filename, file.content_type.as_deref(), file.data)
                .await?,
        ),
        None => None,
    };

    let now = chrono::Utc::now().to_rfc3339();
    let employee = Employee {
        id: Uuid::new_v4().to_string(),
        name,
        email,
        phone,
        employee_type,
        profile_pic,
        created_at: now.clone(),
        updated_at: now,
    };

    state.employee_repo.create(&employee).await?;

    tracing::info!(
        employee_id = %employee.id,
        email = %employee.email,
        created_by = %user.username,
        "Employee created"
    );

    Ok((StatusCode::CREATED, Json(employee)))
}

/// Handler for GET /api/employees/:id - Get employee by ID
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>> {
    let employee = state
        .employee_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| StaffdeskError::NotFound(format!("Employee with id {} not found", id)))?;

    Ok(Json(employee))
}

/// Handler for PUT /api/employees/:id - Partial update
///
/// Only supplied, non-blank fields change; a new upload replaces the
/// picture and omission leaves it untouched. There is no way to clear a
/// picture once set.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Employee>> {
    let form = EmployeeForm::from_multipart(&mut multipart).await?;

    let mut employee = state
        .employee_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| StaffdeskError::NotFound(format!("Employee with id {} not found", id)))?;

    if let Some(name) = form.name {
        let name = name.trim().to_string();
        if !name.is_empty() {
            employee.name = name;
        }
    }
    if let Some(email) = form.email {
        let email = email.trim().to_lowercase();
        if !email.is_empty() {
            employee.email = email;
        }
    }
    if let Some(phone) = form.phone {
        let phone = phone.trim().to_string();
        if !phone.is_empty() {
            employee.phone = phone;
        }
    }
    if let Some(employee_type) = form.employee_type {
        if !employee_type.trim().is_empty() {
            employee.employee_type = EmployeeType::parse(employee_type.trim())?;
        }
    }
    if let Some(file) = form.profile_pic {
        let path = state
            .uploads
            .save(&file.filename, file.content_type.as_deref(), file.data)
            .await?;
        employee.profile_pic = Some(path);
    }

    employee.updated_at = chrono::Utc::now().to_rfc3339();

    state.employee_repo.update(&employee).await?;

    tracing::info!(
        employee_id = %employee.id,
        updated_by = %user.username,
        "Employee updated"
    );

    Ok(Json(employee))
}

/// Handler for DELETE /api/employees/:id - Delete an employee
///
/// Hard delete; the uploaded picture, if any, is left on disk.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<Json<MessageResponse>> {
    state
        .employee_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| StaffdeskError::NotFound(format!("Employee with id {} not found", id)))?;

    state.employee_repo.delete(&id).await?;

    tracing::info!(employee_id = %id, deleted_by = %user.username, "Employee deleted");

    Ok(Json(MessageResponse {
        message: "Employee deleted".to_string(),
    }))
}

/// Handler for GET /api/employees/search?q= - Substring search
pub async fn search_employees(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Employee>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(StaffdeskError::ValidationError(
            "Query parameter q is required".to_string(),
        ));
    }

    let employees = state.employee_repo.search(query).await?;
    Ok(Json(employees))
}

fn require_field(value: Option<String>, name: &str) -> Result<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(StaffdeskError::ValidationError(format!(
            "Field '{}' is required",
            name
        )));
    }
    Ok(value)
}
