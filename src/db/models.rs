//! Database models
//!
//! Data structures representing database tables. Wire names are camelCase
//! to match the JSON contract of the API.

use crate::core::error::{Result, StaffdeskError};
use serde::{Deserialize, Serialize};

/// Employment category for an employee record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    #[serde(rename = "Contractor")]
    Contractor,
    #[serde(rename = "Intern")]
    Intern,
}

impl EmployeeType {
    /// Canonical string form, as stored and as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeType::FullTime => "Full-Time",
            EmployeeType::PartTime => "Part-Time",
            EmployeeType::Contractor => "Contractor",
            EmployeeType::Intern => "Intern",
        }
    }

    /// Parse from the canonical string form
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "Full-Time" => Ok(EmployeeType::FullTime),
            "Part-Time" => Ok(EmployeeType::PartTime),
            "Contractor" => Ok(EmployeeType::Contractor),
            "Intern" => Ok(EmployeeType::Intern),
            other => Err(StaffdeskError::ValidationError(format!(
                "employeeType must be one of Full-Time, Part-Time, Contractor, Intern (got '{}')",
                other
            ))),
        }
    }
}

/// Employee record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub employee_type: EmployeeType,
    pub profile_pic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// User record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}
