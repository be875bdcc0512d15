pub mod employees;

pub use employees::*;

use crate::db::repository::{EmployeeRepository, UserRepository};
use crate::uploads::UploadStore;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub employee_repo: Arc<EmployeeRepository>,
    pub user_repo: Arc<UserRepository>,
    pub uploads: Arc<UploadStore>,
    pub jwt_secret: Arc<String>,
    pub token_ttl_days: i64,
}
