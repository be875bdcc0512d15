pub mod common;
pub mod employees;

pub use common::{MessageResponse, SearchQuery};
pub use employees::{EmployeeForm, UploadedFile};
