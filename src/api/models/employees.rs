//! Employee form models
//!
//! Create and update both arrive as multipart/form-data carrying text
//! fields plus an optional profile picture, so the form is decoded
//! field-by-field rather than through a serde extractor.

use crate::core::error::{Result, StaffdeskError};
use axum::extract::Multipart;
use bytes::Bytes;

/// One uploaded file from a multipart request
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Decoded employee form; every field is optional at this stage,
/// presence requirements are enforced per operation
#[derive(Debug, Default)]
pub struct EmployeeForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub employee_type: Option<String>,
    pub profile_pic: Option<UploadedFile>,
}

impl EmployeeForm {
    /// Decode a multipart body into an EmployeeForm
    ///
    /// Unknown fields are ignored; repeated fields keep the last value.
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self> {
        let mut form = EmployeeForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            StaffdeskError::ValidationError(format!("Malformed multipart body: {}", e))
        })? {
            let Some(name) = field.name().map(|n| n.to_string()) else {
                continue;
            };

            match name.as_str() {
                "name" => form.name = Some(read_text(field).await?),
                "email" => form.email = Some(read_text(field).await?),
                "phone" => form.phone = Some(read_text(field).await?),
                "employeeType" => form.employee_type = Some(read_text(field).await?),
                "profilePic" => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let content_type = field.content_type().map(|c| c.to_string());
                    let data = field.bytes().await.map_err(|e| {
                        StaffdeskError::ValidationError(format!(
                            "Failed to read uploaded file: {}",
                            e
                        ))
                    })?;
                    // A file input submitted with no selection arrives as an
                    // empty part; treat it as "no picture"
                    if !filename.is_empty() && !data.is_empty() {
                        form.profile_pic = Some(UploadedFile {
                            filename,
                            content_type,
                            data,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| StaffdeskError::ValidationError(format!("Malformed form field: {}", e)))
}
