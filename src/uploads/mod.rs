//! File intake for profile-picture uploads

pub mod store;

pub use store::{UploadStore, PUBLIC_PREFIX};
