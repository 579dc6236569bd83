//! Foundation utilities shared across the clearance audit engine crates.
//!
//! This crate has no internal dependencies; every other crate in the
//! workspace may depend on it.

pub mod atomic_write;
pub mod logging;
pub mod paths;
pub mod types;

pub use types::{DocumentType, FileUpload, SavedFileRecord};
