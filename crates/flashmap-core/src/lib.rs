//! Flashmap Core - Firmware catalog types and update/validate logic
//!
//! This crate provides the foundational pieces of the flashmap tool:
//! - Device firmware catalog with JSON persistence
//! - Static board lookup tables
//! - Display-version derivation for release titles
//! - Artifact discovery and download-URL mapping
//! - The mapping updater and the catalog validator

pub mod artifacts;
pub mod boards;
pub mod catalog;
pub mod update;
pub mod validate;
pub mod version;

pub use artifacts::{ArtifactKind, PathError};
pub use catalog::{Catalog, CatalogError, FirmwareEntry};
pub use update::{update, UpdateError, UpdateOptions, UpdateReport, UpdateRequest};
pub use validate::{validate, ValidateError, ValidationReport};
