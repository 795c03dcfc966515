//! Lab definitions and the compose operations applied to them

pub mod action;
pub mod catalog;

pub use action::LabAction;
pub use catalog::{compose_file, resolve_labs_dir, validate_lab_name, Lab, LabCatalog, CATALOG_FILE};
