//! Radiotherapy Catalog Core - Product Validation and Change Tracking
//!
//! # Ground Rules
//! 1. Records Are Read, Never Written
//! 2. Rules Are Data
//! 3. Warnings Never Invalidate
//! 4. Timestamps Are Not Content
//! 5. Certification Follows Content

pub mod product;
pub mod validation;
pub mod hashing;
pub mod certification;
pub mod pipeline;

pub use product::{ProductRecord, ProductCatalog, CatalogError, SkippedEntry};
pub use validation::{
    FieldValidator, FieldValidation, FieldStatus, Severity, ValidationReport, ValidationRule,
};
pub use hashing::{compute_content_hash, has_content_changed, canonical_json, VOLATILE_FIELDS};
pub use certification::{Certification, CertificationStatus, certification_status};
pub use pipeline::{ReviewPipeline, ProductReview, ReviewError};

pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
