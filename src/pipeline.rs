//! Review Pipeline - Single Entry Point
//!
//! CRITICAL: certify_product MUST call validate internally. No bypass.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::certification::{certification_status, Certification, CertificationStatus};
use crate::hashing::compute_content_hash;
use crate::product::{ProductCatalog, ProductId, ProductRecord};
use crate::validation::{FieldValidator, ValidationReport};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Everything an admin needs to see about one product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    pub product_id: ProductId,
    pub content_hash: String,
    pub certification: CertificationStatus,
    pub validation: ValidationReport,
}

/// The review pipeline - single entry point for admin product operations
pub struct ReviewPipeline {
    catalog: ProductCatalog,
    validator: FieldValidator,
}

impl ReviewPipeline {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self {
            catalog,
            validator: FieldValidator::new(),
        }
    }

    pub fn list_products(&self) -> Vec<&ProductRecord> {
        self.catalog.list()
    }

    pub fn get_product(&self, id: &str) -> Option<&ProductRecord> {
        self.catalog.get(id)
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    fn product(&self, id: &str) -> Result<&ProductRecord, ReviewError> {
        self.catalog.get(id)
            .ok_or_else(|| ReviewError::ProductNotFound(id.to_string()))
    }

    /// Validate a catalog product
    ///
    /// This is the ONLY validation entry point.
    pub fn validate_product(&self, id: &str) -> Result<ValidationReport, ReviewError> {
        let product = self.product(id)?;
        Ok(self.validate_record(product))
    }

    /// Validate a record that is not (yet) in the catalog
    pub fn validate_record(&self, product: &ProductRecord) -> ValidationReport {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(Some(product))
    }

    pub fn review_product(
        &self,
        id: &str,
        certification: Option<&Certification>,
    ) -> Result<ProductReview, ReviewError> {
        let product = self.product(id)?;
        let validation = self.validate_record(product);

        Ok(ProductReview {
            product_id: product.id().to_string(),
            content_hash: compute_content_hash(product)?,
            certification: certification_status(product, certification)?,
            validation,
        })
    }

    /// Certify a product's current content
    ///
    /// CRITICAL: This ALWAYS validates first. Products with errors cannot be certified.
    pub fn certify_product(&self, id: &str, certified_by: &str) -> Result<Certification, ReviewError> {
        let product = self.product(id)?;

        // MANDATORY: Validation is always called. This is non-negotiable.
        let validation = self.validate_record(product);

        if !validation.is_valid {
            // Aliased fields repeat their error once per path
            let mut messages: Vec<_> = validation.errors()
                .map(|v| format!("{}: {}", v.field_name, v.message))
                .collect();
            messages.dedup();
            warn!(product = %id, errors = validation.error_count, "refusing certification");
            return Err(ReviewError::ValidationFailed(messages.join("; ")));
        }

        let certification = Certification::issue(product, certified_by)?;
        info!(
            product = %id,
            certified_by,
            hash = %certification.content_hash,
            "product certified"
        );
        Ok(certification)
    }
}

impl Default for ReviewPipeline {
    fn default() -> Self {
        Self::new(ProductCatalog::default())
    }
}
