//! Certification System
//!
//! A manufacturer certifies a product's content as it stood at a given
//! content hash. Any later content edit makes that certification stale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hashing::{compute_content_hash, has_content_changed};
use crate::product::{ProductId, ProductRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificationStatus {
    /// Certified content matches the current record
    Current,
    /// Content changed after certification
    Stale,
    /// No certification for this product
    Uncertified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: Uuid,
    pub product_id: ProductId,
    pub content_hash: String,
    pub certified_by: String,
    pub certified_at: DateTime<Utc>,
}

impl Certification {
    /// Certify the product's current content
    pub fn issue(product: &ProductRecord, certified_by: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            product_id: product.id().to_string(),
            content_hash: compute_content_hash(product)?,
            certified_by: certified_by.to_string(),
            certified_at: Utc::now(),
        })
    }
}

pub fn certification_status(
    product: &ProductRecord,
    certification: Option<&Certification>,
) -> Result<CertificationStatus, serde_json::Error> {
    let Some(cert) = certification.filter(|c| c.product_id == product.id()) else {
        return Ok(CertificationStatus::Uncertified);
    };

    if has_content_changed(product, &cert.content_hash)? {
        Ok(CertificationStatus::Stale)
    } else {
        Ok(CertificationStatus::Current)
    }
}
