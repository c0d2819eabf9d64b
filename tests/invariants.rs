//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use rtcatalog_core::{
    ProductCatalog, ProductRecord, ReviewPipeline, CertificationStatus, FieldStatus,
    FieldValidator, compute_content_hash, has_content_changed,
};
use serde_json::{json, Value};

fn complete_document() -> Value {
    json!({
        "id": "acme-contour",
        "name": "Acme Contour",
        "company": "Acme Medical",
        "category": "Auto-Contouring",
        "description": "Deep learning organ-at-risk contouring",
        "version": "3.2",
        "releaseDate": "2023-04-12",
        "website": "https://acme.example/contour",
        "modality": ["CT", "MRI"],
        "anatomicalLocation": ["Head & Neck", "Pelvis"],
        "keyFeatures": ["Fast", "Cloud based"],
        "supportedStructures": ["Brain", "Parotid L"],
        "regulatory": {
            "ce": {"status": "Certified", "class": "IIb"},
            "intendedUseStatement": "Contouring support for radiotherapy planning"
        },
        "market": {"onMarketSince": "2023"},
        "evidence": [{"type": "Peer-reviewed", "link": "https://doi.org/10.0/x"}],
        "limitations": ["Adult patients only"],
        "guidelines": [{"name": "ESTRO consensus", "compliance": "full"}],
        "technicalSpecifications": {"deployment": ["Cloud"], "population": "Adults"}
    })
}

fn complete_product() -> ProductRecord {
    ProductRecord::try_from(complete_document()).unwrap()
}

fn create_pipeline() -> ReviewPipeline {
    let mut catalog = ProductCatalog::new();
    catalog.register(complete_product()).unwrap();

    let incomplete = complete_product()
        .with("id", "acme-incomplete")
        .without("regulatory");
    catalog.register(incomplete).unwrap();

    ReviewPipeline::new(catalog)
}

#[test]
fn invariant_complete_product_is_clean() {
    let report = FieldValidator::new().validate(Some(&complete_product()));
    assert!(report.is_valid);
    assert_eq!(report.error_count, 0);
    assert_eq!(report.warning_count, 0);
    assert_eq!(report.valid_count, report.total_checks);
}

#[test]
fn invariant_missing_description_and_version() {
    let product = complete_product().without("description").without("version");

    let report = FieldValidator::new().validate(Some(&product));
    assert_eq!(report.error_count, 1);
    assert_eq!(report.warning_count, 1);
    assert!(!report.is_valid);
    assert_eq!(report.field_status("description").unwrap().status, FieldStatus::Error);
    assert_eq!(report.field_status("version").unwrap().status, FieldStatus::Warning);
}

#[test]
fn invariant_total_checks_counts_rules_not_results() {
    let validator = FieldValidator::new();
    let report = validator.validate(Some(&complete_product()));
    assert_eq!(report.total_checks, validator.rules().len());
    // Website and Regulatory Status each report under two paths
    assert_eq!(report.results.len(), report.total_checks + 2);
    assert_eq!(
        report.error_count + report.warning_count + report.valid_count,
        report.total_checks
    );
}

#[test]
fn invariant_website_alias_fan_out() {
    let product = complete_product().without("website");

    let report = FieldValidator::new().validate(Some(&product));
    let website: Vec<_> = report.results.iter().filter(|r| r.field_name == "Website").collect();
    assert_eq!(website.len(), 2);
    assert_eq!(website[0].field_path, "website");
    assert_eq!(website[1].field_path, "productUrl");
    assert!(website.iter().all(|r| r.status == FieldStatus::Warning));
    assert!(report.is_valid);
}

#[test]
fn invariant_hash_ignores_volatile_fields() {
    let product = complete_product();
    let touched = product.clone()
        .with("lastRevised", "2026-10-01")
        .with("lastUpdated", "2026-10-02")
        .with("companyRevisionDate", "2026-10-03")
        .with("lastVerified", "2026-10-04");

    assert_eq!(
        compute_content_hash(&product).unwrap(),
        compute_content_hash(&touched).unwrap()
    );
}

#[test]
fn invariant_hash_matches_raw_json_in_any_key_order() {
    let record = ProductRecord::new("p1", "Name", "Company");
    let reordered = json!({"company": "Company", "name": "Name", "id": "p1"});
    assert_eq!(
        compute_content_hash(&record).unwrap(),
        compute_content_hash(&reordered).unwrap()
    );
}

#[test]
fn invariant_hash_sensitive_to_content() {
    let product = complete_product();
    let stored = compute_content_hash(&product).unwrap();
    assert!(!has_content_changed(&product, &stored).unwrap());

    let reordered = product.clone().with("modality", json!(["MRI", "CT"]));
    assert!(has_content_changed(&reordered, &stored).unwrap());

    let extra_key = product.clone().with("logoUrl", "/logo.png");
    assert!(has_content_changed(&extra_key, &stored).unwrap());

    let null_key = product.clone().with("productUrl", Value::Null);
    assert!(has_content_changed(&null_key, &stored).unwrap());

    let mut regulatory = complete_document()["regulatory"].clone();
    regulatory["ce"]["class"] = json!("IIa");
    let nested = product.with("regulatory", regulatory);
    assert!(has_content_changed(&nested, &stored).unwrap());
}

#[test]
fn invariant_record_hashes_like_its_raw_json() {
    let mut raw = complete_document();
    raw["version"] = Value::Null;
    raw["releaseDate"] = json!(2023);

    let record = ProductRecord::try_from(raw.clone()).unwrap();
    let record_hash = compute_content_hash(&record).unwrap();
    assert_eq!(record_hash, compute_content_hash(&raw).unwrap());

    let without_version = record.clone().without("version");
    assert_ne!(record_hash, compute_content_hash(&without_version).unwrap());
}

#[test]
fn invariant_wrongly_typed_field_fails_its_rule() {
    let mut raw = complete_document();
    raw["version"] = json!(3.2);

    let product = ProductRecord::try_from(raw).unwrap();
    let report = FieldValidator::new().validate(Some(&product));
    assert_eq!(report.field_status("version").unwrap().status, FieldStatus::Warning);
    assert_eq!(report.warning_count, 1);
    assert!(report.is_valid);
    assert_eq!(compute_content_hash(&product).unwrap().len(), 64);
}

#[test]
fn invariant_certify_calls_validate() {
    let pipeline = create_pipeline();

    let result = pipeline.certify_product("acme-incomplete", "rep@acme.example");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Validation failed"));
    assert_eq!(err.to_string().matches("Regulatory Status").count(), 1);
}

#[test]
fn invariant_certification_lifecycle() {
    let pipeline = create_pipeline();

    let cert = pipeline.certify_product("acme-contour", "rep@acme.example").unwrap();
    let review = pipeline.review_product("acme-contour", Some(&cert)).unwrap();
    assert_eq!(review.certification, CertificationStatus::Current);
    assert_eq!(review.content_hash, cert.content_hash);
    assert!(review.validation.is_valid);

    let uncertified = pipeline.review_product("acme-contour", None).unwrap();
    assert_eq!(uncertified.certification, CertificationStatus::Uncertified);
}

#[test]
fn invariant_product_not_found_error() {
    let pipeline = create_pipeline();

    let result = pipeline.validate_product("nonexistent");
    assert!(result.unwrap_err().to_string().contains("Product not found"));
    assert!(pipeline.certify_product("nonexistent", "rep").is_err());
}
