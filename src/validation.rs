//! Validation System - Declarative Field Rules
//!
//! Rules are plain data: a field name, a pure check and a severity.
//! The validator turns check outcomes into statuses; rules never decide
//! whether they are errors or warnings themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::product::ProductRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Valid,
    Warning,
    Error,
}

impl FieldStatus {
    /// Failed checks only escalate to errors for high severity rules
    pub fn classify(passed: bool, severity: Severity) -> Self {
        match (passed, severity) {
            (true, _) => FieldStatus::Valid,
            (false, Severity::High) => FieldStatus::Error,
            (false, _) => FieldStatus::Warning,
        }
    }
}

/// A single validation rule.
///
/// `check` must be total over any `ProductRecord`. A panicking check is a
/// bug in the rule and aborts the whole validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRule {
    pub field: &'static str,
    pub check: fn(&ProductRecord) -> bool,
    pub severity: Severity,
    pub success_message: &'static str,
    pub failure_message: &'static str,
}

/// Field name -> dot-paths the UI may highlight for it
pub type FieldPaths = HashMap<&'static str, &'static [&'static str]>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    pub field_name: String,
    pub field_path: String,
    pub status: FieldStatus,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub results: Vec<FieldValidation>,
    pub error_count: usize,
    pub warning_count: usize,
    pub valid_count: usize,
    /// Number of rules evaluated; `results` may be longer due to path aliases
    pub total_checks: usize,
}

impl ValidationReport {
    pub fn empty() -> Self {
        Self { is_valid: true, ..Default::default() }
    }

    /// Look up a field by exact path, falling back to its top-level segment
    pub fn field_status(&self, path: &str) -> Option<&FieldValidation> {
        self.results.iter().find(|r| r.field_path == path).or_else(|| {
            let top = path.split('.').next().unwrap_or(path);
            self.results.iter().find(|r| r.field_path == top)
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &FieldValidation> {
        self.results.iter().filter(|r| r.status == FieldStatus::Error)
    }
}

// --- Standard Rules ---

// A field of the wrong JSON type counts as missing.
fn present(p: &ProductRecord, path: &str) -> bool {
    p.text(path).map_or(false, |s| !s.trim().is_empty())
}

fn non_empty(p: &ProductRecord, path: &str) -> bool {
    p.list(path).map_or(false, |v| !v.is_empty())
}

const AUTO_CONTOURING: &str = "Auto-Contouring";

pub fn standard_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule {
            field: "Product Name",
            check: |p| present(p, "name"),
            severity: Severity::High,
            success_message: "Product name is set",
            failure_message: "Product name is missing",
        },
        ValidationRule {
            field: "Company",
            check: |p| present(p, "company"),
            severity: Severity::High,
            success_message: "Company is set",
            failure_message: "Company is missing",
        },
        ValidationRule {
            field: "Category",
            check: |p| present(p, "category"),
            severity: Severity::High,
            success_message: "Category is set",
            failure_message: "Category is missing",
        },
        ValidationRule {
            field: "Description",
            check: |p| present(p, "description"),
            severity: Severity::High,
            success_message: "Description is provided",
            failure_message: "Description is missing",
        },
        ValidationRule {
            field: "Website",
            check: |p| present(p, "website") || present(p, "productUrl"),
            severity: Severity::Medium,
            success_message: "Product website is linked",
            failure_message: "No product website or URL",
        },
        ValidationRule {
            field: "Version",
            check: |p| present(p, "version"),
            severity: Severity::Medium,
            success_message: "Version is set",
            failure_message: "Version is missing",
        },
        ValidationRule {
            field: "Release Date",
            check: |p| present(p, "releaseDate"),
            severity: Severity::Medium,
            success_message: "Release date is set",
            failure_message: "Release date is missing",
        },
        ValidationRule {
            field: "Modality",
            check: |p| non_empty(p, "modality"),
            severity: Severity::High,
            success_message: "Imaging modalities are listed",
            failure_message: "No imaging modality listed",
        },
        ValidationRule {
            field: "Anatomical Location",
            check: |p| non_empty(p, "anatomicalLocation"),
            severity: Severity::Medium,
            success_message: "Anatomical locations are listed",
            failure_message: "No anatomical location listed",
        },
        ValidationRule {
            field: "Key Features",
            check: |p| non_empty(p, "keyFeatures"),
            severity: Severity::Medium,
            success_message: "Key features are listed",
            failure_message: "No key features listed",
        },
        ValidationRule {
            field: "Supported Structures",
            check: |p| {
                p.text("category") != Some(AUTO_CONTOURING) || non_empty(p, "supportedStructures")
            },
            severity: Severity::Medium,
            success_message: "Supported structures are listed",
            failure_message: "Auto-contouring product lists no supported structures",
        },
        ValidationRule {
            field: "Regulatory Status",
            check: |p| present(p, "regulatory.ce.status") || present(p, "regulatory.fda.status"),
            severity: Severity::High,
            success_message: "CE or FDA status is documented",
            failure_message: "No CE or FDA status documented",
        },
        ValidationRule {
            field: "Intended Use",
            check: |p| present(p, "regulatory.intendedUseStatement"),
            severity: Severity::Medium,
            success_message: "Intended use statement is provided",
            failure_message: "Intended use statement is missing",
        },
        ValidationRule {
            field: "Clinical Evidence",
            check: |p| non_empty(p, "evidence"),
            severity: Severity::Low,
            success_message: "Clinical evidence is referenced",
            failure_message: "No clinical evidence referenced",
        },
        ValidationRule {
            field: "Market Presence",
            check: |p| present(p, "market.onMarketSince"),
            severity: Severity::Low,
            success_message: "Market availability is documented",
            failure_message: "Market availability is not documented",
        },
        ValidationRule {
            field: "Limitations",
            check: |p| non_empty(p, "limitations"),
            severity: Severity::Low,
            success_message: "Known limitations are listed",
            failure_message: "No limitations listed",
        },
        ValidationRule {
            field: "Guidelines",
            check: |p| non_empty(p, "guidelines"),
            severity: Severity::Low,
            success_message: "Guideline compliance is documented",
            failure_message: "No guideline compliance documented",
        },
        ValidationRule {
            field: "Technical Specifications",
            check: |p| p.object("technicalSpecifications").map_or(false, |t| !t.is_empty()),
            severity: Severity::Low,
            success_message: "Technical specifications are provided",
            failure_message: "Technical specifications are missing",
        },
    ]
}

const STANDARD_FIELD_PATHS: &[(&str, &[&str])] = &[
    ("Product Name", &["name"]),
    ("Company", &["company"]),
    ("Category", &["category"]),
    ("Description", &["description"]),
    ("Website", &["website", "productUrl"]),
    ("Version", &["version"]),
    ("Release Date", &["releaseDate"]),
    ("Modality", &["modality"]),
    ("Anatomical Location", &["anatomicalLocation"]),
    ("Key Features", &["keyFeatures"]),
    ("Supported Structures", &["supportedStructures"]),
    ("Regulatory Status", &["regulatory.ce.status", "regulatory.fda.status"]),
    ("Intended Use", &["regulatory.intendedUseStatement"]),
    ("Clinical Evidence", &["evidence"]),
    ("Market Presence", &["market.onMarketSince"]),
    ("Limitations", &["limitations"]),
    ("Guidelines", &["guidelines"]),
    ("Technical Specifications", &["technicalSpecifications"]),
];

pub fn standard_field_paths() -> FieldPaths {
    STANDARD_FIELD_PATHS.iter().copied().collect()
}

/// Validator runs the rule catalog and applies the severity policy
pub struct FieldValidator {
    rules: Vec<ValidationRule>,
    paths: FieldPaths,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::with_rules(standard_rules(), standard_field_paths())
    }

    pub fn with_rules(rules: Vec<ValidationRule>, paths: FieldPaths) -> Self {
        Self { rules, paths }
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Paths a field is reported under; unmapped fields use their own name
    pub fn paths_for(&self, field: &'static str) -> Vec<&'static str> {
        match self.paths.get(field) {
            Some(paths) if !paths.is_empty() => paths.to_vec(),
            _ => vec![field],
        }
    }

    pub fn validate(&self, product: Option<&ProductRecord>) -> ValidationReport {
        let Some(product) = product else {
            return ValidationReport::empty();
        };

        let mut report = ValidationReport {
            total_checks: self.rules.len(),
            ..Default::default()
        };

        for rule in &self.rules {
            let status = FieldStatus::classify((rule.check)(product), rule.severity);
            match status {
                FieldStatus::Valid => report.valid_count += 1,
                FieldStatus::Warning => report.warning_count += 1,
                FieldStatus::Error => report.error_count += 1,
            }

            let message = match status {
                FieldStatus::Valid => rule.success_message,
                _ => rule.failure_message,
            };
            for path in self.paths_for(rule.field) {
                report.results.push(FieldValidation {
                    field_name: rule.field.to_string(),
                    field_path: path.to_string(),
                    status,
                    severity: rule.severity,
                    message: message.to_string(),
                });
            }
        }

        report.is_valid = report.error_count == 0;
        debug!(
            product = %product.id(),
            errors = report.error_count,
            warnings = report.warning_count,
            "validated product"
        );
        report
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}
