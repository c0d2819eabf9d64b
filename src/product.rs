//! Product Records and Catalog

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub type ProductId = String;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    #[error("Product has no id")]
    MissingId,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One catalog entry, kept exactly as the maintainer wrote it.
///
/// The record is a view over the JSON document. Field types are not
/// enforced: a field of the wrong type simply reads as absent, so it fails
/// its validation rule instead of the whole record failing to load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord {
    document: Map<String, Value>,
}

impl ProductRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, company: impl Into<String>) -> Self {
        let (id, name, company): (String, String, String) = (id.into(), name.into(), company.into());
        Self::default()
            .with("id", id)
            .with("name", name)
            .with("company", company)
    }

    pub fn from_document(document: Map<String, Value>) -> Self {
        Self { document }
    }

    /// Set a top-level key, builder style
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.document.insert(key.to_string(), value.into());
        self
    }

    /// Drop a top-level key, builder style
    pub fn without(mut self, key: &str) -> Self {
        self.document.remove(key);
        self
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// The record id, or `""` when absent or not a string
    pub fn id(&self) -> &str {
        self.text("id").unwrap_or_default()
    }

    /// Resolve a dot-notation path such as `regulatory.ce.status`
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.document.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn list(&self, path: &str) -> Option<&Vec<Value>> {
        self.get(path).and_then(Value::as_array)
    }

    pub fn object(&self, path: &str) -> Option<&Map<String, Value>> {
        self.get(path).and_then(Value::as_object)
    }
}

impl TryFrom<Value> for ProductRecord {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

/// A file or record the catalog could not take in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub file: PathBuf,
    pub reason: String,
}

/// Product catalog - loads records and guards id uniqueness
#[derive(Debug)]
pub struct ProductCatalog {
    products: HashMap<ProductId, ProductRecord>,
    skipped: Vec<SkippedEntry>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self { products: HashMap::new(), skipped: vec![] }
    }

    /// Load every `*.json` file in `dir`.
    ///
    /// A file holds one product object or an array of them. Unreadable
    /// files, invalid JSON and entries without a string id are skipped and
    /// listed in [`ProductCatalog::skipped`]; the other entries of the same
    /// file still load. A duplicate id across files is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        if !dir.exists() {
            warn!(dir = %dir.display(), "products directory not found, catalog is empty");
            return Ok(catalog);
        }

        let mut paths = vec![];
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));
            let entries = match parsed {
                Ok(Value::Array(entries)) => entries,
                Ok(entry) => vec![entry],
                Err(reason) => {
                    catalog.skip(&path, reason);
                    continue;
                }
            };

            for (index, entry) in entries.into_iter().enumerate() {
                match ProductRecord::try_from(entry) {
                    Ok(record) if !record.id().is_empty() => catalog.register(record)?,
                    Ok(_) => catalog.skip(&path, format!("entry {} has no string id", index)),
                    Err(e) => catalog.skip(&path, format!("entry {}: {}", index, e)),
                }
            }
        }

        info!(
            dir = %dir.display(),
            count = catalog.len(),
            skipped = catalog.skipped.len(),
            "loaded product catalog"
        );
        Ok(catalog)
    }

    fn skip(&mut self, file: &Path, reason: String) {
        warn!(file = %file.display(), reason = %reason, "skipping product entry");
        self.skipped.push(SkippedEntry { file: file.to_path_buf(), reason });
    }

    /// Files and entries left out by [`ProductCatalog::load_from_dir`]
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.products.get(id)
    }

    /// All products, ordered by id
    pub fn list(&self) -> Vec<&ProductRecord> {
        let mut products: Vec<_> = self.products.values().collect();
        products.sort_by(|a, b| a.id().cmp(b.id()));
        products
    }

    pub fn register(&mut self, product: ProductRecord) -> Result<(), CatalogError> {
        let id = product.id().to_string();
        if id.is_empty() {
            return Err(CatalogError::MissingId);
        }
        if self.products.contains_key(&id) {
            return Err(CatalogError::DuplicateProduct(id));
        }
        self.products.insert(id, product);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}
