//! Radiotherapy Catalog CLI - Bridge interface for the admin site
//!
//! Commands: products, validate, hash, check
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure or detected content change

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use rtcatalog_core::{
    compute_content_hash, has_content_changed, ProductCatalog, ProductRecord, ReviewPipeline,
};

#[derive(Parser)]
#[command(name = "rtcatalog-cli")]
#[command(about = "Radiotherapy Catalog CLI - Product validation and change tracking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to product data directory
    #[arg(short = 'd', long, env = "RTCATALOG_PRODUCTS_DIR", default_value = "products")]
    products_dir: PathBuf,
}

/// Either a catalog id or an inline JSON record
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ProductSource {
    /// Product ID in the catalog
    #[arg(short, long)]
    product: Option<String>,

    /// JSON payload (ProductRecord)
    #[arg(long)]
    payload: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products,

    /// Validate a product
    Validate {
        #[command(flatten)]
        source: ProductSource,
    },

    /// Print a product's content hash
    Hash {
        #[command(flatten)]
        source: ProductSource,
    },

    /// Compare a product against a stored content hash
    Check {
        #[command(flatten)]
        source: ProductSource,

        /// Previously stored content hash
        #[arg(long)]
        hash: String,
    },
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!(error = %e, "failed to render output"),
    }
}

fn fail(message: String) -> ExitCode {
    error!("{}", message);
    print_json(&json!({ "error": message }));
    ExitCode::FAILURE
}

fn resolve(pipeline: &ReviewPipeline, source: ProductSource) -> Result<ProductRecord, String> {
    match (source.product, source.payload) {
        (Some(id), _) => pipeline.get_product(&id)
            .cloned()
            .ok_or_else(|| format!("Product not found: {}", id)),
        (None, Some(payload)) => serde_json::from_str(&payload)
            .map_err(|e| format!("Invalid payload: {}", e)),
        (None, None) => Err("Either --product or --payload is required".to_string()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match ProductCatalog::load_from_dir(&cli.products_dir) {
        Ok(c) => c,
        Err(e) => return fail(format!("Failed to load products: {}", e)),
    };

    let pipeline = ReviewPipeline::new(catalog);

    match cli.command {
        Commands::Products => {
            let products: Vec<_> = pipeline.list_products()
                .iter()
                .map(|p| json!({
                    "id": p.id(),
                    "name": p.get("name"),
                    "company": p.get("company"),
                    "category": p.get("category"),
                }))
                .collect();

            print_json(&json!({
                "products": products,
                "skipped": pipeline.catalog().skipped(),
            }));
            ExitCode::SUCCESS
        }

        Commands::Validate { source } => {
            let product = match resolve(&pipeline, source) {
                Ok(p) => p,
                Err(e) => return fail(e),
            };

            let report = pipeline.validate_record(&product);
            print_json(&json!(report));
            if report.is_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)  // Validation failure
            }
        }

        Commands::Hash { source } => {
            let product = match resolve(&pipeline, source) {
                Ok(p) => p,
                Err(e) => return fail(e),
            };

            match compute_content_hash(&product) {
                Ok(hash) => {
                    print_json(&json!({ "id": product.id(), "contentHash": hash }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(format!("Hashing failed: {}", e)),
            }
        }

        Commands::Check { source, hash } => {
            let product = match resolve(&pipeline, source) {
                Ok(p) => p,
                Err(e) => return fail(e),
            };

            let changed = match has_content_changed(&product, &hash) {
                Ok(c) => c,
                Err(e) => return fail(format!("Hashing failed: {}", e)),
            };

            print_json(&json!({
                "id": product.id(),
                "changed": changed,
            }));
            if changed {
                ExitCode::from(2)  // Content changed, re-certification needed
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}
