//! Product catalog — the fixed-path products document.
//!
//! The catalog is a static JSON array read on every request. There is no
//! inventory or pricing logic; products are passed through as stored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cart::NewCartItem;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read products from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse products document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
}

impl From<&Product> for NewCartItem {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// Read and parse the products document at `path`, preserving order.
///
/// # Errors
///
/// Returns [`CatalogError::Read`] if the file cannot be read and
/// [`CatalogError::Parse`] if it is not a JSON array of products.
pub async fn load_products(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read { path: path.display().to_string(), source })?;
    parse_products(&contents)
}

/// Parse a products document.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] on malformed JSON or a shape mismatch.
pub fn parse_products(contents: &str) -> Result<Vec<Product>, CatalogError> {
    Ok(serde_json::from_str(contents)?)
}

#[must_use]
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|product| product.id == id)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
