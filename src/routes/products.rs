//! Product listing route.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use tracing::error;

use crate::catalog::{self, CatalogError, Product};
use crate::state::AppState;

/// `GET /api/products`: the catalog, or `[]` with a 500 if it cannot be loaded.
pub async fn list_products(State(state): State<AppState>) -> (StatusCode, Json<Vec<Product>>) {
    match catalog::load_products(&state.config.products_path).await {
        Ok(products) => (StatusCode::OK, Json(products)),
        Err(e) => {
            error!(error = %e, path = %state.config.products_path.display(), "error reading products");
            (catalog_error_to_status(&e), Json(Vec::new()))
        }
    }
}

pub(crate) fn catalog_error_to_status(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::Read { .. } | CatalogError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
