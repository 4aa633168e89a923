//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! storefront service is stateless apart from its configuration: the cart
//! lives with the client, and the catalog is re-read on every request.

use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}
