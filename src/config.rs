//! Runtime configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) before reading these, so local overrides
//! live next to the binary. CLI flags take precedence over the environment
//! for the client-side settings; see `cli`.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PRODUCTS_PATH: &str = "data/products.json";
pub const DEFAULT_STORE_DIR: &str = ".octodeco";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_CART_PERSIST_DEBOUNCE_MS: u64 = 100;
/// Same order of magnitude as browser local storage.
const DEFAULT_CART_STORE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub products_path: PathBuf,
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            products_path: std::env::var("PRODUCTS_PATH")
                .map_or_else(|_| PathBuf::from(DEFAULT_PRODUCTS_PATH), PathBuf::from),
        }
    }
}

/// Tuning for the persisted cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartConfig {
    /// Quiet period before a cart change is written.
    pub debounce: Duration,
    /// Largest stored cart document, in bytes.
    pub quota_bytes: usize,
}

impl CartConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            debounce: Duration::from_millis(env_parse("CART_PERSIST_DEBOUNCE_MS", DEFAULT_CART_PERSIST_DEBOUNCE_MS)),
            quota_bytes: env_parse("CART_STORE_QUOTA_BYTES", DEFAULT_CART_STORE_QUOTA_BYTES),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
