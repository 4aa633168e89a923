//! Octodeco — sticker storefront with a persisted cart and mock checkout.
//!
//! ARCHITECTURE
//! ============
//! - `cart`: reducer over cart actions, plus the session that persists it.
//! - `store`: key-value backends and the debounced persisted value holder.
//! - `catalog` / `routes`: the products document and its HTTP listing.
//! - `checkout`: mock order placement.
//! - `cli`: the terminal storefront client.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod routes;
pub mod state;
pub mod store;
