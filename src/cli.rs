//! Command-line storefront client.
//!
//! DESIGN
//! ======
//! The CLI plays the storefront UI: it fetches the catalog from the
//! service, keeps the cart in a local `FileStore`, and renders plain text.
//! Each invocation opens the cart session, applies one command, and
//! flushes the store before exiting so the debounce window never drops
//! the last change.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::cart::session::CartSession;
use crate::cart::{CartAction, CartState, NewCartItem};
use crate::catalog::{self, Product};
use crate::checkout::{self, CheckoutError, OrderConfirmation, PaymentDetails, ShippingDetails};
use crate::config::{CartConfig, DEFAULT_BASE_URL, DEFAULT_STORE_DIR};
use crate::store::{FileStore, KvStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    #[error("invalid cart action JSON: {0}")]
    InvalidAction(#[from] serde_json::Error),
    #[error("cart storage failed: {0}")]
    Store(#[from] StoreError),
    #[error("checkout failed: {0}")]
    Checkout(#[from] CheckoutError),
    #[error("server failed: {0}")]
    Serve(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "octodeco", about = "Octodeco sticker storefront")]
pub struct Cli {
    /// Directory holding the local cart.
    #[arg(long, global = true, env = "OCTODECO_STORE_DIR", default_value = DEFAULT_STORE_DIR)]
    pub store_dir: PathBuf,

    /// Storefront service used for the catalog.
    #[arg(long, global = true, env = "OCTODECO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service.
    Serve,
    #[command(flatten)]
    Client(ClientCommand),
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// List the catalog.
    Products,
    /// Inspect or change the cart.
    Cart(CartCommand),
    /// Place a mock order for the cart.
    Checkout(CheckoutArgs),
}

#[derive(Args, Debug)]
pub struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CartSubcommand {
    Show,
    Add {
        product_id: String,
    },
    Remove {
        product_id: String,
    },
    /// Set a line's quantity (whole number, 1-99).
    Set {
        product_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: f64,
    },
    Clear,
    /// Apply raw actions in order, e.g. '{"type":"TOGGLE_PANEL"}'.
    Dispatch {
        #[arg(required = true)]
        actions: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub postal: String,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub card: String,
    #[arg(long)]
    pub expiry: String,
    #[arg(long)]
    pub cvv: String,
}

impl CheckoutArgs {
    fn into_details(self) -> (ShippingDetails, PaymentDetails) {
        (
            ShippingDetails {
                email: self.email,
                full_name: self.name,
                address: self.address,
                city: self.city,
                postal_code: self.postal,
                country: self.country,
            },
            PaymentDetails { card_number: self.card, expiry: self.expiry, cvv: self.cvv },
        )
    }
}

/// Settings for client commands.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub base_url: String,
    pub store_dir: PathBuf,
    pub cart: CartConfig,
}

/// Run one client command and return the text to print.
///
/// # Errors
///
/// Returns a [`CliError`] if the catalog cannot be fetched, an action or
/// product is invalid, checkout is rejected, or the cart cannot be saved.
pub async fn run(ctx: &ClientContext, command: ClientCommand) -> Result<String, CliError> {
    match command {
        ClientCommand::Products => Ok(render_products(&fetch_products(ctx).await?)),
        ClientCommand::Cart(cart) => run_cart(ctx, cart.command).await,
        ClientCommand::Checkout(args) => run_checkout(ctx, args).await,
    }
}

async fn open_session(ctx: &ClientContext) -> CartSession {
    let backend = FileStore::new(&ctx.store_dir).with_quota(ctx.cart.quota_bytes);
    CartSession::open(Some(Arc::new(backend) as Arc<dyn KvStore>), ctx.cart.debounce).await
}

async fn run_cart(ctx: &ClientContext, command: CartSubcommand) -> Result<String, CliError> {
    let mut session = open_session(ctx).await;
    let mut output = String::new();

    match command {
        CartSubcommand::Show => return Ok(render_cart(session.state())),
        CartSubcommand::Add { product_id } => {
            let products = fetch_products(ctx).await?;
            let product = catalog::find_product(&products, &product_id)
                .ok_or_else(|| CliError::UnknownProduct(product_id.clone()))?;
            session.dispatch(CartAction::AddItem(NewCartItem::from(product)));
            let _ = writeln!(output, "Added {} to cart!", product.name);
        }
        CartSubcommand::Remove { product_id } => session.dispatch(CartAction::RemoveItem(product_id)),
        CartSubcommand::Set { product_id, quantity } => {
            session.dispatch(CartAction::UpdateQuantity { product_id, quantity });
        }
        CartSubcommand::Clear => session.dispatch(CartAction::ClearCart),
        CartSubcommand::Dispatch { actions } => {
            // All-or-nothing: every action parses before any is applied.
            let actions = actions
                .iter()
                .map(|raw| serde_json::from_str::<CartAction>(raw))
                .collect::<Result<Vec<_>, _>>()?;
            for action in actions {
                session.dispatch(action);
            }
        }
    }

    session.flush().await?;
    output.push_str(&render_cart(session.state()));
    Ok(output)
}

async fn run_checkout(ctx: &ClientContext, args: CheckoutArgs) -> Result<String, CliError> {
    let mut session = open_session(ctx).await;
    let (shipping, payment) = args.into_details();
    let confirmation = checkout::place_order(&mut session, &shipping, &payment, &mut rand::rng())?;
    session.flush().await?;
    Ok(render_confirmation(&confirmation))
}

async fn fetch_products(ctx: &ClientContext) -> Result<Vec<Product>, CliError> {
    let url = format!("{}/api/products", ctx.base_url.trim_end_matches('/'));
    let products = reqwest::get(url)
        .await?
        .error_for_status()?
        .json::<Vec<Product>>()
        .await?;
    Ok(products)
}

// =============================================================================
// RENDERING
// =============================================================================

#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

#[must_use]
pub fn render_products(products: &[Product]) -> String {
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{:<24} {:>7}  {:<12} {}",
            product.id,
            format_price(product.price),
            product.category,
            product.name
        );
    }
    if out.is_empty() {
        out.push_str("No products available\n");
    }
    out
}

#[must_use]
pub fn render_cart(state: &CartState) -> String {
    let count = state.item_count();
    let noun = if count == 1 { "item" } else { "items" };
    let mut out = format!("Cart ({count} {noun})\n");

    if state.items.is_empty() {
        out.push_str("Your cart is empty\n");
    }
    for item in &state.items {
        let line_total = item.price * f64::from(item.quantity);
        let _ = writeln!(
            out,
            "  {:<24} {:>2} x {:>7} = {:>8}",
            item.name,
            item.quantity,
            format_price(item.price),
            format_price(line_total)
        );
    }
    let _ = writeln!(out, "Subtotal: {}", format_price(state.subtotal()));
    if state.is_open {
        out.push_str("Panel: open\n");
    }
    out
}

#[must_use]
pub fn render_confirmation(confirmation: &OrderConfirmation) -> String {
    let mut out = String::from("Thank you for your order!\n");
    let _ = writeln!(out, "Your order number is: #{}", confirmation.order_number);
    let _ = writeln!(
        out,
        "{} items, total {}",
        confirmation.item_count,
        format_price(confirmation.subtotal)
    );
    out.push_str("(This is a demo - your stickers will not actually be shipped)\n");
    out
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
