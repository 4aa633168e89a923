//! Mock checkout — validates the order form and empties the cart.
//!
//! DESIGN
//! ======
//! No payment is processed and no order is stored. A successful checkout
//! snapshots the cart into an `OrderConfirmation`, assigns a random
//! five-digit order number, and dispatches `CLEAR_CART`. Payment fields are
//! only checked for presence and never logged.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cart::session::CartSession;
use crate::cart::{CartAction, CartItem};

/// Order numbers are five digits.
pub const ORDER_NUMBER_RANGE: RangeInclusive<u32> = 10_000..=99_999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub email: String,
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Clone, Default, Deserialize)]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &"<redacted>")
            .field("expiry", &"<redacted>")
            .field("cvv", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: f64,
}

/// Validate the form, confirm the order, and clear the cart.
///
/// The cart is left untouched when validation fails.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart,
/// [`CheckoutError::MissingField`] for the first blank form field, and
/// [`CheckoutError::InvalidEmail`] for an email without `@`.
pub fn place_order<R: Rng>(
    session: &mut CartSession,
    shipping: &ShippingDetails,
    payment: &PaymentDetails,
    rng: &mut R,
) -> Result<OrderConfirmation, CheckoutError> {
    if session.state().items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    validate(shipping, payment)?;

    let confirmation = OrderConfirmation {
        order_number: rng.random_range(ORDER_NUMBER_RANGE).to_string(),
        items: session.state().items.clone(),
        item_count: session.item_count(),
        subtotal: session.subtotal(),
    };
    session.dispatch(CartAction::ClearCart);

    info!(
        order_number = %confirmation.order_number,
        item_count = confirmation.item_count,
        subtotal = confirmation.subtotal,
        "mock order placed"
    );
    Ok(confirmation)
}

fn validate(shipping: &ShippingDetails, payment: &PaymentDetails) -> Result<(), CheckoutError> {
    let required = [
        ("email", &shipping.email),
        ("full_name", &shipping.full_name),
        ("address", &shipping.address),
        ("city", &shipping.city),
        ("postal_code", &shipping.postal_code),
        ("country", &shipping.country),
        ("card_number", &payment.card_number),
        ("expiry", &payment.expiry),
        ("cvv", &payment.cvv),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(CheckoutError::MissingField(*field));
    }

    let email = shipping.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(CheckoutError::InvalidEmail(email.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;
