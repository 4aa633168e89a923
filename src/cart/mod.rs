//! Cart — line items, actions, and the reducer that applies them.
//!
//! DESIGN
//! ======
//! `reduce` is a total function over a closed action set. It never mutates
//! its input and never fails: invalid payloads (out-of-range quantities)
//! and unrecognized action tags fall through to the identity transition.
//!
//! WIRE FORMAT
//! ===========
//! Actions travel as `{"type": "ADD_ITEM", "payload": {...}}` and line
//! items use camelCase keys, so a persisted cart stays readable by the
//! storefront that wrote it.

pub mod session;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound for a single line's quantity.
pub const MAX_QUANTITY: u32 = 99;

/// Lower bound for a single line's quantity.
pub const MIN_QUANTITY: u32 = 1;

// =============================================================================
// STATE
// =============================================================================

/// One product line in the cart. `product_id` is unique within a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    /// Image path owned by the catalog; the cart only references it.
    pub image: String,
    pub quantity: u32,
}

/// Payload of `ADD_ITEM`: a cart line without a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
}

impl NewCartItem {
    fn into_line(self) -> CartItem {
        CartItem {
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            image: self.image,
            quantity: MIN_QUANTITY,
        }
    }
}

/// Cart contents plus panel visibility. Items keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub is_open: bool,
}

impl CartState {
    /// Empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        // `Sum for f64` starts at -0.0; fold from +0.0 so an empty cart is 0.00.
        self.items
            .iter()
            .fold(0.0, |acc, item| acc + item.price * f64::from(item.quantity))
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Every transition the cart accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub enum CartAction {
    AddItem(NewCartItem),
    RemoveItem(String),
    /// `quantity` stays a raw JSON number; the reducer rejects non-integers.
    UpdateQuantity { product_id: String, quantity: f64 },
    ClearCart,
    LoadCart(Vec<CartItem>),
    /// `Some(open)` sets the panel, `None` flips it.
    TogglePanel(Option<bool>),
    /// Any tag this cart does not know. Carries the tag for diagnostics.
    Unknown(String),
}

impl CartAction {
    /// The wire tag for this action.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::AddItem(_) => "ADD_ITEM",
            Self::RemoveItem(_) => "REMOVE_ITEM",
            Self::UpdateQuantity { .. } => "UPDATE_QUANTITY",
            Self::ClearCart => "CLEAR_CART",
            Self::LoadCart(_) => "LOAD_CART",
            Self::TogglePanel(_) => "TOGGLE_PANEL",
            Self::Unknown(kind) => kind.as_str(),
        }
    }
}

/// Tagged envelope used for (de)serializing [`CartAction`].
#[derive(Serialize, Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    payload: Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantityPayload {
    product_id: String,
    quantity: f64,
}

impl TryFrom<RawAction> for CartAction {
    type Error = serde_json::Error;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let RawAction { kind, payload } = raw;
        let action = match kind.as_str() {
            "ADD_ITEM" => Self::AddItem(serde_json::from_value(payload)?),
            "REMOVE_ITEM" => Self::RemoveItem(serde_json::from_value(payload)?),
            "UPDATE_QUANTITY" => {
                let QuantityPayload { product_id, quantity } = serde_json::from_value(payload)?;
                Self::UpdateQuantity { product_id, quantity }
            }
            "CLEAR_CART" => Self::ClearCart,
            "LOAD_CART" => Self::LoadCart(serde_json::from_value(payload)?),
            "TOGGLE_PANEL" => Self::TogglePanel(serde_json::from_value(payload)?),
            _ => Self::Unknown(kind),
        };
        Ok(action)
    }
}

impl From<CartAction> for RawAction {
    fn from(action: CartAction) -> Self {
        let kind = action.kind().to_owned();
        let payload = match action {
            CartAction::AddItem(item) => serde_json::json!(item),
            CartAction::RemoveItem(product_id) => Value::String(product_id),
            CartAction::UpdateQuantity { product_id, quantity } => {
                serde_json::json!(QuantityPayload { product_id, quantity })
            }
            CartAction::LoadCart(items) => serde_json::json!(items),
            CartAction::TogglePanel(open) => open.map_or(Value::Null, Value::Bool),
            CartAction::ClearCart | CartAction::Unknown(_) => Value::Null,
        };
        Self { kind, payload }
    }
}

// =============================================================================
// REDUCER
// =============================================================================

/// Apply `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    match action {
        CartAction::AddItem(item) => {
            let mut items = state.items.clone();
            match items.iter_mut().find(|line| line.product_id == item.product_id) {
                // EDGE: display fields stay those of the existing line.
                Some(line) => line.quantity = line.quantity.saturating_add(1).min(MAX_QUANTITY),
                None => items.push(item.into_line()),
            }
            CartState { items, is_open: state.is_open }
        }
        CartAction::RemoveItem(product_id) => CartState {
            items: state
                .items
                .iter()
                .filter(|line| line.product_id != product_id)
                .cloned()
                .collect(),
            is_open: state.is_open,
        },
        CartAction::UpdateQuantity { product_id, quantity } => {
            let Some(quantity) = valid_quantity(quantity) else {
                return state.clone();
            };
            let items = state
                .items
                .iter()
                .map(|line| {
                    if line.product_id == product_id {
                        CartItem { quantity, ..line.clone() }
                    } else {
                        line.clone()
                    }
                })
                .collect();
            CartState { items, is_open: state.is_open }
        }
        CartAction::ClearCart => CartState { items: Vec::new(), is_open: state.is_open },
        CartAction::LoadCart(items) => CartState { items, is_open: state.is_open },
        CartAction::TogglePanel(open) => CartState {
            items: state.items.clone(),
            is_open: open.unwrap_or(!state.is_open),
        },
        CartAction::Unknown(_) => state.clone(),
    }
}

/// Accept only whole numbers in `[MIN_QUANTITY, MAX_QUANTITY]`.
fn valid_quantity(quantity: f64) -> Option<u32> {
    let range = f64::from(MIN_QUANTITY)..=f64::from(MAX_QUANTITY);
    if quantity.fract().abs() > 0.0 || !range.contains(&quantity) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(quantity as u32)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
