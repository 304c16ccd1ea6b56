//! # Shopping Cart
//!
//! The in-memory cart backing the point-of-sale screen. Nothing here is
//! persisted: the cart lives for the duration of a storefront session and
//! is recomputed from scratch on every mutation.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action        Bridge Op               Cart Change           │
//! │  ─────────────────        ─────────               ───────────           │
//! │  Click product ─────────► carrito:agregar ──────► add / qty += n        │
//! │  Change quantity ───────► carrito:actualizar ───► items[i].qty = n      │
//! │  Click remove ──────────► carrito:quitar ───────► items.remove(i)       │
//! │  Cancel sale ───────────► carrito:limpiar ──────► items.clear()         │
//! │  View cart ─────────────► carrito:obtener ──────► (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id`: adding an already-present product
//!   increments its quantity instead of creating a duplicate line
//! - Quantity is always > 0 (setting it to 0 removes the line)
//! - At most [`MAX_CART_ITEMS`](crate::MAX_CART_ITEMS) lines,
//!   [`MAX_ITEM_QUANTITY`](crate::MAX_ITEM_QUANTITY) per line

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Product;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// A line in the shopping cart.
///
/// The name and unit price are frozen at add time: if the product or its
/// category price changes in the database afterwards, this line keeps
/// displaying what the cashier saw when they added it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart.
    pub quantity: i64,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart line from a product and the price it was offered at.
    fn new(product: &Product, unit_price_cents: i64, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Line total: unit price × quantity.
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart.
    pub items: Vec<CartItem>,

    /// When the cart was created or last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart, or increments its quantity if already
    /// present.
    pub fn add_item(
        &mut self,
        product: &Product,
        unit_price_cents: i64,
        quantity: i64,
    ) -> CoreResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items
            .push(CartItem::new(product, unit_price_cents, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Quantity 0 removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ProductNotInCart(product_id.to_string())),
        }
    }

    /// Removes a line by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::ProductNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal: sum of line totals.
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(|i| i.line_total_cents()).sum()
    }

    /// Grand total. There is no tax model in this system, so the total
    /// equals the subtotal; keeping the two distinct mirrors the receipt
    /// layout the storefront renders.
    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

/// Cart totals summary for bridge responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal_cents(),
            total_cents: cart.total_cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Producto {}", id),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let product = test_product("1");

        cart.add_item(&product, 999, 2).unwrap(); // $9.99 each

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal_cents(), 1998);
    }

    #[test]
    fn test_cart_add_same_product_increments_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1");

        cart.add_item(&product, 999, 2).unwrap();
        cart.add_item(&product, 999, 3).unwrap();

        assert_eq!(cart.item_count(), 1); // still one line
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_subtotal_sums_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1"), 1500, 2).unwrap();
        cart.add_item(&test_product("2"), 250, 4).unwrap();

        assert_eq!(cart.subtotal_cents(), 2 * 1500 + 4 * 250);
        assert_eq!(cart.total_cents(), cart.subtotal_cents());
    }

    #[test]
    fn test_cart_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let product = test_product("1");

        cart.add_item(&product, 1000, 1).unwrap();
        // Incrementing the line keeps the original unit price
        cart.add_item(&product, 9999, 1).unwrap();

        assert_eq!(cart.items[0].unit_price_cents, 1000);
        assert_eq!(cart.subtotal_cents(), 2000);
    }

    #[test]
    fn test_cart_update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let product = test_product("1");

        cart.add_item(&product, 999, 2).unwrap();
        cart.update_quantity(&product.id, 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_update_quantity_missing_product_fails() {
        let mut cart = Cart::new();
        let err = cart.update_quantity("nope", 3).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotInCart(_)));
    }

    #[test]
    fn test_cart_quantity_cap() {
        let mut cart = Cart::new();
        let product = test_product("1");

        cart.add_item(&product, 999, 998).unwrap();
        let err = cart.add_item(&product, 999, 2).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1"), 999, 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_cents(), 0);
    }
}
