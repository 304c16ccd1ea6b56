//! # Cart Commands
//!
//! Commands backing the `carrito:*` bridge operations.
//!
//! ## Price Freezing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    carrito:agregar                                      │
//! │                                                                         │
//! │  { productId, categoryId, cantidad }                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Look up the product and its price in that category                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Freeze name + unit price into the cart line                            │
//! │                                                                         │
//! │  Later price edits in the database do NOT touch lines already in the   │
//! │  cart; the cashier rings up what was on the screen.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartState, DbState};
use mostrador_core::validation::validate_quantity;
use mostrador_core::{Cart, CartTotals};

/// Payload for `carrito:agregar`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgregarAlCarritoPayload {
    pub product_id: String,
    /// Pricing category the sale happens under.
    pub category_id: String,
    #[serde(default = "default_quantity")]
    pub cantidad: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Payload for `carrito:actualizar`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarCantidadPayload {
    pub product_id: String,
    pub cantidad: i64,
}

/// Payload for `carrito:quitar`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuitarDelCarritoPayload {
    pub product_id: String,
}

/// The cart as the storefront sees it: lines plus derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(flatten)]
    pub cart: Cart,
    pub totals: CartTotals,
}

impl CartSnapshot {
    fn capture(cart: &Cart) -> Self {
        CartSnapshot {
            totals: CartTotals::from(cart),
            cart: cart.clone(),
        }
    }
}

/// Returns the current cart with totals.
pub async fn obtener_carrito(cart: &CartState) -> Result<CartSnapshot, ApiError> {
    debug!("carrito:obtener command");
    Ok(cart.with_cart(CartSnapshot::capture))
}

/// Adds a product to the cart, freezing its name and the unit price it
/// carries in the given category.
pub async fn agregar_al_carrito(
    db: &DbState,
    cart: &CartState,
    payload: AgregarAlCarritoPayload,
) -> Result<CartSnapshot, ApiError> {
    debug!(
        product_id = %payload.product_id,
        category_id = %payload.category_id,
        cantidad = payload.cantidad,
        "carrito:agregar command"
    );

    validate_quantity(payload.cantidad)?;

    let with_prices = db
        .inner()
        .products()
        .get_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &payload.product_id))?;

    let unit_price_cents = with_prices
        .category_prices
        .iter()
        .find(|cp| cp.price.category_id == payload.category_id)
        .map(|cp| cp.price.price_cents)
        .ok_or_else(|| {
            ApiError::not_found(
                "CategoryPrice",
                &format!("{}/{}", payload.product_id, payload.category_id),
            )
        })?;

    cart.with_cart_mut(|c| {
        c.add_item(&with_prices.product, unit_price_cents, payload.cantidad)?;
        Ok::<_, ApiError>(CartSnapshot::capture(c))
    })
}

/// Sets the quantity of a cart line. Quantity 0 removes the line.
pub async fn actualizar_cantidad(
    cart: &CartState,
    payload: ActualizarCantidadPayload,
) -> Result<CartSnapshot, ApiError> {
    debug!(
        product_id = %payload.product_id,
        cantidad = payload.cantidad,
        "carrito:actualizar command"
    );

    if payload.cantidad != 0 {
        validate_quantity(payload.cantidad)?;
    }

    cart.with_cart_mut(|c| {
        c.update_quantity(&payload.product_id, payload.cantidad)?;
        Ok::<_, ApiError>(CartSnapshot::capture(c))
    })
}

/// Removes a line from the cart.
pub async fn quitar_del_carrito(
    cart: &CartState,
    payload: QuitarDelCarritoPayload,
) -> Result<CartSnapshot, ApiError> {
    debug!(product_id = %payload.product_id, "carrito:quitar command");

    cart.with_cart_mut(|c| {
        c.remove_item(&payload.product_id)?;
        Ok::<_, ApiError>(CartSnapshot::capture(c))
    })
}

/// Empties the cart.
pub async fn limpiar_carrito(cart: &CartState) -> Result<CartSnapshot, ApiError> {
    debug!("carrito:limpiar command");

    cart.with_cart_mut(|c| {
        c.clear();
        Ok(CartSnapshot::capture(c))
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use mostrador_core::{NewCategory, NewCategoryPrice, NewProduct};
    use mostrador_db::{Database, DbConfig};

    async fn test_state() -> (DbState, CartState) {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        (db, CartState::new())
    }

    /// Seeds a product priced at 1500 cents in one category.
    async fn seed(db: &DbState) -> (String, String) {
        let product = db
            .inner()
            .products()
            .insert(NewProduct {
                name: "Café".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let category = db
            .inner()
            .categories()
            .insert(NewCategory {
                name: "Mostrador".to_string(),
                description: None,
            })
            .await
            .unwrap();
        db.inner()
            .prices()
            .insert(NewCategoryPrice {
                product_id: product.id.clone(),
                category_id: category.id.clone(),
                price_cents: 1500,
                cost_cents: None,
            })
            .await
            .unwrap();
        (product.id, category.id)
    }

    #[tokio::test]
    async fn test_agregar_freezes_category_price() {
        let (db, cart) = test_state().await;
        let (product_id, category_id) = seed(&db).await;

        let snapshot = agregar_al_carrito(
            &db,
            &cart,
            AgregarAlCarritoPayload {
                product_id: product_id.clone(),
                category_id,
                cantidad: 2,
            },
        )
        .await
        .unwrap();

        assert_eq!(snapshot.cart.items.len(), 1);
        assert_eq!(snapshot.cart.items[0].unit_price_cents, 1500);
        assert_eq!(snapshot.totals.subtotal_cents, 3000);
        assert_eq!(snapshot.totals.total_cents, 3000);
    }

    #[tokio::test]
    async fn test_agregar_unknown_product() {
        let (db, cart) = test_state().await;
        let err = agregar_al_carrito(
            &db,
            &cart,
            AgregarAlCarritoPayload {
                product_id: "nope".to_string(),
                category_id: "c1".to_string(),
                cantidad: 1,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_agregar_product_without_price_in_category() {
        let (db, cart) = test_state().await;
        let (product_id, _) = seed(&db).await;

        let err = agregar_al_carrito(
            &db,
            &cart,
            AgregarAlCarritoPayload {
                product_id,
                category_id: "otra-categoria".to_string(),
                cantidad: 1,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_actualizar_cantidad_zero_removes() {
        let (db, cart) = test_state().await;
        let (product_id, category_id) = seed(&db).await;

        agregar_al_carrito(
            &db,
            &cart,
            AgregarAlCarritoPayload {
                product_id: product_id.clone(),
                category_id,
                cantidad: 2,
            },
        )
        .await
        .unwrap();

        let snapshot = actualizar_cantidad(
            &cart,
            ActualizarCantidadPayload {
                product_id,
                cantidad: 0,
            },
        )
        .await
        .unwrap();

        assert!(snapshot.cart.items.is_empty());
        assert_eq!(snapshot.totals.total_cents, 0);
    }

    #[tokio::test]
    async fn test_quitar_missing_line() {
        let (_, cart) = test_state().await;
        let err = quitar_del_carrito(
            &cart,
            QuitarDelCarritoPayload {
                product_id: "nope".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_limpiar() {
        let (db, cart) = test_state().await;
        let (product_id, category_id) = seed(&db).await;

        agregar_al_carrito(
            &db,
            &cart,
            AgregarAlCarritoPayload {
                product_id,
                category_id,
                cantidad: 3,
            },
        )
        .await
        .unwrap();

        let snapshot = limpiar_carrito(&cart).await.unwrap();
        assert!(snapshot.cart.items.is_empty());
    }
}
