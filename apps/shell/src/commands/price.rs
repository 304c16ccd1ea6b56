//! # Price Commands
//!
//! Commands backing the `precios:*` bridge operations.
//!
//! ## Pricing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Per-Category Pricing                                 │
//! │                                                                         │
//! │  Product "Café de grano"                                                │
//! │  ├── Mostrador  ──► $15.00  (cost $10.00 → margin 50%)                  │
//! │  ├── Mayoreo    ──► $12.50  (cost $10.00 → margin 25%)                  │
//! │  └── Abarrotes  ──► $14.00  (no cost    → margin unset)                 │
//! │                                                                         │
//! │  One price per (product, category) pair, enforced by a UNIQUE index.    │
//! │  The margin is derived, never supplied by the caller.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use mostrador_core::validation::{validate_cost_cents, validate_price_cents};
use mostrador_core::{
    CategoryPrice, CategoryPricePatch, CategoryPriceWithCategory, CategoryPriceWithProduct,
    NewCategoryPrice,
};

/// Payload for operations addressing a single price row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecioIdPayload {
    pub id: String,
}

/// Payload for `precios:actualizar`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarPrecioPayload {
    pub id: String,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub cost_cents: Option<i64>,
}

/// Payload for `precios:obtenerPorProducto`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreciosPorProductoPayload {
    pub product_id: String,
}

/// Payload for `precios:obtenerPorCategoria`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreciosPorCategoriaPayload {
    pub category_id: String,
}

/// Assigns a product to a category with a price.
pub async fn asignar_precio(
    db: &DbState,
    payload: NewCategoryPrice,
) -> Result<CategoryPrice, ApiError> {
    debug!(
        product_id = %payload.product_id,
        category_id = %payload.category_id,
        "precios:asignar command"
    );

    validate_price_cents(payload.price_cents)?;
    validate_cost_cents(payload.cost_cents)?;

    let price = db.inner().prices().insert(payload).await?;
    info!(id = %price.id, margin = ?price.margin, "Price assigned");
    Ok(price)
}

/// Updates a price and/or cost. The margin is recomputed atomically
/// alongside the write.
pub async fn actualizar_precio(
    db: &DbState,
    payload: ActualizarPrecioPayload,
) -> Result<CategoryPrice, ApiError> {
    debug!(id = %payload.id, "precios:actualizar command");

    if let Some(cents) = payload.price_cents {
        validate_price_cents(cents)?;
    }
    validate_cost_cents(payload.cost_cents)?;

    let patch = CategoryPricePatch {
        price_cents: payload.price_cents,
        cost_cents: payload.cost_cents,
    };
    let price = db.inner().prices().update(&payload.id, patch).await?;
    info!(id = %price.id, margin = ?price.margin, "Price updated");
    Ok(price)
}

/// Lists all prices of a product, each with its category attached.
pub async fn obtener_precios_por_producto(
    db: &DbState,
    payload: PreciosPorProductoPayload,
) -> Result<Vec<CategoryPriceWithCategory>, ApiError> {
    debug!(product_id = %payload.product_id, "precios:obtenerPorProducto command");
    let prices = db
        .inner()
        .prices()
        .list_by_product(&payload.product_id)
        .await?;
    Ok(prices)
}

/// Lists all prices in a category, each with its product attached.
pub async fn obtener_precios_por_categoria(
    db: &DbState,
    payload: PreciosPorCategoriaPayload,
) -> Result<Vec<CategoryPriceWithProduct>, ApiError> {
    debug!(category_id = %payload.category_id, "precios:obtenerPorCategoria command");
    let prices = db
        .inner()
        .prices()
        .list_by_category(&payload.category_id)
        .await?;
    Ok(prices)
}

/// Removes a price assignment.
pub async fn eliminar_precio(db: &DbState, payload: PrecioIdPayload) -> Result<(), ApiError> {
    debug!(id = %payload.id, "precios:eliminar command");
    db.inner().prices().delete(&payload.id).await?;
    info!(id = %payload.id, "Price deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
