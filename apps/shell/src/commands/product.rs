//! # Product Commands
//!
//! Commands backing the `productos:*` bridge operations.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Search Flow                                  │
//! │                                                                         │
//! │  User types "café"                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  call('productos:buscar', { termino: 'café' })                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Trim + validate term (≤ 100 chars; empty term lists everything)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE '%café%' over name OR description                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Return Vec<ProductWithPrices> (prices + categories attached)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use mostrador_core::validation::{validate_name, validate_search_term};
use mostrador_core::{NewProduct, ProductPatch, ProductWithPrices};

/// Payload for operations addressing a single product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductoIdPayload {
    pub id: String,
}

/// Payload for `productos:buscar`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuscarProductosPayload {
    pub termino: String,
}

/// Payload for `productos:actualizar`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarProductoPayload {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Lists all products with their per-category prices.
pub async fn obtener_productos(db: &DbState) -> Result<Vec<ProductWithPrices>, ApiError> {
    debug!("productos:obtener command");
    let products = db.inner().products().list_with_prices().await?;
    Ok(products)
}

/// Searches products by substring over name or description.
pub async fn buscar_productos(
    db: &DbState,
    payload: BuscarProductosPayload,
) -> Result<Vec<ProductWithPrices>, ApiError> {
    let start = Instant::now();
    let termino = validate_search_term(&payload.termino)?;

    debug!(termino = %termino, "productos:buscar command");

    let products = db.inner().products().search(&termino).await?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = products.len(),
        "productos:buscar complete"
    );

    Ok(products)
}

/// Gets a single product by ID, with prices attached.
///
/// An unknown id resolves to `None` (the storefront receives
/// `data: null`); only store failures surface as errors.
pub async fn obtener_producto_por_id(
    db: &DbState,
    payload: ProductoIdPayload,
) -> Result<Option<ProductWithPrices>, ApiError> {
    debug!(id = %payload.id, "productos:obtenerPorId command");
    let product = db.inner().products().get_by_id(&payload.id).await?;
    Ok(product)
}

/// Creates a new product. The response carries the storefront shape,
/// with an empty price list.
pub async fn crear_producto(
    db: &DbState,
    payload: NewProduct,
) -> Result<ProductWithPrices, ApiError> {
    debug!(name = %payload.name, "productos:crear command");
    validate_name(&payload.name)?;

    let product = db.inner().products().insert(payload).await?;
    info!(id = %product.id, "Product created");
    Ok(ProductWithPrices {
        product,
        category_prices: Vec::new(),
    })
}

/// Updates a product. Omitted fields are left untouched; the response
/// carries the product's current prices.
pub async fn actualizar_producto(
    db: &DbState,
    payload: ActualizarProductoPayload,
) -> Result<ProductWithPrices, ApiError> {
    debug!(id = %payload.id, "productos:actualizar command");

    if let Some(name) = &payload.name {
        validate_name(name)?;
    }

    let patch = ProductPatch {
        name: payload.name,
        description: payload.description,
    };
    let product = db.inner().products().update(&payload.id, patch).await?;
    let category_prices = db.inner().prices().list_by_product(&product.id).await?;
    Ok(ProductWithPrices {
        product,
        category_prices,
    })
}

/// Deletes a product. Its category prices are removed via cascade.
pub async fn eliminar_producto(db: &DbState, payload: ProductoIdPayload) -> Result<(), ApiError> {
    debug!(id = %payload.id, "productos:eliminar command");
    db.inner().products().delete(&payload.id).await?;
    info!(id = %payload.id, "Product deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use mostrador_db::{Database, DbConfig};

    async fn test_state() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_crear_y_obtener() {
        let db = test_state().await;
        let created = crear_producto(
            &db,
            NewProduct {
                name: "Café de grano".to_string(),
                description: Some("500g".to_string()),
            },
        )
        .await
        .unwrap();

        // A freshly created product carries the storefront shape with an
        // empty price list
        assert!(created.category_prices.is_empty());

        let all = obtener_productos(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].product.id, created.product.id);
    }

    #[tokio::test]
    async fn test_crear_rejects_empty_name() {
        let db = test_state().await;
        let err = crear_producto(
            &db,
            NewProduct {
                name: "   ".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_buscar_empty_term_lists_everything() {
        let db = test_state().await;
        for name in ["Café", "Azúcar"] {
            crear_producto(
                &db,
                NewProduct {
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        }

        let hits = buscar_productos(
            &db,
            BuscarProductosPayload {
                termino: "  ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_obtener_por_id_missing_resolves_to_none() {
        let db = test_state().await;
        // An unknown id is not an error: the storefront gets data: null
        let found = obtener_producto_por_id(
            &db,
            ProductoIdPayload {
                id: "nope".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_actualizar_partial() {
        let db = test_state().await;
        let created = crear_producto(
            &db,
            NewProduct {
                name: "Café".to_string(),
                description: Some("original".to_string()),
            },
        )
        .await
        .unwrap();

        let updated = actualizar_producto(
            &db,
            ActualizarProductoPayload {
                id: created.product.id,
                name: Some("Café premium".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.product.name, "Café premium");
        assert_eq!(updated.product.description.as_deref(), Some("original"));
        assert!(updated.category_prices.is_empty());
    }

    #[tokio::test]
    async fn test_eliminar() {
        let db = test_state().await;
        let created = crear_producto(
            &db,
            NewProduct {
                name: "Café".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        eliminar_producto(
            &db,
            ProductoIdPayload {
                id: created.product.id.clone(),
            },
        )
        .await
        .unwrap();

        let found = obtener_producto_por_id(
            &db,
            ProductoIdPayload {
                id: created.product.id,
            },
        )
        .await
        .unwrap();
        assert!(found.is_none());
    }
}
