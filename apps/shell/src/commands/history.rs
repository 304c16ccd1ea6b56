//! # Price History Commands
//!
//! Commands backing the `historial:*` bridge operations. Recording is
//! caller-driven: the storefront logs a change after a successful
//! `precios:actualizar`, carrying whatever reason the user typed.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use mostrador_core::validation::validate_price_cents;
use mostrador_core::{NewPriceHistory, PriceHistoryEntry};

/// Payload for `historial:obtener`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObtenerHistorialPayload {
    pub product_id: String,
    /// Narrows the log to one category when present.
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Records a price change in the append-only log.
pub async fn registrar_cambio(
    db: &DbState,
    payload: NewPriceHistory,
) -> Result<PriceHistoryEntry, ApiError> {
    debug!(
        product_id = %payload.product_id,
        old = payload.old_price_cents,
        new = payload.new_price_cents,
        "historial:registrar command"
    );

    validate_price_cents(payload.old_price_cents)?;
    validate_price_cents(payload.new_price_cents)?;

    let entry = db.inner().history().insert(payload).await?;
    info!(id = %entry.id, "Price change recorded");
    Ok(entry)
}

/// Lists a product's price-change log, newest first.
pub async fn obtener_historial(
    db: &DbState,
    payload: ObtenerHistorialPayload,
) -> Result<Vec<PriceHistoryEntry>, ApiError> {
    debug!(
        product_id = %payload.product_id,
        category_id = ?payload.category_id,
        "historial:obtener command"
    );

    let entries = db
        .inner()
        .history()
        .list_by_product(&payload.product_id, payload.category_id.as_deref())
        .await?;
    Ok(entries)
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

    fn cambio(old: i64, new: i64) -> NewPriceHistory {
        NewPriceHistory {
            product_id: "p1".to_string(),
            category_id: "c1".to_string(),
            old_price_cents: old,
            new_price_cents: new,
            reason: Some("ajuste proveedor".to_string()),
            changed_by: None,
        }
    }

    #[tokio::test]
    async fn test_registrar_y_obtener() {
        let db = test_state().await;
        registrar_cambio(&db, cambio(1000, 1200)).await.unwrap();
        registrar_cambio(&db, cambio(1200, 1500)).await.unwrap();

        let log = obtener_historial(
            &db,
            ObtenerHistorialPayload {
                product_id: "p1".to_string(),
                category_id: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(log.len(), 2);
        // Newest first
        assert_eq!(log[0].new_price_cents, 1500);
    }

    #[tokio::test]
    async fn test_registrar_rejects_negative_price() {
        let db = test_state().await;
        let err = registrar_cambio(&db, cambio(-1, 1200)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_obtener_with_category_filter() {
        let db = test_state().await;
        registrar_cambio(&db, cambio(1000, 1200)).await.unwrap();
        registrar_cambio(
            &db,
            NewPriceHistory {
                category_id: "c2".to_string(),
                ..cambio(800, 900)
            },
        )
        .await
        .unwrap();

        let filtered = obtener_historial(
            &db,
            ObtenerHistorialPayload {
                product_id: "p1".to_string(),
                category_id: Some("c2".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category_id, "c2");
    }
}
