//! # System Commands
//!
//! Commands backing the `sistema:info` bridge operation. Used by the
//! storefront's diagnostics panel.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use mostrador_db::DbInfo;

/// Diagnostic snapshot for `sistema:info`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    /// Shell version, straight from the crate metadata.
    pub version: String,
    /// Database path, timeouts, and health.
    pub database: DbInfo,
    /// Catalog size, handy for a quick sanity check.
    pub product_count: i64,
}

/// Collects system diagnostics: version, database health, catalog size.
pub async fn info_sistema(db: &DbState) -> Result<SystemInfo, ApiError> {
    debug!("sistema:info command");

    let database = db.inner().info().await;
    let product_count = db.inner().products().count().await?;

    Ok(SystemInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        product_count,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::NewProduct;
    use mostrador_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_info_reports_health_and_count() {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        db.inner()
            .products()
            .insert(NewProduct {
                name: "Café".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let info = info_sistema(&db).await.unwrap();
        assert!(info.database.healthy);
        assert_eq!(info.product_count, 1);
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
