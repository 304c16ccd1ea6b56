//! # Category Commands
//!
//! Commands backing the `categorias:*` bridge operations.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use mostrador_core::validation::validate_name;
use mostrador_core::{Category, NewCategory};

/// Lists all categories sorted by name.
pub async fn obtener_categorias(db: &DbState) -> Result<Vec<Category>, ApiError> {
    debug!("categorias:obtener command");
    let categories = db.inner().categories().list_all().await?;
    Ok(categories)
}

/// Creates a new category. New categories start active.
pub async fn crear_categoria(db: &DbState, payload: NewCategory) -> Result<Category, ApiError> {
    debug!(name = %payload.name, "categorias:crear command");
    validate_name(&payload.name)?;

    let category = db.inner().categories().insert(payload).await?;
    info!(id = %category.id, "Category created");
    Ok(category)
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
        crear_categoria(
            &db,
            NewCategory {
                name: "Mayoreo".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let all = obtener_categorias(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_active);
    }

    #[tokio::test]
    async fn test_crear_rejects_empty_name() {
        let db = test_state().await;
        let err = crear_categoria(
            &db,
            NewCategory {
                name: "".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
