//! # Category Repository
//!
//! Database operations for pricing categories. The surface is small on
//! purpose: the storefront only ever lists categories and creates new
//! ones; deactivation is a flag flip done through future tooling.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::{Category, NewCategory};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories sorted by name.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, is_active, created_at
             FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Inserts a new category. New categories start active.
    pub async fn insert(&self, nueva: NewCategory) -> DbResult<Category> {
        debug!(name = %nueva.name, "Inserting category");

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: nueva.name,
            description: nueva.description,
            is_active: true,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO categories (id, name, description, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.is_active)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_starts_active() {
        let db = test_db().await;
        let category = db
            .categories()
            .insert(NewCategory {
                name: "Mayoreo".to_string(),
                description: Some("Precio por volumen".to_string()),
            })
            .await
            .unwrap();

        assert!(category.is_active);
        assert_eq!(category.name, "Mayoreo");
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = test_db().await;
        let repo = db.categories();
        for name in ["Mostrador", "Abarrotes", "Mayoreo"] {
            repo.insert(NewCategory {
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap();
        }

        let all = repo.list_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Abarrotes", "Mayoreo", "Mostrador"]);
    }
}
