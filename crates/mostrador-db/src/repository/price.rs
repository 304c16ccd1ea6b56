//! # Category Price Repository
//!
//! Database operations for per-category product prices.
//!
//! ## Margin Recomputation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Margin Update Strategy                               │
//! │                                                                         │
//! │  ❌ WRONG: read-modify-write (racy under concurrent updates)           │
//! │     row = SELECT ...; margin = f(row); UPDATE ... SET margin = ?       │
//! │                                                                         │
//! │  ✅ CORRECT: one atomic statement, margin derived in SQL               │
//! │     UPDATE category_prices SET                                          │
//! │         price_cents = COALESCE(?new_price, price_cents),               │
//! │         cost_cents  = COALESCE(?new_cost,  cost_cents),                │
//! │         margin = CASE WHEN effective_cost > 0                          │
//! │                  THEN (eff_price - eff_cost) * 100.0 / eff_cost        │
//! │                  ELSE NULL END                                          │
//! │                                                                         │
//! │  Column references on the right-hand side see the OLD row, so the      │
//! │  COALESCE(param, column) expressions are the effective new values      │
//! │  and the stored margin can never disagree with price/cost.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mostrador_core::margin::margin_percent;
use mostrador_core::{
    Category, CategoryPrice, CategoryPricePatch, CategoryPriceWithCategory,
    CategoryPriceWithProduct, NewCategoryPrice, Product,
};

const SELECT_PRICE_SQL: &str =
    "SELECT id, product_id, category_id, price_cents, cost_cents, margin,
            is_active, created_at, updated_at
     FROM category_prices WHERE id = ?1";

/// Joined row for category-centric listings: price plus product fields.
#[derive(Debug, sqlx::FromRow)]
struct PriceWithProductRow {
    id: String,
    product_id: String,
    category_id: String,
    price_cents: i64,
    cost_cents: Option<i64>,
    margin: Option<f64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    p_id: String,
    p_name: String,
    p_description: Option<String>,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
}

/// Joined row for product-centric listings: price plus category fields.
#[derive(Debug, sqlx::FromRow)]
struct PriceWithCategoryRow {
    id: String,
    product_id: String,
    category_id: String,
    price_cents: i64,
    cost_cents: Option<i64>,
    margin: Option<f64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    c_id: String,
    c_name: String,
    c_description: Option<String>,
    c_is_active: bool,
    c_created_at: DateTime<Utc>,
}

/// Repository for category-price database operations.
#[derive(Debug, Clone)]
pub struct CategoryPriceRepository {
    pool: SqlitePool,
}

impl CategoryPriceRepository {
    /// Creates a new CategoryPriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryPriceRepository { pool }
    }

    /// Assigns a product to a category with a price.
    ///
    /// The margin is derived at creation: `(price - cost) / cost * 100`
    /// when cost > 0, unset otherwise.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - the product already has a price in
    ///   this category
    /// * `DbError::ForeignKeyViolation` - product or category doesn't exist
    pub async fn insert(&self, nuevo: NewCategoryPrice) -> DbResult<CategoryPrice> {
        debug!(
            product_id = %nuevo.product_id,
            category_id = %nuevo.category_id,
            "Assigning category price"
        );

        let now = Utc::now();
        let price = CategoryPrice {
            id: Uuid::new_v4().to_string(),
            product_id: nuevo.product_id,
            category_id: nuevo.category_id,
            price_cents: nuevo.price_cents,
            cost_cents: nuevo.cost_cents,
            margin: margin_percent(nuevo.price_cents, nuevo.cost_cents),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO category_prices (
                id, product_id, category_id, price_cents, cost_cents, margin,
                is_active, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&price.id)
        .bind(&price.product_id)
        .bind(&price.category_id)
        .bind(price.price_cents)
        .bind(price.cost_cents)
        .bind(price.margin)
        .bind(price.is_active)
        .bind(price.created_at)
        .bind(price.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(price)
    }

    /// Updates a category price, recomputing the margin in the same
    /// statement.
    ///
    /// `None` fields in the patch leave the stored value untouched. The
    /// margin is always recomputed from the effective price and cost; if
    /// the effective cost is absent or zero the margin is unset, never
    /// left stale.
    ///
    /// ## Returns
    /// * `Ok(CategoryPrice)` - The updated row
    /// * `Err(DbError::NotFound)` - No such price
    pub async fn update(&self, id: &str, patch: CategoryPricePatch) -> DbResult<CategoryPrice> {
        debug!(id = %id, "Updating category price");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE category_prices SET
                price_cents = COALESCE(?2, price_cents),
                cost_cents  = COALESCE(?3, cost_cents),
                margin = CASE
                    WHEN COALESCE(?3, cost_cents, 0) > 0
                    THEN (COALESCE(?2, price_cents) - COALESCE(?3, cost_cents)) * 100.0
                         / COALESCE(?3, cost_cents)
                    ELSE NULL
                END,
                updated_at = ?4
             WHERE id = ?1",
        )
        .bind(id)
        .bind(patch.price_cents)
        .bind(patch.cost_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CategoryPrice", id));
        }

        let price = sqlx::query_as::<_, CategoryPrice>(SELECT_PRICE_SQL)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(price)
    }

    /// Gets a single category price by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CategoryPrice>> {
        let price = sqlx::query_as::<_, CategoryPrice>(SELECT_PRICE_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(price)
    }

    /// Lists all prices of a product, each with its category attached.
    pub async fn list_by_product(
        &self,
        product_id: &str,
    ) -> DbResult<Vec<CategoryPriceWithCategory>> {
        let rows = sqlx::query_as::<_, PriceWithCategoryRow>(
            "SELECT
                cp.id, cp.product_id, cp.category_id,
                cp.price_cents, cp.cost_cents, cp.margin,
                cp.is_active, cp.created_at, cp.updated_at,
                c.id AS c_id, c.name AS c_name, c.description AS c_description,
                c.is_active AS c_is_active, c.created_at AS c_created_at
             FROM category_prices cp
             INNER JOIN categories c ON c.id = cp.category_id
             WHERE cp.product_id = ?1",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryPriceWithCategory {
                price: CategoryPrice {
                    id: r.id,
                    product_id: r.product_id,
                    category_id: r.category_id,
                    price_cents: r.price_cents,
                    cost_cents: r.cost_cents,
                    margin: r.margin,
                    is_active: r.is_active,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                },
                category: Category {
                    id: r.c_id,
                    name: r.c_name,
                    description: r.c_description,
                    is_active: r.c_is_active,
                    created_at: r.c_created_at,
                },
            })
            .collect())
    }

    /// Lists all prices in a category, each with its product attached.
    pub async fn list_by_category(
        &self,
        category_id: &str,
    ) -> DbResult<Vec<CategoryPriceWithProduct>> {
        let rows = sqlx::query_as::<_, PriceWithProductRow>(
            "SELECT
                cp.id, cp.product_id, cp.category_id,
                cp.price_cents, cp.cost_cents, cp.margin,
                cp.is_active, cp.created_at, cp.updated_at,
                p.id AS p_id, p.name AS p_name, p.description AS p_description,
                p.created_at AS p_created_at, p.updated_at AS p_updated_at
             FROM category_prices cp
             INNER JOIN products p ON p.id = cp.product_id
             WHERE cp.category_id = ?1",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryPriceWithProduct {
                price: CategoryPrice {
                    id: r.id,
                    product_id: r.product_id,
                    category_id: r.category_id,
                    price_cents: r.price_cents,
                    cost_cents: r.cost_cents,
                    margin: r.margin,
                    is_active: r.is_active,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                },
                product: Product {
                    id: r.p_id,
                    name: r.p_name,
                    description: r.p_description,
                    created_at: r.p_created_at,
                    updated_at: r.p_updated_at,
                },
            })
            .collect())
    }

    /// Deletes a category price (hard delete).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category price");

        let result = sqlx::query("DELETE FROM category_prices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CategoryPrice", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mostrador_core::{NewCategory, NewProduct};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Creates one product and one category, returns their IDs.
    async fn seed(db: &Database) -> (String, String) {
        let product = db
            .products()
            .insert(NewProduct {
                name: "Café".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let category = db
            .categories()
            .insert(NewCategory {
                name: "Mostrador".to_string(),
                description: None,
            })
            .await
            .unwrap();
        (product.id, category.id)
    }

    #[tokio::test]
    async fn test_insert_derives_margin() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;

        let price = db
            .prices()
            .insert(NewCategoryPrice {
                product_id,
                category_id,
                price_cents: 1500,
                cost_cents: Some(1000),
            })
            .await
            .unwrap();

        // (1500 - 1000) / 1000 * 100 = 50%
        assert_eq!(price.margin, Some(50.0));
    }

    #[tokio::test]
    async fn test_insert_without_cost_leaves_margin_unset() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;

        let price = db
            .prices()
            .insert(NewCategoryPrice {
                product_id,
                category_id,
                price_cents: 1500,
                cost_cents: None,
            })
            .await
            .unwrap();

        assert_eq!(price.margin, None);
    }

    #[tokio::test]
    async fn test_insert_zero_cost_leaves_margin_unset() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;

        let price = db
            .prices()
            .insert(NewCategoryPrice {
                product_id,
                category_id,
                price_cents: 1500,
                cost_cents: Some(0),
            })
            .await
            .unwrap();

        assert_eq!(price.margin, None);
    }

    #[tokio::test]
    async fn test_update_price_recomputes_margin() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;
        let price = db
            .prices()
            .insert(NewCategoryPrice {
                product_id,
                category_id,
                price_cents: 1500,
                cost_cents: Some(1000),
            })
            .await
            .unwrap();

        // Only the price changes; margin must follow from the stored cost
        let updated = db
            .prices()
            .update(
                &price.id,
                CategoryPricePatch {
                    price_cents: Some(2000),
                    cost_cents: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price_cents, 2000);
        assert_eq!(updated.cost_cents, Some(1000));
        assert_eq!(updated.margin, Some(100.0));
    }

    #[tokio::test]
    async fn test_update_cost_recomputes_margin() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;
        let price = db
            .prices()
            .insert(NewCategoryPrice {
                product_id,
                category_id,
                price_cents: 1500,
                cost_cents: None,
            })
            .await
            .unwrap();
        assert_eq!(price.margin, None);

        let updated = db
            .prices()
            .update(
                &price.id,
                CategoryPricePatch {
                    price_cents: None,
                    cost_cents: Some(1200),
                },
            )
            .await
            .unwrap();

        // (1500 - 1200) / 1200 * 100 = 25%
        assert_eq!(updated.margin, Some(25.0));
    }

    #[tokio::test]
    async fn test_update_cost_to_zero_unsets_margin() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;
        let price = db
            .prices()
            .insert(NewCategoryPrice {
                product_id,
                category_id,
                price_cents: 1500,
                cost_cents: Some(1000),
            })
            .await
            .unwrap();
        assert!(price.margin.is_some());

        let updated = db
            .prices()
            .update(
                &price.id,
                CategoryPricePatch {
                    price_cents: None,
                    cost_cents: Some(0),
                },
            )
            .await
            .unwrap();

        // Margin must never stay stale against a zero cost
        assert_eq!(updated.cost_cents, Some(0));
        assert_eq!(updated.margin, None);
    }

    #[tokio::test]
    async fn test_update_missing_price_fails() {
        let db = test_db().await;
        let err = db
            .prices()
            .update("nope", CategoryPricePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_assignment_rejected() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;

        let nuevo = NewCategoryPrice {
            product_id,
            category_id,
            price_cents: 1500,
            cost_cents: None,
        };
        db.prices().insert(nuevo.clone()).await.unwrap();

        let err = db.prices().insert(nuevo).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_unknown_product_rejected() {
        let db = test_db().await;
        let (_, category_id) = seed(&db).await;

        let err = db
            .prices()
            .insert(NewCategoryPrice {
                product_id: "ghost".to_string(),
                category_id,
                price_cents: 100,
                cost_cents: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_by_product_and_category() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;
        db.prices()
            .insert(NewCategoryPrice {
                product_id: product_id.clone(),
                category_id: category_id.clone(),
                price_cents: 1500,
                cost_cents: Some(1000),
            })
            .await
            .unwrap();

        let by_product = db.prices().list_by_product(&product_id).await.unwrap();
        assert_eq!(by_product.len(), 1);
        assert_eq!(by_product[0].category.name, "Mostrador");

        let by_category = db.prices().list_by_category(&category_id).await.unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].product.name, "Café");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let (product_id, category_id) = seed(&db).await;
        let price = db
            .prices()
            .insert(NewCategoryPrice {
                product_id,
                category_id,
                price_cents: 1500,
                cost_cents: None,
            })
            .await
            .unwrap();

        db.prices().delete(&price.id).await.unwrap();
        assert!(db.prices().get_by_id(&price.id).await.unwrap().is_none());

        let err = db.prices().delete(&price.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
