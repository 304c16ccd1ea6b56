//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - List and substring search, both returning each product with its
//!   per-category prices attached (the shape the storefront renders)
//! - CRUD operations
//! - Hard delete with CASCADE to the product's category prices
//!
//! ## Substring Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Search Works                                     │
//! │                                                                         │
//! │  User types: "café"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE '%café%' against name OR description (OR semantics: a match       │
//! │  in either field is enough; case handling follows SQLite's default      │
//! │  LIKE collation)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results with categoryPrices + category attached                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mostrador_core::{
    Category, CategoryPrice, CategoryPriceWithCategory, NewProduct, Product, ProductPatch,
    ProductWithPrices,
};

/// Joined row: one category price plus its category, keyed by product.
///
/// Column aliases (`c_*`) keep the category fields distinct from the
/// price fields in the flat row.
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

impl PriceWithCategoryRow {
    fn into_parts(self) -> (String, CategoryPriceWithCategory) {
        let product_id = self.product_id.clone();
        let entry = CategoryPriceWithCategory {
            price: CategoryPrice {
                id: self.id,
                product_id: self.product_id,
                category_id: self.category_id,
                price_cents: self.price_cents,
                cost_cents: self.cost_cents,
                margin: self.margin,
                is_active: self.is_active,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            category: Category {
                id: self.c_id,
                name: self.c_name,
                description: self.c_description,
                is_active: self.c_is_active,
                created_at: self.c_created_at,
            },
        };
        (product_id, entry)
    }
}

const PRICES_WITH_CATEGORY_SQL: &str = r#"
    SELECT
        cp.id, cp.product_id, cp.category_id,
        cp.price_cents, cp.cost_cents, cp.margin,
        cp.is_active, cp.created_at, cp.updated_at,
        c.id AS c_id, c.name AS c_name, c.description AS c_description,
        c.is_active AS c_is_active, c.created_at AS c_created_at
    FROM category_prices cp
    INNER JOIN categories c ON c.id = cp.category_id
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list_with_prices().await?;
/// let hits = repo.search("café").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products sorted by name, each with its per-category
    /// prices and categories attached.
    pub async fn list_with_prices(&self) -> DbResult<Vec<ProductWithPrices>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, created_at, updated_at
             FROM products ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_prices(products).await
    }

    /// Searches products by substring over name OR description.
    ///
    /// A match in either field is enough. Case handling follows the
    /// store's default LIKE collation.
    pub async fn search(&self, term: &str) -> DbResult<Vec<ProductWithPrices>> {
        debug!(term = %term, "Searching products");

        let pattern = format!("%{}%", term);
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, created_at, updated_at
             FROM products
             WHERE name LIKE ?1 OR description LIKE ?1
             ORDER BY name",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        self.attach_prices(products).await
    }

    /// Gets a product by its ID, with prices attached.
    ///
    /// ## Returns
    /// * `Ok(Some(_))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductWithPrices>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, created_at, updated_at
             FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let sql = format!("{} WHERE cp.product_id = ?1", PRICES_WITH_CATEGORY_SQL);
        let rows = sqlx::query_as::<_, PriceWithCategoryRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(ProductWithPrices {
            product,
            category_prices: rows.into_iter().map(|r| r.into_parts().1).collect(),
        }))
    }

    /// Inserts a new product.
    pub async fn insert(&self, nuevo: NewProduct) -> DbResult<Product> {
        debug!(name = %nuevo.name, "Inserting product");

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: nuevo.name,
            description: nuevo.description,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO products (id, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates a product. `None` fields in the patch are left untouched.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated product
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, patch: ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                updated_at = ?4
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, created_at, updated_at
             FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Deletes a product. Its category prices go with it via CASCADE;
    /// price-history entries deliberately survive.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Attaches category prices to a set of products, preserving order.
    ///
    /// One query for the products, one for all price rows; grouped in
    /// memory. Fine at local-catalog scale and avoids an N+1 per product.
    async fn attach_prices(&self, products: Vec<Product>) -> DbResult<Vec<ProductWithPrices>> {
        let rows = sqlx::query_as::<_, PriceWithCategoryRow>(PRICES_WITH_CATEGORY_SQL)
            .fetch_all(&self.pool)
            .await?;

        let mut by_product: HashMap<String, Vec<CategoryPriceWithCategory>> = HashMap::new();
        for row in rows {
            let (product_id, entry) = row.into_parts();
            by_product.entry(product_id).or_default().push(entry);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let category_prices = by_product.remove(&product.id).unwrap_or_default();
                ProductWithPrices {
                    product,
                    category_prices,
                }
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mostrador_core::{NewCategory, NewCategoryPrice, NewPriceHistory};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, description: Option<&str>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: description.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let created = db
            .products()
            .insert(new_product("Café de grano", Some("500g")))
            .await
            .unwrap();

        let fetched = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.product.name, "Café de grano");
        assert!(fetched.category_prices.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(new_product("Zanahoria", None)).await.unwrap();
        repo.insert(new_product("Arroz", None)).await.unwrap();
        repo.insert(new_product("Leche", None)).await.unwrap();

        let all = repo.list_with_prices().await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.product.name.as_str()).collect();
        assert_eq!(names, vec!["Arroz", "Leche", "Zanahoria"]);
    }

    #[tokio::test]
    async fn test_search_matches_name_or_description() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(new_product("Café molido", None)).await.unwrap();
        repo.insert(new_product("Azúcar", Some("endulzante para café")))
            .await
            .unwrap();
        repo.insert(new_product("Sal", Some("de mesa"))).await.unwrap();

        // OR semantics: hit on name and hit on description both count
        let hits = repo.search("café").await.unwrap();
        assert_eq!(hits.len(), 2);

        let none = repo.search("chocolate").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_patch_leaves_other_fields() {
        let db = test_db().await;
        let repo = db.products();
        let created = repo
            .insert(new_product("Café", Some("original")))
            .await
            .unwrap();

        let updated = repo
            .update(
                &created.id,
                ProductPatch {
                    name: Some("Café premium".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Café premium");
        assert_eq!(updated.description.as_deref(), Some("original"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_product_fails() {
        let db = test_db().await;
        let err = db
            .products()
            .update("nope", ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades_prices_but_history_survives() {
        let db = test_db().await;
        let product = db.products().insert(new_product("Café", None)).await.unwrap();
        let category = db
            .categories()
            .insert(NewCategory {
                name: "Mostrador".to_string(),
                description: None,
            })
            .await
            .unwrap();

        db.prices()
            .insert(NewCategoryPrice {
                product_id: product.id.clone(),
                category_id: category.id.clone(),
                price_cents: 1500,
                cost_cents: Some(1000),
            })
            .await
            .unwrap();

        db.history()
            .insert(NewPriceHistory {
                product_id: product.id.clone(),
                category_id: category.id.clone(),
                old_price_cents: 1200,
                new_price_cents: 1500,
                reason: None,
                changed_by: None,
            })
            .await
            .unwrap();

        db.products().delete(&product.id).await.unwrap();

        // Prices are gone with the product
        let prices = db.prices().list_by_product(&product.id).await.unwrap();
        assert!(prices.is_empty());

        // History outlives the product
        let history = db.history().list_by_product(&product.id, None).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_product_fails() {
        let db = test_db().await;
        let err = db.products().delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
