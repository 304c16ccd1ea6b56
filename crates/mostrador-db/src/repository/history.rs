//! # Price History Repository
//!
//! Append-only log of price changes. Entries are never updated or
//! deleted, and they carry no foreign keys: the log must survive the
//! deletion of the product or category it refers to.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::{NewPriceHistory, PriceHistoryEntry};

/// Repository for the price-change log.
#[derive(Debug, Clone)]
pub struct PriceHistoryRepository {
    pool: SqlitePool,
}

impl PriceHistoryRepository {
    /// Creates a new PriceHistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PriceHistoryRepository { pool }
    }

    /// Appends a price-change entry to the log.
    pub async fn insert(&self, nuevo: NewPriceHistory) -> DbResult<PriceHistoryEntry> {
        debug!(
            product_id = %nuevo.product_id,
            old = nuevo.old_price_cents,
            new = nuevo.new_price_cents,
            "Recording price change"
        );

        let entry = PriceHistoryEntry {
            id: Uuid::new_v4().to_string(),
            product_id: nuevo.product_id,
            category_id: nuevo.category_id,
            old_price_cents: nuevo.old_price_cents,
            new_price_cents: nuevo.new_price_cents,
            reason: nuevo.reason,
            changed_by: nuevo.changed_by,
            changed_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO price_history (
                id, product_id, category_id, old_price_cents, new_price_cents,
                reason, changed_by, changed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&entry.id)
        .bind(&entry.product_id)
        .bind(&entry.category_id)
        .bind(entry.old_price_cents)
        .bind(entry.new_price_cents)
        .bind(&entry.reason)
        .bind(&entry.changed_by)
        .bind(entry.changed_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists the change log for a product, newest first.
    ///
    /// An optional category narrows the log to that category's prices.
    pub async fn list_by_product(
        &self,
        product_id: &str,
        category_id: Option<&str>,
    ) -> DbResult<Vec<PriceHistoryEntry>> {
        let entries = sqlx::query_as::<_, PriceHistoryEntry>(
            "SELECT id, product_id, category_id, old_price_cents, new_price_cents,
                    reason, changed_by, changed_at
             FROM price_history
             WHERE product_id = ?1 AND (?2 IS NULL OR category_id = ?2)
             ORDER BY changed_at DESC",
        )
        .bind(product_id)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
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

    fn entry(product: &str, category: &str, old: i64, new: i64) -> NewPriceHistory {
        NewPriceHistory {
            product_id: product.to_string(),
            category_id: category.to_string(),
            old_price_cents: old,
            new_price_cents: new,
            reason: None,
            changed_by: None,
        }
    }

    #[tokio::test]
    async fn test_insert_does_not_require_existing_product() {
        // The log has no foreign keys: entries outlive the rows they
        // refer to.
        let db = test_db().await;
        let recorded = db
            .history()
            .insert(NewPriceHistory {
                reason: Some("promoción".to_string()),
                changed_by: Some("admin".to_string()),
                ..entry("p-gone", "c-gone", 1000, 900)
            })
            .await
            .unwrap();

        assert_eq!(recorded.old_price_cents, 1000);
        assert_eq!(recorded.new_price_cents, 900);
        assert_eq!(recorded.reason.as_deref(), Some("promoción"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = test_db().await;
        let repo = db.history();
        repo.insert(entry("p1", "c1", 100, 200)).await.unwrap();
        repo.insert(entry("p1", "c1", 200, 300)).await.unwrap();
        repo.insert(entry("p1", "c1", 300, 400)).await.unwrap();

        let log = repo.list_by_product("p1", None).await.unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].new_price_cents, 400);
        assert_eq!(log[2].new_price_cents, 200);
    }

    #[tokio::test]
    async fn test_list_filters_by_category() {
        let db = test_db().await;
        let repo = db.history();
        repo.insert(entry("p1", "mostrador", 100, 200)).await.unwrap();
        repo.insert(entry("p1", "mayoreo", 80, 150)).await.unwrap();
        repo.insert(entry("p2", "mostrador", 500, 600)).await.unwrap();

        let all = repo.list_by_product("p1", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = repo.list_by_product("p1", Some("mayoreo")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category_id, "mayoreo");
    }

    #[tokio::test]
    async fn test_list_empty_for_unknown_product() {
        let db = test_db().await;
        let log = db.history().list_by_product("nadie", None).await.unwrap();
        assert!(log.is_empty());
    }
}
