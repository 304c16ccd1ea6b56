//! # Domain Types
//!
//! Core domain types used throughout Mostrador POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │  CategoryPrice  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  name           │   │  product_id     │       │
//! │  │  description    │   │  description    │   │  category_id    │       │
//! │  │  timestamps     │   │  is_active      │   │  price + margin │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │ PriceHistory    │   Append-only: rows are never updated or          │
//! │  │  old → new      │   deleted, and carry no enforced FK so they       │
//! │  │  reason, author │   outlive the rows they reference.                │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization Contract
//! Everything crossing the call bridge serializes as camelCase JSON, matching
//! the storefront's field names (`productId`, `priceCents`, `changedAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Products carry no price of their own: pricing always lives on the
/// [`CategoryPrice`] rows that associate the product with a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the product grid.
    pub name: String,

    /// Optional long-form description.
    pub description: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Category
// =============================================================================

/// A pricing category (e.g. "Mostrador", "Mayoreo").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Whether the category is active (soft flag, not a delete).
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Category Price
// =============================================================================

/// The price a product carries within a specific category.
///
/// ## Margin Invariant
/// `margin` is derived from `price_cents` and `cost_cents` as
/// `(price - cost) / cost * 100` whenever cost > 0, and is unset otherwise.
/// It is recomputed on every price or cost change in the database itself,
/// inside the same UPDATE statement, so stored margin can never disagree
/// with its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CategoryPrice {
    pub id: String,
    pub product_id: String,
    pub category_id: String,

    /// Sale price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Acquisition cost in cents, when known.
    pub cost_cents: Option<i64>,

    /// Derived margin percentage; `None` when cost is absent or zero.
    pub margin: Option<f64>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for assigning a product to a category with a price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryPrice {
    pub product_id: String,
    pub category_id: String,
    pub price_cents: i64,
    pub cost_cents: Option<i64>,
}

/// Partial update for a category price. Margin is never accepted from the
/// caller; it is always recomputed from the effective price and cost.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPricePatch {
    pub price_cents: Option<i64>,
    pub cost_cents: Option<i64>,
}

// =============================================================================
// Price History
// =============================================================================

/// An entry in the append-only price-change log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryEntry {
    pub id: String,
    pub product_id: String,
    pub category_id: String,
    pub old_price_cents: i64,
    pub new_price_cents: i64,
    /// Free-form reason for the change ("promoción", "ajuste proveedor", ...).
    pub reason: Option<String>,
    /// Who made the change, when the storefront knows.
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Payload for recording a price change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPriceHistory {
    pub product_id: String,
    pub category_id: String,
    pub old_price_cents: i64,
    pub new_price_cents: i64,
    pub reason: Option<String>,
    pub changed_by: Option<String>,
}

// =============================================================================
// Composite Read Models
// =============================================================================

/// A category price with its category attached.
///
/// Mirrors the storefront's `categoryPrices: [{ ..., category }]` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPriceWithCategory {
    #[serde(flatten)]
    pub price: CategoryPrice,
    pub category: Category,
}

/// A category price with its product attached (category-centric listings).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPriceWithProduct {
    #[serde(flatten)]
    pub price: CategoryPrice,
    pub product: Product,
}

/// A product together with all of its per-category prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithPrices {
    #[serde(flatten)]
    pub product: Product,
    pub category_prices: Vec<CategoryPriceWithCategory>,
}

// =============================================================================
// Unit Tests
// =============================================================================
