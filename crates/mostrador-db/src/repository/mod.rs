//! # Repository Module
//!
//! Database repository implementations for Mostrador POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Shell command                                                          │
//! │       │                                                                 │
//! │       │  db.prices().list_by_product(id)                                │
//! │       ▼                                                                 │
//! │  CategoryPriceRepository                                                │
//! │  ├── insert(&self, nuevo)                                               │
//! │  ├── update(&self, id, patch)   ← single atomic statement               │
//! │  ├── list_by_product(&self, id)                                         │
//! │  └── delete(&self, id)                                                  │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity                              │
//! │  • Clean separation of concerns, easy to test                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and substring search
//! - [`category::CategoryRepository`] - Category listing and creation
//! - [`price::CategoryPriceRepository`] - Per-category prices with derived margin
//! - [`history::PriceHistoryRepository`] - Append-only price-change log

pub mod category;
pub mod history;
pub mod price;
pub mod product;
