//! # mostrador-db: Database Layer for Mostrador POS
//!
//! This crate provides database access for the Mostrador POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mostrador POS Data Flow                            │
//! │                                                                         │
//! │  Bridge op (productos:obtener)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   mostrador-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │ product/      │    │  (embedded)  │   │   │
//! │  │   │               │    │ category/     │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ price/        │    │ 001_init.sql │   │   │
//! │  │   │ WAL + FK on   │    │ history       │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the per-user application data directory                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mostrador_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mostrador.db")).await?;
//! let products = db.products().list_with_prices().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig, DbInfo};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::history::PriceHistoryRepository;
pub use repository::price::CategoryPriceRepository;
pub use repository::product::ProductRepository;
