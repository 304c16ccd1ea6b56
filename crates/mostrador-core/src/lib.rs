//! # mostrador-core: Pure Business Logic for Mostrador POS
//!
//! This crate is the **heart** of Mostrador POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mostrador POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Storefront (caller)                         │   │
//! │  │   productos:* ── categorias:* ── precios:* ── historial:*      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ call bridge ({success, data|error})    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Shell Commands                               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ mostrador-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │  margin   │  │   cart    │  │ validation│   │   │
//! │  │   │  Product  │  │  percent  │  │   Cart    │  │   rules   │   │   │
//! │  │   │  Category │  │           │  │ CartItem  │  │  checks   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 mostrador-db (Database Layer)                   │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, CategoryPrice, PriceHistory)
//! - [`margin`] - Profit margin computation
//! - [`cart`] - In-memory shopping cart with subtotal/total math
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float
//!    errors; the derived margin percentage is the only floating-point value
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use mostrador_core::margin::margin_percent;
//!
//! // $15.00 sale price against a $10.00 cost is a 50% margin
//! assert_eq!(margin_percent(1500, Some(1000)), Some(50.0));
//!
//! // No cost, no margin
//! assert_eq!(margin_percent(1500, None), None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod margin;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mostrador_core::Product` instead of
// `use mostrador_core::types::Product`.

pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
