//! # State Module
//!
//! Manages application state for the shell.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything,
//! we use separate state types. This approach:
//!
//! 1. **Better Separation of Concerns**: Each state type has a single responsibility
//! 2. **Easier Testing**: Commands can be exercised with just the state they need
//! 3. **Clearer Command Signatures**: Commands declare exactly what state they need
//! 4. **Reduced Contention**: Independent states don't block each other
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         Bridge                                  │   │
//! │  │  holds DbState + CartState, hands them to commands              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │              ┌───────────────┴───────────────┐                          │
//! │              ▼                               ▼                          │
//! │      ┌──────────────┐                ┌──────────────┐                   │
//! │      │   DbState    │                │  CartState   │                   │
//! │      │              │                │              │                   │
//! │      │  Database    │                │  Arc<Mutex<  │                   │
//! │      │  (SQLite     │                │    Cart      │                   │
//! │      │   pool)      │                │  >>          │                   │
//! │      └──────────────┘                └──────────────┘                   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • DbState: Database has internal connection pool (thread-safe)         │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod db;

pub use cart::CartState;
pub use db::DbState;
