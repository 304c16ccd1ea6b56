//! # Database State
//!
//! Wraps the `Database` connection for use in shell commands.
//!
//! ## Thread Safety
//! The `Database` struct from `mostrador-db` contains a `SqlitePool` which
//! is inherently thread-safe. Multiple commands can execute queries
//! concurrently without explicit locking.

use mostrador_db::Database;

/// Wrapper around `Database` for the bridge's state.
///
/// ## Why a Wrapper?
/// Keeps the command signatures symmetric with [`CartState`] and gives
/// one obvious place to hang database-adjacent state later.
///
/// [`CartState`]: super::CartState
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = db_state.inner().products().list_with_prices().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
