//! # Mostrador Shell Entry Point
//!
//! Binary entry point for the Mostrador POS shell.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mostrador POS                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                       Storefront                                 │  │
//! │  │  • Product Search       • Per-Category Prices                    │  │
//! │  │  • Price History        • Cart Display                           │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │                                       │
//! │               call('op', payload) ─ JSON lines over stdio              │
//! │                                 │                                       │
//! │  ┌──────────────────────────────▼───────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Starts the runtime, delegates to lib.rs          │  │
//! │  │  lib.rs ─────► Logging, database, state, stdio loop             │  │
//! │  │  bridge.rs ──► Op dispatch + {success, data|error} envelopes    │  │
//! │  │  commands/ ──► productos:*, categorias:*, precios:*,            │  │
//! │  │                historial:*, carrito:*, sistema:info             │  │
//! │  │  state/ ─────► DbState, CartState                               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  mostrador.db (local file, WAL mode, foreign keys on)            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::error;

#[tokio::main]
async fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(e) = mostrador_shell::run().await {
        error!("Fatal error: {}", e);
        eprintln!("mostrador-shell: {}", e);
        std::process::exit(1);
    }
}
