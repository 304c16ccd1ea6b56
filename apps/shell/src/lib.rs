//! # Mostrador Shell Library
//!
//! Core library for the Mostrador POS application shell. This is the
//! main entry point that wires state, commands, and the call bridge
//! together and serves calls over a JSON-lines stdio front door.
//!
//! ## Module Organization
//! ```text
//! mostrador_shell/
//! ├── lib.rs          ◄─── You are here (startup & stdio loop)
//! ├── bridge.rs       ◄─── Op dispatch + envelope contract
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── cart.rs     ◄─── Cart state (Arc<Mutex<Cart>>)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── productos:* commands
//! │   ├── category.rs ◄─── categorias:* commands
//! │   ├── price.rs    ◄─── precios:* commands
//! │   ├── history.rs  ◄─── historial:* commands
//! │   ├── cart.rs     ◄─── carrito:* commands
//! │   └── system.rs   ◄─── sistema:info command
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter (stderr, stdout is the wire)   │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Determine Database Path ──────────────────────────────────────────► │
//! │     • macOS: ~/Library/Application Support/com.mostrador.pos/           │
//! │     • Windows: %APPDATA%/mostrador/pos/                                 │
//! │     • Linux: ~/.local/share/mostrador-pos/                              │
//! │                                                                         │
//! │  3. Connect to Database ──────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, connect timeout 5s                          │
//! │     • Run pending migrations                                            │
//! │                                                                         │
//! │  4. Initialize State & Bridge ────────────────────────────────────────► │
//! │     • DbState: wraps the pooled Database                                │
//! │     • CartState: empty cart behind a Mutex                              │
//! │                                                                         │
//! │  5. Serve the Stdio Front Door ───────────────────────────────────────► │
//! │     one JSON request per line in, one JSON envelope per line out        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bridge::{Bridge, IpcRequest, IpcResponse};
use mostrador_db::{Database, DbConfig};
use state::{CartState, DbState};

/// Runs the shell: connects the database and serves bridge calls over
/// stdin/stdout until EOF.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Mostrador POS shell");

    let db_path = get_database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let bridge = Bridge::new(DbState::new(db), CartState::new());
    info!("Bridge initialized");

    serve_stdio(&bridge).await?;

    Ok(())
}

/// Serves the JSON-lines protocol: each stdin line is one `IpcRequest`,
/// each stdout line one `IpcResponse`. Blank lines are skipped; a line
/// that isn't valid JSON gets a failure envelope rather than killing
/// the loop.
async fn serve_stdio(bridge: &Bridge) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<IpcRequest>(line) {
            Ok(request) => bridge.handle(&request.op, request.payload).await,
            Err(e) => {
                warn!("Malformed request line: {}", e);
                IpcResponse {
                    success: false,
                    data: None,
                    error: Some(format!("Solicitud inválida: {}", e)),
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(json) => {
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Err(e) => error!("Failed to serialize response: {}", e),
        }
    }

    info!("Stdin closed, shutting down");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr: stdout carries the response envelopes.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mostrador=trace` - Trace for mostrador crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.mostrador.pos/mostrador.db`
/// - **Windows**: `%APPDATA%\mostrador\pos\mostrador.db`
/// - **Linux**: `~/.local/share/mostrador-pos/mostrador.db`
///
/// ## Development Override
/// Set `MOSTRADOR_DB_PATH` environment variable to use a custom path.
fn get_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Check for override
    if let Ok(path) = std::env::var("MOSTRADOR_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    // Use platform-specific app data directory
    let proj_dirs = ProjectDirs::from("com", "mostrador", "pos")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("mostrador.db"))
}
