//! # Call Bridge
//!
//! Routes storefront calls (op name + JSON payload) to command functions
//! and wraps every outcome in a `{ success, data | error }` envelope.
//!
//! ## Envelope Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bridge Envelope                                      │
//! │                                                                         │
//! │  call('productos:buscar', { termino: 'café' })                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                          │
//! │  │  Bridge::handle(op, payload)              │                          │
//! │  │  1. Match op to a command                 │                          │
//! │  │  2. Deserialize the payload               │                          │
//! │  │  3. Run the command                       │                          │
//! │  │  4. Fold the Result into an envelope      │                          │
//! │  └───────────────────────────────────────────┘                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Success: { success: true,  data: ... }                                 │
//! │  Failure: { success: false, error: "Error buscando productos: ..." }    │
//! │                                                                         │
//! │  INVARIANTS:                                                            │
//! │  • Exactly one of data / error is present, never both                   │
//! │  • The bridge NEVER throws: every failure becomes an envelope           │
//! │  • Error strings carry the Spanish action prefix of the op              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::commands::{cart, category, history, price, product, system};
use crate::error::ApiError;
use crate::state::{CartState, DbState};

/// A single storefront call: operation name plus JSON payload.
#[derive(Debug, Clone, Deserialize)]
pub struct IpcRequest {
    /// Operation name, e.g. `productos:buscar`.
    pub op: String,

    /// JSON payload; omitted for payload-less ops.
    #[serde(default)]
    pub payload: Value,
}

/// The envelope every call resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IpcResponse {
    /// Builds a success envelope.
    fn ok(data: Value) -> Self {
        IpcResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Builds a failure envelope. The message is never empty.
    fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "Error desconocido".to_string()
        } else {
            message
        };
        IpcResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Deserializes an op payload, turning malformed input into a
/// validation error instead of a crash.
fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::validation(format!("Payload inválido: {}", e)))
}

/// Folds a command result into an envelope, attaching the op's Spanish
/// action prefix to failures.
fn envelope<T: Serialize>(prefix: &str, result: Result<T, ApiError>) -> IpcResponse {
    match result {
        Ok(data) => match serde_json::to_value(data) {
            Ok(value) => IpcResponse::ok(value),
            Err(e) => {
                warn!("Response serialization failed: {}", e);
                IpcResponse::fail(format!("{}: error interno", prefix))
            }
        },
        Err(err) => {
            debug!(code = ?err.code, "Command failed: {}", err.message);
            IpcResponse::fail(format!("{}: {}", prefix, err.message))
        }
    }
}

/// The call bridge: owns the application state and dispatches ops.
#[derive(Debug, Clone)]
pub struct Bridge {
    db: DbState,
    cart: CartState,
}

impl Bridge {
    /// Creates a bridge over the given states.
    pub fn new(db: DbState, cart: CartState) -> Self {
        Bridge { db, cart }
    }

    /// Dispatches one call. Never panics, never returns an error:
    /// every outcome is an envelope.
    pub async fn handle(&self, op: &str, payload: Value) -> IpcResponse {
        debug!(op = %op, "Bridge dispatch");

        match op {
            // ── Products ────────────────────────────────────────────────
            "productos:obtener" => envelope(
                "Error obteniendo productos",
                product::obtener_productos(&self.db).await,
            ),
            "productos:buscar" => {
                let result = async {
                    let p = parse(payload)?;
                    product::buscar_productos(&self.db, p).await
                }
                .await;
                envelope("Error buscando productos", result)
            }
            "productos:obtenerPorId" => {
                let result = async {
                    let p = parse(payload)?;
                    product::obtener_producto_por_id(&self.db, p).await
                }
                .await;
                envelope("Error obteniendo producto", result)
            }
            "productos:crear" => {
                let result = async {
                    let p = parse(payload)?;
                    product::crear_producto(&self.db, p).await
                }
                .await;
                envelope("Error creando producto", result)
            }
            "productos:actualizar" => {
                let result = async {
                    let p = parse(payload)?;
                    product::actualizar_producto(&self.db, p).await
                }
                .await;
                envelope("Error actualizando producto", result)
            }
            "productos:eliminar" => {
                let result = async {
                    let p = parse(payload)?;
                    product::eliminar_producto(&self.db, p).await
                }
                .await;
                envelope("Error eliminando producto", result)
            }

            // ── Categories ──────────────────────────────────────────────
            "categorias:obtener" => envelope(
                "Error obteniendo categorías",
                category::obtener_categorias(&self.db).await,
            ),
            "categorias:crear" => {
                let result = async {
                    let p = parse(payload)?;
                    category::crear_categoria(&self.db, p).await
                }
                .await;
                envelope("Error creando categoría", result)
            }

            // ── Prices ──────────────────────────────────────────────────
            "precios:asignar" => {
                let result = async {
                    let p = parse(payload)?;
                    price::asignar_precio(&self.db, p).await
                }
                .await;
                envelope("Error asignando precio", result)
            }
            "precios:actualizar" => {
                let result = async {
                    let p = parse(payload)?;
                    price::actualizar_precio(&self.db, p).await
                }
                .await;
                envelope("Error actualizando precio", result)
            }
            "precios:obtenerPorProducto" => {
                let result = async {
                    let p = parse(payload)?;
                    price::obtener_precios_por_producto(&self.db, p).await
                }
                .await;
                envelope("Error obteniendo precios del producto", result)
            }
            "precios:obtenerPorCategoria" => {
                let result = async {
                    let p = parse(payload)?;
                    price::obtener_precios_por_categoria(&self.db, p).await
                }
                .await;
                envelope("Error obteniendo precios de la categoría", result)
            }
            "precios:eliminar" => {
                let result = async {
                    let p = parse(payload)?;
                    price::eliminar_precio(&self.db, p).await
                }
                .await;
                envelope("Error eliminando precio", result)
            }

            // ── Price history ───────────────────────────────────────────
            "historial:registrar" => {
                let result = async {
                    let p = parse(payload)?;
                    history::registrar_cambio(&self.db, p).await
                }
                .await;
                envelope("Error registrando cambio de precio", result)
            }
            "historial:obtener" => {
                let result = async {
                    let p = parse(payload)?;
                    history::obtener_historial(&self.db, p).await
                }
                .await;
                envelope("Error obteniendo historial", result)
            }

            // ── Cart ────────────────────────────────────────────────────
            "carrito:obtener" => envelope(
                "Error obteniendo carrito",
                cart::obtener_carrito(&self.cart).await,
            ),
            "carrito:agregar" => {
                let result = async {
                    let p = parse(payload)?;
                    cart::agregar_al_carrito(&self.db, &self.cart, p).await
                }
                .await;
                envelope("Error agregando al carrito", result)
            }
            "carrito:actualizar" => {
                let result = async {
                    let p = parse(payload)?;
                    cart::actualizar_cantidad(&self.cart, p).await
                }
                .await;
                envelope("Error actualizando carrito", result)
            }
            "carrito:quitar" => {
                let result = async {
                    let p = parse(payload)?;
                    cart::quitar_del_carrito(&self.cart, p).await
                }
                .await;
                envelope("Error quitando del carrito", result)
            }
            "carrito:limpiar" => envelope(
                "Error limpiando carrito",
                cart::limpiar_carrito(&self.cart).await,
            ),

            // ── System ──────────────────────────────────────────────────
            "sistema:info" => envelope(
                "Error obteniendo información del sistema",
                system::info_sistema(&self.db).await,
            ),

            unknown => {
                warn!(op = %unknown, "Unknown bridge operation");
                IpcResponse::fail(format!("Operación desconocida: {}", unknown))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
