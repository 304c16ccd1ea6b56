//! # Shell Commands Module
//!
//! All commands exposed to the storefront through the bridge.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── productos:* (list, search, CRUD)
//! ├── category.rs  ◄─── categorias:* (list, create)
//! ├── price.rs     ◄─── precios:* (assign, update, list, delete)
//! ├── history.rs   ◄─── historial:* (record, list)
//! ├── cart.rs      ◄─── carrito:* (in-memory cart)
//! └── system.rs    ◄─── sistema:info (diagnostics)
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Storefront                                                             │
//! │  ──────────                                                             │
//! │  const res = await call('productos:buscar', { termino: 'café' });      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Bridge looks up the op, deserializes the payload, and invokes:        │
//! │                                                                         │
//! │  pub async fn buscar_productos(                                         │
//! │      db: &DbState,            ◄── Injected by the bridge                │
//! │      payload: BuscarPayload,  ◄── From the call payload                 │
//! │  ) -> Result<Vec<ProductWithPrices>, ApiError>                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Bridge wraps the Result into { success, data | error }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn buscar_productos(db: &DbState, ...)
//!
//! // Only needs cart
//! async fn obtener_carrito(cart: &CartState)
//!
//! // Needs both (price freezing requires a lookup)
//! async fn agregar_al_carrito(db: &DbState, cart: &CartState, ...)
//! ```

pub mod cart;
pub mod category;
pub mod history;
pub mod price;
pub mod product;
pub mod system;
