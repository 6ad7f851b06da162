//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → handlers.rs (method dispatch, body parsing)
//!     → request.rs (client address, origin host, request ID)
//!     → edge::ContactService (ordered checks, forwarding)
//!     → response.rs (Outcome → status + JSON)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{resolve_client_address, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
