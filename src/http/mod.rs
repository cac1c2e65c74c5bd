//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all relay handler)
//!     → request.rs (read + parse body, build the backend request)
//!         form.rs (URL-encoded bodies → JSON)
//!     → backend call (hyper-util client)
//!     → response.rs (inflate + JSON normalization, or byte passthrough)
//!     → Send to client
//!
//! Any failure on the way → error.rs (status + JSON envelope)
//! ```

pub mod error;
pub mod form;
pub mod request;
pub mod response;
pub mod server;

pub use error::ProxyError;
pub use request::{InboundRequest, OutboundRequest};
pub use server::{AppState, BackendClient, HttpServer};
