//! HTTP surface for the reporting backend.
//!
//! Structure:
//! - `router` — route table + middleware stack
//! - `server` — bind/serve lifecycle with graceful shutdown
//! - `error` — domain-error → HTTP status mapping
//! - `types` — shared context and response envelopes
//! - `endpoints/` — one module per resource
//! - `middleware/` — auth boundary + audit logging

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use types::ApiContext;
