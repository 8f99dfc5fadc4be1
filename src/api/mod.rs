//! API clients for external services
//!
//! - Backend: the stream aggregator (catalog, detail, source resolution)

pub mod backend;

pub use backend::{BackendClient, BackendError};
