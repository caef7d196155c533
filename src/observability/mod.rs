//! Observability for the triage service
//!
//! Structured logging via tracing. Health endpoints live on the HTTP
//! adapter itself; there is no separate monitoring surface.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};
