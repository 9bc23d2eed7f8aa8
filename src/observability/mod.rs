//! Observability
//!
//! - Structured logging setup (text or JSON)
//! - Span helpers for database client calls
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | `info` | Log filter directives |
//! | `REDIS_TELEMETRY_LOG_FORMAT` | `text` | `text` or `json` |

pub mod spans;
pub mod tracing_setup;

pub use spans::{db_client_span, exporter_setup_span};
pub use tracing_setup::{init as init_tracing, LogConfig, LogFormat};
