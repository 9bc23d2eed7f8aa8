//! Span Helpers for Database Client Calls
//!
//! Field names follow the OpenTelemetry database and network semantic
//! conventions. `otel.*` fields are picked up by tracing-opentelemetry.

use tracing::field::Empty;
use tracing::{span, Level, Span};

use crate::tracer::DbCallInfo;

/// Create a client span for one database call
///
/// `otel.status_code` and `error.message` start empty and are filled in by
/// [`crate::tracer::end_span`].
pub fn db_client_span(info: &DbCallInfo) -> Span {
    let span = span!(
        Level::INFO,
        "db.client",
        otel.name = %info.span_name,
        otel.kind = "client",
        otel.library.name = info.instrumentation_name,
        db.system = info.db_system,
        db.statement = %info.statement,
        db.connection_string = Empty,
        net.peer.name = Empty,
        net.peer.port = Empty,
        otel.status_code = Empty,
        error.message = Empty,
    );

    if let Some(conn_str) = &info.connection_string {
        span.record("db.connection_string", conn_str.as_str());
    }
    if let Some(peer) = &info.peer {
        span.record("net.peer.name", peer.host());
        span.record("net.peer.port", u64::from(peer.port()));
    }
    span
}

/// Create a span covering exporter construction at startup
#[inline]
pub fn exporter_setup_span(exporter: &str) -> Span {
    span!(
        Level::INFO,
        "exporter.setup",
        exporter.name = %exporter,
        otel.kind = "internal"
    )
}
