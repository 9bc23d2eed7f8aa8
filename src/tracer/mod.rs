//! Database Client Tracing
//!
//! A database integration implements [`DatabaseClientTracer`] to describe its
//! calls; [`DbCallInfo`] and the span helpers turn that description into a
//! client span with the usual `db.*` / `net.peer.*` attributes.
//!
//! ```rust,ignore
//! use redis_telemetry::redis::{Command, CommandPayload, RedisConnection};
//! use redis_telemetry::tracer::{self, redis::TRACER};
//!
//! let conn = RedisConnection::new("127.0.0.1", 6379);
//! let cmd = Command::new("GET").arg("user:1");
//! let span = tracer::start_span(&TRACER, &conn, &CommandPayload::from(&cmd));
//! let result = span.in_scope(|| client.send(&cmd));
//! tracer::end_span(&span, result.as_ref().map(|_| ()));
//! ```

pub mod redis;

use tracing::Span;

use crate::observability::spans;
use crate::redis::PeerAddress;

/// Hooks a database integration fills in to get client spans
///
/// `Conn` is the client's connection handle, `Query` whatever the client
/// sends on it.
pub trait DatabaseClientTracer<Conn: ?Sized, Query: ?Sized>: Send + Sync {
    /// Instrumentation scope reported with every span
    fn instrumentation_name(&self) -> &'static str;

    /// Turn a raw query into a low-cardinality statement / span name
    fn normalize_query(&self, query: &Query) -> String;

    /// `db.system` value
    fn db_system(&self, conn: &Conn) -> &'static str;

    fn peer_address(&self, conn: &Conn) -> Option<PeerAddress>;

    fn db_connection_string(&self, conn: &Conn) -> Option<String>;
}

/// Everything the span driver needs to know about one database call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCallInfo {
    pub instrumentation_name: &'static str,
    pub span_name: String,
    pub db_system: &'static str,
    pub statement: String,
    pub connection_string: Option<String>,
    pub peer: Option<PeerAddress>,
}

impl DbCallInfo {
    /// Ask `tracer` to describe a call of `query` on `conn`
    pub fn collect<T, C, Q>(tracer: &T, conn: &C, query: &Q) -> Self
    where
        T: DatabaseClientTracer<C, Q> + ?Sized,
        C: ?Sized,
        Q: ?Sized,
    {
        let statement = tracer.normalize_query(query);
        let db_system = tracer.db_system(conn);
        // Empty statements (e.g. an empty pipeline) fall back to the system name
        let span_name = if statement.is_empty() {
            db_system.to_string()
        } else {
            statement.clone()
        };

        DbCallInfo {
            instrumentation_name: tracer.instrumentation_name(),
            span_name,
            db_system,
            statement,
            connection_string: tracer.db_connection_string(conn),
            peer: tracer.peer_address(conn),
        }
    }
}

/// Start a client span for a call of `query` on `conn`
pub fn start_span<T, C, Q>(tracer: &T, conn: &C, query: &Q) -> Span
where
    T: DatabaseClientTracer<C, Q> + ?Sized,
    C: ?Sized,
    Q: ?Sized,
{
    let info = DbCallInfo::collect(tracer, conn, query);
    spans::db_client_span(&info)
}

/// Record the outcome of a call on a span from [`start_span`]
pub fn end_span<E: std::fmt::Display>(span: &Span, result: Result<(), E>) {
    match result {
        Ok(()) => {
            span.record("otel.status_code", "OK");
        }
        Err(e) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", e.to_string().as_str());
            tracing::debug!(parent: span, error = %e, "database call failed");
        }
    }
}
