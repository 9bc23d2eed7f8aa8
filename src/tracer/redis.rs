//! Redis Client Tracer
//!
//! Names spans after the command(s) being sent and reports the server the
//! connection talks to.

use super::DatabaseClientTracer;
use crate::redis::{Command, CommandPayload, PeerAddress, RemoteConnection};

pub const INSTRUMENTATION_NAME: &str = "io.opentelemetry.auto.redisson";

/// `db.system` for Redis
pub const DB_SYSTEM_REDIS: &str = "redis";

/// Name used when the payload is neither a command nor a batch
pub const FALLBACK_OPERATION_NAME: &str = "Redis Command";

const BATCH_SEPARATOR: &str = ";";

/// Stateless, so one shared instance serves every connection
pub static TRACER: RedisClientTracer = RedisClientTracer;

#[derive(Debug, Clone, Copy, Default)]
pub struct RedisClientTracer;

/// Operation name for a payload
///
/// Batches become their command names joined with `;` in send order (empty
/// batch gives an empty string), a single command its own name, and anything
/// else [`FALLBACK_OPERATION_NAME`].
pub fn resolve_command_name(payload: &CommandPayload<'_>) -> String {
    match payload {
        CommandPayload::Batch(batch) => batch
            .iter()
            .map(Command::name)
            .collect::<Vec<_>>()
            .join(BATCH_SEPARATOR),
        CommandPayload::Single(command) => command.name().to_string(),
        CommandPayload::Unknown => FALLBACK_OPERATION_NAME.to_string(),
    }
}

impl<'a, C> DatabaseClientTracer<C, CommandPayload<'a>> for RedisClientTracer
where
    C: RemoteConnection + ?Sized,
{
    fn instrumentation_name(&self) -> &'static str {
        INSTRUMENTATION_NAME
    }

    fn normalize_query(&self, query: &CommandPayload<'a>) -> String {
        resolve_command_name(query)
    }

    fn db_system(&self, _conn: &C) -> &'static str {
        DB_SYSTEM_REDIS
    }

    fn peer_address(&self, conn: &C) -> Option<PeerAddress> {
        conn.remote_addr()
    }

    fn db_connection_string(&self, conn: &C) -> Option<String> {
        conn.remote_addr().map(|peer| peer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redis::{CommandBatch, RedisConnection};
    use crate::tracer::DbCallInfo;

    fn batch(names: &[&str]) -> CommandBatch {
        names.iter().map(|n| Command::new(*n)).collect()
    }

    #[test]
    fn test_single_command_name() {
        let cmd = Command::new("HGETALL").arg("user:42");
        assert_eq!(resolve_command_name(&CommandPayload::from(&cmd)), "HGETALL");
    }

    #[test]
    fn test_batch_joined_in_order() {
        let b = batch(&["SET", "EXPIRE", "GET"]);
        assert_eq!(
            resolve_command_name(&CommandPayload::from(&b)),
            "SET;EXPIRE;GET"
        );
    }

    #[test]
    fn test_batch_separator_count() {
        for n in 1..8 {
            let names: Vec<String> = (0..n).map(|i| format!("CMD{i}")).collect();
            let b: CommandBatch = names.iter().map(|s| Command::new(s.as_str())).collect();
            let resolved = resolve_command_name(&CommandPayload::from(&b));
            assert_eq!(resolved.matches(';').count(), n - 1);
            assert_eq!(resolved, names.join(";"));
        }
    }

    #[test]
    fn test_single_element_batch_has_no_separator() {
        let b = batch(&["PING"]);
        assert_eq!(resolve_command_name(&CommandPayload::from(&b)), "PING");
    }

    #[test]
    fn test_empty_batch() {
        let b = CommandBatch::new();
        assert_eq!(resolve_command_name(&CommandPayload::from(&b)), "");
    }

    #[test]
    fn test_unknown_payload() {
        assert_eq!(
            resolve_command_name(&CommandPayload::Unknown),
            "Redis Command"
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let b = batch(&["MULTI", "INCR", "EXEC"]);
        let payload = CommandPayload::from(&b);
        assert_eq!(resolve_command_name(&payload), resolve_command_name(&payload));
    }

    #[test]
    fn test_tracer_hooks() {
        let conn = RedisConnection::new("10.1.2.3", 6379);
        let cmd = Command::new("GET").arg("k");
        let info = DbCallInfo::collect(&TRACER, &conn, &CommandPayload::from(&cmd));

        assert_eq!(info.instrumentation_name, INSTRUMENTATION_NAME);
        assert_eq!(info.db_system, "redis");
        assert_eq!(info.span_name, "GET");
        assert_eq!(info.statement, "GET");
        assert_eq!(info.connection_string.as_deref(), Some("10.1.2.3:6379"));
        assert_eq!(info.peer, Some(PeerAddress::new("10.1.2.3", 6379)));
    }

    #[test]
    fn test_empty_batch_span_falls_back_to_system() {
        let conn = RedisConnection::new("localhost", 6379);
        let b = CommandBatch::new();
        let info = DbCallInfo::collect(&TRACER, &conn, &CommandPayload::from(&b));
        assert_eq!(info.statement, "");
        assert_eq!(info.span_name, "redis");
    }

    #[test]
    fn test_unconnected_has_no_peer() {
        let conn = RedisConnection::unconnected();
        let info = DbCallInfo::collect(&TRACER, &conn, &CommandPayload::Unknown);
        assert_eq!(info.peer, None);
        assert_eq!(info.connection_string, None);
        assert_eq!(info.span_name, "Redis Command");
    }
}
