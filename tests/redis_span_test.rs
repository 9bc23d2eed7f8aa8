//! Redis Span Test
//!
//! Drives the Redis tracer through the span helpers under a capturing
//! subscriber and checks the recorded span fields.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use redis_telemetry::redis::{Command, CommandBatch, CommandPayload, RedisConnection};
use redis_telemetry::tracer::{self, redis::TRACER};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

type Fields = Arc<Mutex<HashMap<String, String>>>;

/// Collects every field recorded on any span into one map
#[derive(Clone, Default)]
struct CaptureLayer {
    fields: Fields,
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut fields = self.fields.lock().unwrap();
        attrs.record(&mut FieldVisitor(&mut fields));
    }

    fn on_record(&self, _id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut fields = self.fields.lock().unwrap();
        values.record(&mut FieldVisitor(&mut fields));
    }
}

fn capture<F: FnOnce()>(f: F) -> HashMap<String, String> {
    let layer = CaptureLayer::default();
    let fields = layer.fields.clone();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = fields.lock().unwrap().clone();
    captured
}

#[test]
fn test_single_command_span() {
    let fields = capture(|| {
        let conn = RedisConnection::new("10.0.0.5", 6379);
        let cmd = Command::new("GET").arg("session:abc");
        let span = tracer::start_span(&TRACER, &conn, &CommandPayload::from(&cmd));
        tracer::end_span::<String>(&span, Ok(()));
    });

    assert_eq!(fields["otel.name"], "GET");
    assert_eq!(fields["otel.kind"], "client");
    assert_eq!(fields["db.system"], "redis");
    assert_eq!(fields["db.statement"], "GET");
    assert_eq!(fields["db.connection_string"], "10.0.0.5:6379");
    assert_eq!(fields["net.peer.name"], "10.0.0.5");
    assert_eq!(fields["net.peer.port"], "6379");
    assert_eq!(fields["otel.library.name"], "io.opentelemetry.auto.redisson");
    assert_eq!(fields["otel.status_code"], "OK");
    assert!(!fields.contains_key("error.message"));
}

#[test]
fn test_pipeline_span_named_after_all_commands() {
    let fields = capture(|| {
        let conn = RedisConnection::new("cache.internal", 6380);
        let batch: CommandBatch = ["MULTI", "HSET", "EXPIRE", "EXEC"]
            .into_iter()
            .map(Command::new)
            .collect();
        let span = tracer::start_span(&TRACER, &conn, &CommandPayload::from(&batch));
        tracer::end_span(&span, Err("connection reset"));
    });

    assert_eq!(fields["otel.name"], "MULTI;HSET;EXPIRE;EXEC");
    assert_eq!(fields["db.connection_string"], "cache.internal:6380");
    assert_eq!(fields["otel.status_code"], "ERROR");
    assert_eq!(fields["error.message"], "connection reset");
}

#[test]
fn test_unknown_payload_without_peer() {
    let fields = capture(|| {
        let conn = RedisConnection::unconnected();
        let _span = tracer::start_span(&TRACER, &conn, &CommandPayload::Unknown);
    });

    assert_eq!(fields["otel.name"], "Redis Command");
    assert!(!fields.contains_key("net.peer.name"));
    assert!(!fields.contains_key("db.connection_string"));
}

#[test]
fn test_resolution_from_many_threads() {
    let batch: CommandBatch = (0..16).map(|i| Command::new(format!("CMD{i}"))).collect();
    let expected = (0..16)
        .map(|i| format!("CMD{i}"))
        .collect::<Vec<_>>()
        .join(";");

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let payload = CommandPayload::from(&batch);
                assert_eq!(redis_telemetry::resolve_command_name(&payload), expected);
            });
        }
    });
}
