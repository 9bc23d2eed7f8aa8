pub mod config;
pub mod exporter;
pub mod observability;
pub mod redis;
pub mod tracer;

pub use config::{ConfigSource, EnvSource, LayeredConfig, Properties};
pub use exporter::{NewRelicConfiguration, NewRelicSpanExporterFactory, SpanExporterFactory};
pub use redis::{Command, CommandBatch, CommandPayload, RedisConnection};
pub use tracer::redis::{resolve_command_name, RedisClientTracer, TRACER};
