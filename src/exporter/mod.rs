//! New Relic Span Exporter Configuration
//!
//! Resolves exporter settings from the environment and a properties source,
//! then configures an exporter builder with them.
//!
//! # Settings
//!
//! | Property | Environment | Default |
//! |----------|-------------|---------|
//! | `otel.newrelic.api.key` | `OTEL_NEW_RELIC_API_KEY` | `` |
//! | `otel.newrelic.enable.audit.logging` | `OTEL_NEW_RELIC_ENABLE_AUDIT_LOGGING` | `false` |
//! | `otel.newrelic.service.name` | `OTEL_NEW_RELIC_SERVICE_NAME` | `(unknown service)` |
//! | `otel.newrelic.trace.uri.override` | `OTEL_NEW_RELIC_TRACE_URI_OVERRIDE` | `otel.newrelic.uri.override` |
//! | `otel.newrelic.metric.uri.override` | `OTEL_NEW_RELIC_METRIC_URI_OVERRIDE` | `` |
//!
//! An environment variable that is set, even to an empty string, wins over
//! the property.
//!
//! URI overrides must be absolute and are used exactly as written; text that
//! would need repairing (spaces, control characters, bad `%` escapes) is
//! rejected.

pub mod builder;
pub mod factory;
pub mod settings;
pub mod uri;

use thiserror::Error;

pub use builder::{NewRelicExporterBuilder, NewRelicSpanExporter, SpanExporterBuilder};
pub use factory::{build_exporter, build_from_settings, NewRelicSpanExporterFactory, SpanExporterFactory};
pub use settings::{NewRelicConfiguration, ResolvedExporterSettings};
pub use uri::{UriError, UriOverride};

#[derive(Debug, Error)]
pub enum ExporterError {
    /// `key` is the setting the value was read from
    #[error("invalid URI in {key} `{value}`: {source}")]
    InvalidUri {
        key: &'static str,
        value: String,
        #[source]
        source: UriError,
    },
}
