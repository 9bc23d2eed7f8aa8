//! Span Exporter Factories
//!
//! A factory turns the agent's properties into a ready exporter. The New
//! Relic factory layers the process environment over those properties.

use opentelemetry::KeyValue;
use tracing::info;

use super::builder::{NewRelicExporterBuilder, NewRelicSpanExporter, SpanExporterBuilder, SERVICE_NAME};
use super::settings::{NewRelicConfiguration, ResolvedExporterSettings};
use super::ExporterError;
use crate::config::{ConfigSource, EnvSource, LayeredConfig, Properties};
use crate::observability::spans;

/// Builds a span exporter from agent properties
pub trait SpanExporterFactory {
    type Exporter;

    fn from_config(&self, config: &Properties) -> Result<Self::Exporter, ExporterError>;
}

/// Factory for [`NewRelicSpanExporter`]
///
/// `E` is the environment layer; the live process environment by default.
#[derive(Debug, Clone, Default)]
pub struct NewRelicSpanExporterFactory<E = EnvSource> {
    env: E,
}

impl NewRelicSpanExporterFactory<EnvSource> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: ConfigSource> NewRelicSpanExporterFactory<E> {
    /// Use `env` instead of the process environment
    pub fn with_env(env: E) -> Self {
        NewRelicSpanExporterFactory { env }
    }
}

impl<E: ConfigSource> SpanExporterFactory for NewRelicSpanExporterFactory<E> {
    type Exporter = NewRelicSpanExporter;

    fn from_config(&self, config: &Properties) -> Result<NewRelicSpanExporter, ExporterError> {
        let configuration = NewRelicConfiguration::new(LayeredConfig::new(&self.env, config));
        build_exporter(&configuration, NewRelicExporterBuilder::new())
    }
}

/// Resolve every setting and configure `builder` with them
///
/// Fails only when the trace URI override is set but unparsable.
pub fn build_exporter<E, P, B>(
    configuration: &NewRelicConfiguration<E, P>,
    builder: B,
) -> Result<B::Exporter, ExporterError>
where
    E: ConfigSource,
    P: ConfigSource,
    B: SpanExporterBuilder,
{
    let settings = configuration.resolve();
    build_from_settings(&settings, builder)
}

/// Configure `builder` from an already resolved snapshot
pub fn build_from_settings<B: SpanExporterBuilder>(
    settings: &ResolvedExporterSettings,
    builder: B,
) -> Result<B::Exporter, ExporterError> {
    let _span = spans::exporter_setup_span("newrelic").entered();

    let mut builder = builder
        .common_attributes(vec![KeyValue::new(
            SERVICE_NAME,
            settings.service_name.clone(),
        )])
        .api_key(settings.api_key.clone());

    if settings.audit_logging_enabled {
        builder = builder.enable_audit_logging();
    }

    if let Some(uri) = settings.trace_uri()? {
        info!(uri = %uri, key = settings.trace_uri_key, "Using trace URI override");
        builder = builder.uri_override(uri);
    }

    if !settings.has_api_key() {
        tracing::warn!("No New Relic API key configured; the backend will reject spans");
    }

    info!(
        service = %settings.service_name,
        audit_logging = settings.audit_logging_enabled,
        "New Relic span exporter configured"
    );
    Ok(builder.build())
}
