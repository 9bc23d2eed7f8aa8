//! Exporter Builder Seam
//!
//! The factory only decides *what* to configure; the builder it is handed
//! decides what kind of exporter comes out. [`NewRelicExporterBuilder`] is the
//! default and produces a [`NewRelicSpanExporter`] description.

use std::fmt;

use opentelemetry::KeyValue;

use super::uri::UriOverride;

/// Default New Relic trace ingest endpoint (US region)
pub const DEFAULT_TRACE_ENDPOINT: &str = "https://trace-api.newrelic.com/trace/v1";

/// Common attribute key carrying the service name
pub const SERVICE_NAME: &str = "service.name";

pub trait SpanExporterBuilder: Sized {
    type Exporter;

    /// Attributes attached to every span batch
    fn common_attributes(self, attributes: Vec<KeyValue>) -> Self;

    fn api_key(self, api_key: String) -> Self;

    /// Log every payload sent to the backend
    fn enable_audit_logging(self) -> Self;

    /// Send to `uri` instead of the default endpoint
    fn uri_override(self, uri: UriOverride) -> Self;

    fn build(self) -> Self::Exporter;
}

#[derive(Default)]
pub struct NewRelicExporterBuilder {
    common_attributes: Vec<KeyValue>,
    api_key: String,
    audit_logging: bool,
    uri_override: Option<UriOverride>,
}

impl NewRelicExporterBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpanExporterBuilder for NewRelicExporterBuilder {
    type Exporter = NewRelicSpanExporter;

    fn common_attributes(mut self, attributes: Vec<KeyValue>) -> Self {
        self.common_attributes = attributes;
        self
    }

    fn api_key(mut self, api_key: String) -> Self {
        self.api_key = api_key;
        self
    }

    fn enable_audit_logging(mut self) -> Self {
        self.audit_logging = true;
        self
    }

    fn uri_override(mut self, uri: UriOverride) -> Self {
        self.uri_override = Some(uri);
        self
    }

    fn build(self) -> NewRelicSpanExporter {
        NewRelicSpanExporter {
            common_attributes: self.common_attributes,
            api_key: self.api_key,
            audit_logging: self.audit_logging,
            uri_override: self.uri_override,
        }
    }
}

/// A configured New Relic span exporter
///
/// Immutable once built. Span transport is provided elsewhere; this type
/// carries what that transport needs.
#[derive(Clone, PartialEq)]
pub struct NewRelicSpanExporter {
    common_attributes: Vec<KeyValue>,
    api_key: String,
    audit_logging: bool,
    uri_override: Option<UriOverride>,
}

impl NewRelicSpanExporter {
    pub fn common_attributes(&self) -> &[KeyValue] {
        &self.common_attributes
    }

    pub fn service_name(&self) -> Option<String> {
        self.common_attributes
            .iter()
            .find(|kv| kv.key.as_str() == SERVICE_NAME)
            .map(|kv| kv.value.as_str().into_owned())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn audit_logging_enabled(&self) -> bool {
        self.audit_logging
    }

    pub fn uri_override(&self) -> Option<&UriOverride> {
        self.uri_override.as_ref()
    }

    /// Override text as configured if set, otherwise [`DEFAULT_TRACE_ENDPOINT`]
    pub fn endpoint(&self) -> &str {
        self.uri_override
            .as_ref()
            .map(UriOverride::as_str)
            .unwrap_or(DEFAULT_TRACE_ENDPOINT)
    }
}

impl fmt::Debug for NewRelicSpanExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewRelicSpanExporter")
            .field("common_attributes", &self.common_attributes)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("audit_logging", &self.audit_logging)
            .field("endpoint", &self.endpoint())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let exporter = NewRelicExporterBuilder::new().build();
        assert_eq!(exporter.endpoint(), DEFAULT_TRACE_ENDPOINT);
        assert!(exporter.uri_override().is_none());
        assert!(!exporter.audit_logging_enabled());
        assert_eq!(exporter.service_name(), None);
    }

    #[test]
    fn test_builder_applies_settings() {
        let uri = UriOverride::parse("https://trace-api.eu.newrelic.com/trace/v1").unwrap();
        let exporter = NewRelicExporterBuilder::new()
            .common_attributes(vec![KeyValue::new(SERVICE_NAME, "checkout")])
            .api_key("NRAK-123".to_string())
            .enable_audit_logging()
            .uri_override(uri.clone())
            .build();

        assert_eq!(exporter.service_name().as_deref(), Some("checkout"));
        assert_eq!(exporter.api_key(), "NRAK-123");
        assert!(exporter.audit_logging_enabled());
        assert_eq!(exporter.uri_override(), Some(&uri));
        assert_eq!(exporter.endpoint(), uri.as_str());
    }

    #[test]
    fn test_endpoint_is_override_text_unnormalized() {
        let uri = UriOverride::parse("HTTPS://Collector.Example.com:443").unwrap();
        let exporter = NewRelicExporterBuilder::new().uri_override(uri).build();
        assert_eq!(exporter.endpoint(), "HTTPS://Collector.Example.com:443");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let exporter = NewRelicExporterBuilder::new()
            .api_key("NRAK-SECRET".to_string())
            .build();
        assert!(!format!("{exporter:?}").contains("NRAK-SECRET"));
    }
}
