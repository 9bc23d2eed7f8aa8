//! New Relic Exporter Settings
//!
//! Every setting is read from an environment variable first and from a
//! property second. Lookups are not cached.

use std::fmt;

use serde::Serialize;

use super::uri::UriOverride;
use super::ExporterError;
use crate::config::{ConfigSource, EnvSource, LayeredConfig, Origin};

pub const DEFAULT_SERVICE_NAME: &str = "(unknown service)";

// Properties
pub const API_KEY_PROP: &str = "otel.newrelic.api.key";
pub const ENABLE_AUDIT_LOGGING_PROP: &str = "otel.newrelic.enable.audit.logging";
pub const SERVICE_NAME_PROP: &str = "otel.newrelic.service.name";
pub const TRACE_URI_OVERRIDE_PROP: &str = "otel.newrelic.trace.uri.override";
pub const METRIC_URI_OVERRIDE_PROP: &str = "otel.newrelic.metric.uri.override";
/// Deprecated: predates separate span and metric endpoints. Only used as a
/// fallback for the trace URI.
pub const URI_OVERRIDE_PROP: &str = "otel.newrelic.uri.override";

// Environment variables
pub const API_KEY_ENV: &str = "OTEL_NEW_RELIC_API_KEY";
pub const ENABLE_AUDIT_LOGGING_ENV: &str = "OTEL_NEW_RELIC_ENABLE_AUDIT_LOGGING";
pub const SERVICE_NAME_ENV: &str = "OTEL_NEW_RELIC_SERVICE_NAME";
pub const TRACE_URI_OVERRIDE_ENV: &str = "OTEL_NEW_RELIC_TRACE_URI_OVERRIDE";
pub const METRIC_URI_OVERRIDE_ENV: &str = "OTEL_NEW_RELIC_METRIC_URI_OVERRIDE";
/// Deprecated, see [`URI_OVERRIDE_PROP`]
pub const URI_OVERRIDE_ENV: &str = "OTEL_NEW_RELIC_URI_OVERRIDE";

/// Reads New Relic exporter settings from a layered source
#[derive(Debug, Clone)]
pub struct NewRelicConfiguration<E, P> {
    config: LayeredConfig<E, P>,
}

impl<P: ConfigSource> NewRelicConfiguration<EnvSource, P> {
    /// Settings from the live process environment over `properties`
    pub fn from_properties(properties: P) -> Self {
        NewRelicConfiguration::new(LayeredConfig::from_env(properties))
    }
}

impl<E: ConfigSource, P: ConfigSource> NewRelicConfiguration<E, P> {
    pub fn new(config: LayeredConfig<E, P>) -> Self {
        NewRelicConfiguration { config }
    }

    pub fn api_key(&self) -> String {
        self.config.get_or(API_KEY_ENV, API_KEY_PROP, "")
    }

    pub fn should_enable_audit_logging(&self) -> bool {
        parse_bool(&self.config.get_or(
            ENABLE_AUDIT_LOGGING_ENV,
            ENABLE_AUDIT_LOGGING_PROP,
            "false",
        ))
    }

    pub fn service_name(&self) -> String {
        service_name(&self.config)
    }

    pub fn metric_uri(&self) -> String {
        self.config
            .get_or(METRIC_URI_OVERRIDE_ENV, METRIC_URI_OVERRIDE_PROP, "")
    }

    pub fn is_metric_uri_specified(&self) -> bool {
        is_specified(&self.metric_uri())
    }

    /// Trace endpoint override
    ///
    /// Precedence: trace env, trace property, deprecated env, deprecated
    /// property, then empty.
    pub fn trace_uri(&self) -> String {
        self.trace_uri_setting()
            .map(|(value, _)| value)
            .unwrap_or_default()
    }

    /// Trace URI override together with the key that supplied it
    fn trace_uri_setting(&self) -> Option<(String, &'static str)> {
        let found = lookup_keyed(&self.config, TRACE_URI_OVERRIDE_ENV, TRACE_URI_OVERRIDE_PROP)
            .or_else(|| lookup_keyed(&self.config, URI_OVERRIDE_ENV, URI_OVERRIDE_PROP));
        if let Some((_, key)) = &found {
            tracing::debug!(key = *key, "resolved trace URI override");
        }
        found
    }

    pub fn is_trace_uri_specified(&self) -> bool {
        is_specified(&self.trace_uri())
    }

    /// Snapshot all settings
    ///
    /// Warns once here when the trace URI came from a deprecated key.
    pub fn resolve(&self) -> ResolvedExporterSettings {
        let (trace_uri, trace_uri_key) = self
            .trace_uri_setting()
            .unwrap_or((String::new(), TRACE_URI_OVERRIDE_PROP));
        if is_specified(&trace_uri) && is_deprecated(trace_uri_key) {
            tracing::warn!(
                key = trace_uri_key,
                "{} / {} is deprecated, use {} / {} instead",
                URI_OVERRIDE_ENV,
                URI_OVERRIDE_PROP,
                TRACE_URI_OVERRIDE_ENV,
                TRACE_URI_OVERRIDE_PROP
            );
        }
        let (metric_uri, metric_uri_key) =
            lookup_keyed(&self.config, METRIC_URI_OVERRIDE_ENV, METRIC_URI_OVERRIDE_PROP)
                .unwrap_or((String::new(), METRIC_URI_OVERRIDE_PROP));
        ResolvedExporterSettings {
            api_key: self.api_key(),
            audit_logging_enabled: self.should_enable_audit_logging(),
            service_name: self.service_name(),
            trace_uri_override: is_specified(&trace_uri).then_some(trace_uri),
            trace_uri_key,
            metric_uri_override: is_specified(&metric_uri).then_some(metric_uri),
            metric_uri_key,
        }
    }
}

/// Layered lookup that reports the winning key instead of its layer
fn lookup_keyed<E: ConfigSource, P: ConfigSource>(
    config: &LayeredConfig<E, P>,
    env_key: &'static str,
    prop_key: &'static str,
) -> Option<(String, &'static str)> {
    config.lookup(env_key, prop_key).map(|(value, origin)| match origin {
        Origin::Env => (value, env_key),
        _ => (value, prop_key),
    })
}

fn is_deprecated(key: &str) -> bool {
    key == URI_OVERRIDE_ENV || key == URI_OVERRIDE_PROP
}

/// Service name from an explicit source, without building a configuration
pub fn service_name<E: ConfigSource, P: ConfigSource>(config: &LayeredConfig<E, P>) -> String {
    config.get_or(SERVICE_NAME_ENV, SERVICE_NAME_PROP, DEFAULT_SERVICE_NAME)
}

/// Whitespace is not trimmed: `"  "` counts as specified
fn is_specified(value: &str) -> bool {
    !value.is_empty()
}

/// Only a case-insensitive `true` is true
fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Settings snapshot taken once at startup
///
/// URI overrides hold the raw, non-empty text; they are parsed when the
/// exporter is built. Each `*_key` names the setting the override was read
/// from (the primary property when unset).
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedExporterSettings {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub audit_logging_enabled: bool,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_uri_override: Option<String>,
    #[serde(skip)]
    pub trace_uri_key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_uri_override: Option<String>,
    #[serde(skip)]
    pub metric_uri_key: &'static str,
}

impl ResolvedExporterSettings {
    /// Parsed trace URI override, `None` when not specified
    pub fn trace_uri(&self) -> Result<Option<UriOverride>, ExporterError> {
        parse_override(self.trace_uri_key, self.trace_uri_override.as_deref())
    }

    /// Parsed metric URI override, `None` when not specified
    pub fn metric_uri(&self) -> Result<Option<UriOverride>, ExporterError> {
        parse_override(self.metric_uri_key, self.metric_uri_override.as_deref())
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn parse_override(
    key: &'static str,
    raw: Option<&str>,
) -> Result<Option<UriOverride>, ExporterError> {
    raw.map(|value| {
        UriOverride::parse(value).map_err(|source| ExporterError::InvalidUri {
            key,
            value: value.to_string(),
            source,
        })
    })
    .transpose()
}

impl fmt::Debug for ResolvedExporterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedExporterSettings")
            .field("api_key", &if self.has_api_key() { "***" } else { "" })
            .field("audit_logging_enabled", &self.audit_logging_enabled)
            .field("service_name", &self.service_name)
            .field("trace_uri_override", &self.trace_uri_override)
            .field("trace_uri_key", &self.trace_uri_key)
            .field("metric_uri_override", &self.metric_uri_override)
            .field("metric_uri_key", &self.metric_uri_key)
            .finish()
    }
}

/// Which layer supplied a setting; exposed for diagnostics
pub fn setting_origin<E: ConfigSource, P: ConfigSource>(
    config: &LayeredConfig<E, P>,
    env_key: &str,
    prop_key: &str,
) -> Origin {
    config
        .lookup(env_key, prop_key)
        .map(|(_, origin)| origin)
        .unwrap_or(Origin::Default)
}
