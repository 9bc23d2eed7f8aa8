//! Exporter Configuration Check
//!
//! Resolves the New Relic exporter settings the agent would use, logs a
//! redacted summary and prints the effective trace endpoint. Exits with an
//! error when the configuration would fail at agent startup.
//!
//! Usage: `redis-telemetry [settings-file] [--print-config]`

use redis_telemetry::config::{LayeredConfig, Properties};
use redis_telemetry::exporter::settings::{self as keys, setting_origin};
use redis_telemetry::exporter::{
    build_from_settings, NewRelicConfiguration, NewRelicExporterBuilder,
};
use redis_telemetry::observability::{self, LogConfig};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_tracing(&LogConfig::from_env()).map_err(|e| e.to_string())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let print_config = args.iter().any(|a| a == "--print-config");
    let settings_path = args.iter().find(|a| !a.starts_with("--"));

    let properties = match settings_path {
        Some(path) => Properties::load(path)?,
        None => Properties::new(),
    };

    let layered = LayeredConfig::from_env(&properties);
    for (env_key, prop_key) in [
        (keys::API_KEY_ENV, keys::API_KEY_PROP),
        (keys::ENABLE_AUDIT_LOGGING_ENV, keys::ENABLE_AUDIT_LOGGING_PROP),
        (keys::SERVICE_NAME_ENV, keys::SERVICE_NAME_PROP),
        (keys::TRACE_URI_OVERRIDE_ENV, keys::TRACE_URI_OVERRIDE_PROP),
        (keys::URI_OVERRIDE_ENV, keys::URI_OVERRIDE_PROP),
        (keys::METRIC_URI_OVERRIDE_ENV, keys::METRIC_URI_OVERRIDE_PROP),
    ] {
        let origin = setting_origin(&layered, env_key, prop_key);
        info!(setting = prop_key, %origin, "Setting source");
    }

    let configuration = NewRelicConfiguration::from_properties(&properties);
    let settings = configuration.resolve();
    info!(settings = ?settings, "Resolved exporter settings");

    let exporter = build_from_settings(&settings, NewRelicExporterBuilder::new())?;

    if print_config {
        print!("{}", toml::to_string(&settings)?);
    }
    println!("trace endpoint: {}", exporter.endpoint());
    if configuration.is_metric_uri_specified() {
        println!("metric endpoint: {}", configuration.metric_uri());
    }

    Ok(())
}
