//! Layered Configuration
//!
//! Settings are looked up in two layers: the process environment first, then
//! a static properties source. A present environment variable always wins.
//!
//! ```rust,ignore
//! use redis_telemetry::config::{LayeredConfig, Properties};
//!
//! let props = Properties::load("agent.properties")?;
//! let config = LayeredConfig::from_env(props);
//! let name = config.get_or("OTEL_NEW_RELIC_SERVICE_NAME", "otel.newrelic.service.name", "(unknown service)");
//! ```

mod properties;
mod source;

use std::path::PathBuf;

use thiserror::Error;

pub use properties::Properties;
pub use source::{ConfigSource, EnvSource, LayeredConfig, MapSource, Origin};

/// Errors raised while loading settings files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed escape `{escape}` on line {line}")]
    MalformedEscape { line: usize, escape: String },

    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
}
