//! Live Environment Test
//!
//! The only test in this binary, so mutating the process environment cannot
//! race with other tests.

use std::env;

use redis_telemetry::config::Properties;
use redis_telemetry::exporter::settings::{SERVICE_NAME_ENV, SERVICE_NAME_PROP};
use redis_telemetry::exporter::NewRelicConfiguration;

#[test]
fn test_env_changes_are_visible_between_lookups() {
    env::remove_var(SERVICE_NAME_ENV);
    let configuration = NewRelicConfiguration::from_properties(
        Properties::new().with(SERVICE_NAME_PROP, "from-properties"),
    );
    assert_eq!(configuration.service_name(), "from-properties");

    env::set_var(SERVICE_NAME_ENV, "from-env");
    assert_eq!(configuration.service_name(), "from-env");

    env::set_var(SERVICE_NAME_ENV, "");
    assert_eq!(configuration.service_name(), "");

    env::remove_var(SERVICE_NAME_ENV);
    assert_eq!(configuration.service_name(), "from-properties");
}
