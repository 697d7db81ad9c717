//! Configuration loading tests

use minance::config::{Config, LogFormat};
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_example_config_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(include_str!("../../config.toml.example").as_bytes())
        .unwrap();

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.server.bind, "0.0.0.0:8000");
    assert_eq!(config.exchange.quote_asset, "USDT");
    assert_eq!(config.trading.min_sellable_value, dec!(5));
    assert_eq!(config.trading.filter_cache_ttl_secs, 60);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    tokio_test::assert_err!(Config::load(dir.path().join("absent.toml")));
}

#[test]
fn test_json_logging_with_metrics() {
    let config: Config = toml::from_str(
        r#"
        [telemetry]
        log_level = "debug"
        log_format = "json"
        metrics_port = 9100
        "#,
    )
    .unwrap();

    assert_eq!(config.telemetry.log_format, LogFormat::Json);
    assert_eq!(config.telemetry.metrics_port, Some(9100));
    assert_eq!(config.server.bind, "0.0.0.0:8000");
}
