use mdb_tui::TuiConfig;
use std::time::Duration;

#[test]
fn test_default_tui_config() {
    let config = TuiConfig::default();

    assert_eq!(config.rpc_url, "http://127.0.0.1:4111");
    assert_eq!(config.config.rpc_timeout(), Duration::from_secs(3600));
}

#[test]
fn test_custom_tui_config() {
    let config = TuiConfig {
        rpc_url: "http://localhost:9545".to_string(),
        ..TuiConfig::default()
    };

    assert_eq!(config.rpc_url, "http://localhost:9545");
}

#[test]
fn test_tui_config_clone() {
    let config = TuiConfig::default();

    let cloned = config.clone();

    assert_eq!(config.rpc_url, cloned.rpc_url);
    assert_eq!(config.config.colors.heading, cloned.config.colors.heading);
}
