use std::collections::HashMap;

use relay::config::{Config, ConfigError};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.downstream.url, "http://127.0.0.1:9000");
    assert!(cfg.downstream.name.is_none());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        r#"
server:
  listen_addr: "0.0.0.0:3000"
downstream:
  url: "http://worker.internal:8000"
  name: "python-worker"
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.downstream.url, "http://worker.internal:8000");
    assert_eq!(cfg.downstream.name.as_deref(), Some("python-worker"));
}

#[test]
fn test_config_partial_yaml_uses_defaults() {
    let cfg = Config::from_yaml("downstream:\n  url: \"http://10.0.0.2:7000\"\n").unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.downstream.url, "http://10.0.0.2:7000");
}

#[test]
fn test_config_empty_yaml_is_default() {
    let cfg = Config::from_yaml("").unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_rejects_unknown_fields() {
    let result = Config::from_yaml("server:\n  listen: \"0.0.0.0:1\"\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_env_overrides() {
    let mut cfg = Config::default();
    cfg.apply_overrides(lookup(&[
        ("LISTEN", "0.0.0.0:5000"),
        ("DOWNSTREAM_URL", "http://backend:81"),
    ]));

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.downstream.url, "http://backend:81");
}

#[test]
fn test_config_env_overrides_absent_leave_values() {
    let mut cfg = Config::default();
    cfg.apply_overrides(lookup(&[]));
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}

#[test]
fn test_config_rejects_empty_listen_addr() {
    let mut cfg = Config::default();
    cfg.server.listen_addr = "  ".to_string();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_rejects_https_downstream() {
    let mut cfg = Config::default();
    cfg.downstream.url = "https://secure.example".to_string();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_rejects_downstream_path() {
    let mut cfg = Config::default();
    cfg.downstream.url = "http://example.com/prefix".to_string();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

    cfg.downstream.url = "http://example.com/?q=1".to_string();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_rejects_unparseable_downstream() {
    let mut cfg = Config::default();
    cfg.downstream.url = "not a url".to_string();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_load_missing_file() {
    let result = Config::load(Some(std::path::Path::new("/nonexistent/relay.yaml")));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_binding_authority() {
    let mut cfg = Config::default();
    cfg.downstream.url = "http://worker.local".to_string();
    let binding = cfg.binding().unwrap();
    assert_eq!(binding.authority(), "worker.local:80");
    assert_eq!(binding.display_name(), "http://worker.local/");

    cfg.downstream.url = "http://127.0.0.1:9100/".to_string();
    cfg.downstream.name = Some("worker".to_string());
    let binding = cfg.binding().unwrap();
    assert_eq!(binding.authority(), "127.0.0.1:9100");
    assert_eq!(binding.display_name(), "worker");
}
