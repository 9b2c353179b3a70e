use lexbase::config::{self, AppConfig};
use std::time::Duration;

#[test]
fn defaults_cover_a_missing_or_empty_file() {
    let cfg: AppConfig = toml::from_str("").expect("empty config parses");
    assert_eq!(cfg.api.base_url, "http://127.0.0.1:8000");
    assert_eq!(cfg.polling.interval(), Duration::from_secs(5));
    assert_eq!(cfg.export.capture_scale, 2);
}

#[test]
fn partial_files_fill_the_rest_with_defaults() {
    let cfg: AppConfig = toml::from_str(
        "[api]\nbase_url = \"https://compare.example.org\"\n",
    )
    .expect("partial config parses");
    assert_eq!(cfg.api.base_url, "https://compare.example.org");
    assert_eq!(cfg.api.request_timeout(), Duration::from_secs(120));
    assert_eq!(cfg.polling.interval(), Duration::from_secs(5));
}

#[test]
fn saved_config_loads_back_unchanged() {
    let workspace = tempfile::tempdir().expect("temp workspace");
    std::env::set_var("LEXBASE_HOME", workspace.path());

    let mut cfg = AppConfig::default();
    cfg.api.base_url = "http://10.0.0.5:9000".to_string();
    cfg.polling.interval_secs = 12;
    config::save(&cfg).expect("save config");

    let loaded = config::load_or_default().expect("load config");
    assert_eq!(loaded.api.base_url, "http://10.0.0.5:9000");
    assert_eq!(loaded.polling.interval(), Duration::from_secs(12));

    std::env::remove_var("LEXBASE_HOME");
}
