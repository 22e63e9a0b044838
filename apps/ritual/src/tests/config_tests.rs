use super::*;

use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("ritual_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(DEFAULT_CONFIG_FILE);
    fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_file_yields_defaults() {
    let path = env::temp_dir().join("ritual_config_test_absent/ritual.toml");
    let settings = load_settings_with(&path, no_env).expect("settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.timings(), FlowTimings::default());
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        r#"
webhook_url = "https://hooks.example.com/oracle"
assets_dir = "media"
error_flag_ms = 750
"#,
    );

    let settings = load_settings_with(&path, no_env).expect("settings");

    assert_eq!(
        settings.webhook_url.as_deref(),
        Some("https://hooks.example.com/oracle")
    );
    assert_eq!(settings.assets_dir, PathBuf::from("media"));
    assert_eq!(settings.error_flag_ms, 750);
    assert_eq!(settings.burst_teardown_ms, 2200);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_overrides_file() {
    let path = temp_config("error_flag_ms = 750\nassets_dir = \"media\"\n");
    let env: HashMap<&str, &str> = HashMap::from([
        ("APP__ERROR_FLAG_MS", "900"),
        ("APP__BURST_TEARDOWN_MS", "not-a-number"),
        ("RITUAL_WEBHOOK_URL", "https://a.example.com/hook"),
        ("APP__WEBHOOK_URL", "https://b.example.com/hook"),
    ]);

    let settings =
        load_settings_with(&path, |key| env.get(key).map(|v| v.to_string())).expect("settings");

    assert_eq!(settings.error_flag_ms, 900);
    assert_eq!(settings.burst_teardown_ms, 2200);
    assert_eq!(settings.assets_dir, PathBuf::from("media"));
    assert_eq!(
        settings.webhook_url.as_deref(),
        Some("https://b.example.com/hook")
    );

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_file_is_reported() {
    let path = temp_config("error_flag_ms = \"soon\"");

    let error = load_settings_with(&path, no_env).expect_err("malformed");
    assert!(error.to_string().contains("failed to parse config file"));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn blank_webhook_means_no_endpoint() {
    let settings = Settings {
        webhook_url: Some("   ".into()),
        ..Settings::default()
    };
    assert_eq!(settings.webhook_endpoint().expect("endpoint"), None);
    assert_eq!(Settings::default().webhook_endpoint().expect("endpoint"), None);
}

#[test]
fn webhook_endpoint_must_be_http() {
    let invalid = Settings {
        webhook_url: Some("not a url".into()),
        ..Settings::default()
    };
    assert!(invalid.webhook_endpoint().is_err());

    let ftp = Settings {
        webhook_url: Some("ftp://files.example.com/hook".into()),
        ..Settings::default()
    };
    assert!(ftp.webhook_endpoint().is_err());

    let ok = Settings {
        webhook_url: Some("https://hooks.example.com/oracle".into()),
        ..Settings::default()
    };
    assert_eq!(
        ok.webhook_endpoint()
            .expect("endpoint")
            .map(|url| url.host_str().map(str::to_string)),
        Some(Some("hooks.example.com".to_string()))
    );
}

#[test]
fn timings_follow_millisecond_settings() {
    let settings = Settings {
        error_flag_ms: 10,
        burst_teardown_ms: 20,
        ..Settings::default()
    };
    let timings = settings.timings();
    assert_eq!(timings.error_flag_clear, Duration::from_millis(10));
    assert_eq!(timings.burst_teardown, Duration::from_millis(20));
}
