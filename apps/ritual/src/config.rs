use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use ritual_core::FlowTimings;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "ritual.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub webhook_url: Option<String>,
    pub assets_dir: PathBuf,
    pub error_flag_ms: u64,
    pub burst_teardown_ms: u64,
    pub engine_warmup_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            assets_dir: PathBuf::from("public"),
            error_flag_ms: 600,
            burst_teardown_ms: 2200,
            engine_warmup_ms: 250,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    webhook_url: Option<String>,
    assets_dir: Option<PathBuf>,
    error_flag_ms: Option<u64>,
    burst_teardown_ms: Option<u64>,
    engine_warmup_ms: Option<u64>,
}

impl Settings {
    pub fn timings(&self) -> FlowTimings {
        FlowTimings {
            error_flag_clear: Duration::from_millis(self.error_flag_ms),
            burst_teardown: Duration::from_millis(self.burst_teardown_ms),
        }
    }

    pub fn engine_warmup(&self) -> Duration {
        Duration::from_millis(self.engine_warmup_ms)
    }

    /// Parsed webhook endpoint; `None` when no URL is configured.
    pub fn webhook_endpoint(&self) -> anyhow::Result<Option<Url>> {
        let Some(raw) = self.webhook_url.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        let url = Url::parse(raw).with_context(|| format!("invalid webhook url '{raw}'"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("webhook url must use http or https, got '{}'", url.scheme());
        }
        Ok(Some(url))
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.webhook_url {
            self.webhook_url = Some(v);
        }
        if let Some(v) = file.assets_dir {
            self.assets_dir = v;
        }
        if let Some(v) = file.error_flag_ms {
            self.error_flag_ms = v;
        }
        if let Some(v) = file.burst_teardown_ms {
            self.burst_teardown_ms = v;
        }
        if let Some(v) = file.engine_warmup_ms {
            self.engine_warmup_ms = v;
        }
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| env::var(key).ok())
}

/// Defaults, then the TOML file at `path` (if present), then variables from `lookup`.
pub fn load_settings_with(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            settings.apply_file(file);
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    if let Some(v) = lookup("RITUAL_WEBHOOK_URL") {
        settings.webhook_url = Some(v);
    }
    if let Some(v) = lookup("APP__WEBHOOK_URL") {
        settings.webhook_url = Some(v);
    }

    if let Some(v) = lookup("APP__ASSETS_DIR") {
        settings.assets_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__ERROR_FLAG_MS").and_then(|v| v.parse().ok()) {
        settings.error_flag_ms = v;
    }
    if let Some(v) = lookup("APP__BURST_TEARDOWN_MS").and_then(|v| v.parse().ok()) {
        settings.burst_teardown_ms = v;
    }
    if let Some(v) = lookup("APP__ENGINE_WARMUP_MS").and_then(|v| v.parse().ok()) {
        settings.engine_warmup_ms = v;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
