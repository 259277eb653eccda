use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::Context;
use client_core::ControllerConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "krishi.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub latency_ms: u64,
    pub event_capacity: usize,
    pub log_filter: String,
    pub start_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            event_capacity: 256,
            log_filter: "info".into(),
            start_path: "/".into(),
        }
    }
}

impl Settings {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig::default()
            .with_latency(Duration::from_millis(self.latency_ms))
            .with_event_capacity(self.event_capacity)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    latency_ms: Option<u64>,
    event_capacity: Option<usize>,
    log_filter: Option<String>,
    start_path: Option<String>,
}

/// Defaults, then the config file, then environment overrides. A missing
/// `krishi.toml` is fine; a missing file passed explicitly is not.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.latency_ms {
        settings.latency_ms = v;
    }
    if let Some(v) = file_cfg.event_capacity {
        settings.event_capacity = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.start_path {
        settings.start_path = v;
    }
    Ok(())
}

/// `APP__*` wins over `KRISHI_*` when both are set. Unparsable numbers are ignored.
fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |short: &str, long: &str| lookup(long).or_else(|| lookup(short));

    if let Some(v) = var("KRISHI_LATENCY_MS", "APP__LATENCY_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.latency_ms = parsed;
        }
    }
    if let Some(v) = var("KRISHI_EVENT_CAPACITY", "APP__EVENT_CAPACITY") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.event_capacity = parsed;
        }
    }
    if let Some(v) = var("KRISHI_LOG", "APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = var("KRISHI_START_PATH", "APP__START_PATH") {
        settings.start_path = v;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            "latency_ms = 50\nlog_filter = \"client_core=debug\"\n",
        )
        .expect("valid toml");
        assert_eq!(settings.latency_ms, 50);
        assert_eq!(settings.log_filter, "client_core=debug");
        assert_eq!(settings.start_path, "/");
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let mut settings = Settings::default();
        assert!(apply_file(&mut settings, "latency = 5").is_err());
    }

    #[test]
    fn app_prefixed_env_wins() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("KRISHI_LATENCY_MS", "10"),
            ("APP__LATENCY_MS", "20"),
            ("KRISHI_EVENT_CAPACITY", "lots"),
            ("KRISHI_START_PATH", "/login"),
        ]);
        let mut settings = Settings::default();
        apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.latency_ms, 20);
        assert_eq!(settings.event_capacity, 256);
        assert_eq!(settings.start_path, "/login");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(load_settings(Some(Path::new("./does-not-exist/krishi.toml"))).is_err());
    }

    #[test]
    fn controller_config_carries_latency() {
        let settings = Settings {
            latency_ms: 5,
            ..Settings::default()
        };
        assert_eq!(
            settings.controller_config().simulated_latency,
            Duration::from_millis(5)
        );
    }
}
