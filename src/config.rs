use crate::error::{ExporterError, Result};
use crate::malina::DeviceTarget;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;

/// Exporter configuration, loaded once at startup and shared read-only.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Default per-device timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// One `targets[]` entry as written in the configuration file.
///
/// `name` and `host` are optional here so that a missing value is reported by
/// [`Config::validate`] with the offending entry instead of a generic serde error.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TargetConfig {
    pub name: Option<String>,
    pub host: Option<String>,
    pub login: Option<String>,
    pub password: Option<SecretString>,
    pub timeout: Option<f64>,
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    26001
}

fn default_timeout() -> f64 {
    1.0
}

impl Config {
    /// Load the JSON configuration at `path`, whatever its extension, then apply
    /// `MALINA_EXPORTER__*` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config: Config = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Json))
            .add_source(config::Environment::with_prefix("MALINA_EXPORTER").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document without touching the filesystem or environment.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.device_targets().map(|targets| {
            if targets.is_empty() {
                warn!("No targets configured, scrapes will be empty");
            }
        })
    }

    /// Resolve every configured target into a [`DeviceTarget`], in file order.
    pub fn device_targets(&self) -> Result<Vec<DeviceTarget>> {
        let default_timeout = parse_timeout(self.timeout, "timeout")?;
        let mut seen = HashSet::with_capacity(self.targets.len());
        let mut targets = Vec::with_capacity(self.targets.len());

        for (index, target) in self.targets.iter().enumerate() {
            let name = required(target.name.as_deref(), index, "name")?;
            let host = required(target.host.as_deref(), index, "host")?;

            if !seen.insert(name) {
                return Err(ExporterError::Config(format!(
                    "targets[{index}]: duplicate target name '{name}'"
                )));
            }

            let timeout = match target.timeout {
                Some(secs) => parse_timeout(secs, &format!("targets[{index}].timeout"))?,
                None => default_timeout,
            };

            targets.push(DeviceTarget {
                name: name.to_string(),
                host: host.to_string(),
                login: target.login.clone(),
                password: target.password.clone(),
                timeout,
            });
        }

        Ok(targets)
    }
}

fn required<'a>(value: Option<&'a str>, index: usize, key: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ExporterError::Config(format!(
            "targets[{index}]: 'name' and 'host' are required (missing '{key}')"
        ))),
    }
}

fn parse_timeout(secs: f64, key: &str) -> Result<Duration> {
    if secs <= 0.0 {
        return Err(ExporterError::Config(format!(
            "{key} must be a positive number of seconds, got {secs}"
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ExporterError::Config(format!("{key} is not a valid duration: {e}")))
}
