//! MAP Device Types
//!
//! - [`DeviceTarget`] - one configured device, built from [`crate::config::Config`]
//! - [`StatusRecord`] - the flat JSON object returned by `read_json.php?device=map`
//!
//! The status payload has ~40 fields prefixed with `_` plus `fw`. No schema is
//! enforced at decode time; field presence and types are checked by the mapper.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// Firmware identifier field of the status payload
pub const FIRMWARE_FIELD: &str = "fw";

/// A remote MAP device polled on every scrape.
#[derive(Debug, Clone)]
pub struct DeviceTarget {
    /// Unique name, exported as the `name` label
    pub name: String,
    /// `hostname[:port]`, exported as the `hostname` label
    pub host: String,
    pub login: Option<String>,
    pub password: Option<SecretString>,
    /// Bound on the whole request/response cycle
    pub timeout: Duration,
}

impl DeviceTarget {
    pub fn new(name: impl Into<String>, host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            login: None,
            password: None,
            timeout,
        }
    }

    pub fn with_credentials(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self.password = Some(SecretString::new(password.into().into_boxed_str()));
        self
    }

    /// Basic auth credentials, only when both login and password are non-empty.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        let login = self.login.as_deref().filter(|l| !l.is_empty())?;
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .filter(|p| !p.is_empty())?;
        Some((login, password))
    }
}

/// Why a field could not be read as a number
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Missing,
    NotNumeric(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Missing => write!(f, "field is missing"),
            FieldError::NotNumeric(raw) => write!(f, "value {raw} is not numeric"),
        }
    }
}

/// Decoded status payload of one device for one scrape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StatusRecord(Map<String, Value>);

impl StatusRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Firmware identifier; numeric firmware values are stringified.
    pub fn firmware(&self) -> Option<String> {
        match self.0.get(FIRMWARE_FIELD)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Read a field as a float. Numeric strings are accepted, the device firmware
    /// emits some registers quoted.
    pub fn numeric(&self, field: &str) -> Result<f64, FieldError> {
        match self.0.get(field) {
            None => Err(FieldError::Missing),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| FieldError::NotNumeric(n.to_string())),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FieldError::NotNumeric(format!("{s:?}"))),
            Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
            Some(other) => Err(FieldError::NotNumeric(other.to_string())),
        }
    }
}
