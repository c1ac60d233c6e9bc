use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;

/// Failure to obtain usable data from a single device.
///
/// Both variants are contained by the collector: the device contributes no
/// samples to the current scrape and the other devices are unaffected.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Connect to MAP error: {host}: {source}")]
    Network {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Decode error (possibly no MAP connected): {host}: {reason}")]
    Decode { host: String, reason: String },
}

impl FetchError {
    pub fn decode(host: &str, reason: impl Into<String>) -> Self {
        FetchError::Decode {
            host: host.to_string(),
            reason: reason.into(),
        }
    }

    /// Host of the device that failed
    pub fn host(&self) -> &str {
        match self {
            FetchError::Network { host, .. } | FetchError::Decode { host, .. } => host,
        }
    }
}
