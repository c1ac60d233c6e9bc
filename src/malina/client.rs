//! MAP HTTP Client
//!
//! Fetches the status payload of one device:
//!
//! - **Endpoint**: `GET http://<host>/read_json.php?device=map`
//! - **Authentication**: HTTP basic auth, only when both login and password are set
//! - **Timeout**: the target's timeout bounds the whole request/response cycle
//!
//! Failures are logged here with the device host and returned as [`FetchError`].
//! There are no retries; the next scrape simply tries again.

use crate::error::{ExporterError, FetchError};
use crate::malina::types::{DeviceTarget, StatusRecord};
use tracing::{debug, error};

/// Path and query of the status document served by the controller
pub const STATUS_PATH: &str = "/read_json.php?device=map";

/// Build the status URL for a host. A host given with an explicit
/// `http://` or `https://` scheme keeps it.
pub fn status_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}{}", host, STATUS_PATH)
    } else {
        format!("http://{}{}", host, STATUS_PATH)
    }
}

/// Client for the controller's JSON status endpoint
///
/// Holds a single connection pool shared by all targets; per-target settings
/// (timeout, credentials) are applied on each request.
#[derive(Clone)]
pub struct MalinaClient {
    http: reqwest::Client,
}

impl MalinaClient {
    pub fn new() -> Result<Self, ExporterError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("malina-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Fetch and decode the status record of one device
    pub async fn fetch(&self, target: &DeviceTarget) -> Result<StatusRecord, FetchError> {
        let record = self
            .fetch_inner(target)
            .await
            .inspect_err(|e| error!("{}", e))?;

        debug!(
            "Got response from {} Firmware: {}",
            target.host,
            record.firmware().as_deref().unwrap_or("<unknown>")
        );
        Ok(record)
    }

    async fn fetch_inner(&self, target: &DeviceTarget) -> Result<StatusRecord, FetchError> {
        let network = |source| FetchError::Network {
            host: target.host.clone(),
            source,
        };

        let mut request = self
            .http
            .get(status_url(&target.host))
            .timeout(target.timeout);
        if let Some((login, password)) = target.basic_auth() {
            request = request.basic_auth(login, Some(password));
        }

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(network)?;

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::decode(&target.host, format!("HTTP {}: {}", status, e)))
    }
}
