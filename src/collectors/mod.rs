//! MAP Collector
//!
//! Produces the metric stream for one scrape by polling every configured device.
//!
//! # Architecture
//!
//! - [`MapCollector::collect`] walks the targets in configuration order, one at a time
//! - each target is fetched with [`MalinaClient::fetch`] and mapped with [`map_status`]
//! - samples of successful devices are appended to the scrape in target order
//!
//! # Error Handling
//!
//! A device that cannot be reached, returns an unusable payload, or lacks a
//! required field contributes nothing to the scrape. Its failure is logged and the
//! remaining devices are still collected; the scrape itself never fails.

use crate::config::Config;
use crate::error::{ExporterError, Result};
use crate::malina::{DeviceTarget, MalinaClient};
use crate::metrics::MetricSample;
use std::collections::HashSet;
use tracing::{debug, error, info};

pub mod fields;
pub mod mapper;

pub use fields::{FieldSpec, FIELDS};
pub use mapper::{device_labels, map_status};

/// Outcome of collecting one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// The device's samples were added to the scrape
    Success,
    /// The device was skipped for this scrape (already logged)
    Failed,
}

/// Sole producer of samples for the exposition endpoint
///
/// Holds only the immutable target list and a client; every call to
/// [`collect`](Self::collect) starts from scratch.
pub struct MapCollector {
    client: MalinaClient,
    targets: Vec<DeviceTarget>,
}

impl MapCollector {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_targets(MalinaClient::new()?, config.device_targets()?)
    }

    /// Build a collector over an explicit target list.
    ///
    /// Target names must be unique: two targets with the same name would emit the
    /// same series twice in one scrape.
    pub fn with_targets(client: MalinaClient, targets: Vec<DeviceTarget>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(targets.len());
        if let Some(dup) = targets.iter().find(|t| !seen.insert(t.name.as_str())) {
            return Err(ExporterError::Config(format!(
                "duplicate target name '{}'",
                dup.name
            )));
        }
        Ok(Self { client, targets })
    }

    pub fn targets(&self) -> &[DeviceTarget] {
        &self.targets
    }

    /// Collect one scrape across all targets
    pub async fn collect(&self) -> Vec<MetricSample> {
        let mut samples = Vec::new();
        let mut succeeded = 0;

        for target in &self.targets {
            if self.collect_target(target, &mut samples).await == CollectionStatus::Success {
                succeeded += 1;
            }
        }

        info!(
            "Collected {} samples from {}/{} devices",
            samples.len(),
            succeeded,
            self.targets.len()
        );
        samples
    }

    /// Fetch and map one target, appending its samples on success
    pub async fn collect_target(
        &self,
        target: &DeviceTarget,
        samples: &mut Vec<MetricSample>,
    ) -> CollectionStatus {
        let record = match self.client.fetch(target).await {
            Ok(record) => record,
            Err(e) => {
                // The client has already logged the failure with the host
                debug!("Skipping {} for this scrape: {}", target.name, e);
                return CollectionStatus::Failed;
            }
        };

        match map_status(target, &record) {
            Ok(device_samples) => {
                let before = samples.len();
                samples.extend(device_samples);
                debug!(
                    "Mapped {} samples for {} ({})",
                    samples.len() - before,
                    target.name,
                    target.host
                );
                CollectionStatus::Success
            }
            Err(e) => {
                error!("{}", e);
                CollectionStatus::Failed
            }
        }
    }
}
