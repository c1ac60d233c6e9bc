//! Status Record to Metric Samples
//!
//! Turns one decoded [`StatusRecord`] into the sample stream for its device.
//!
//! # Metrics Produced
//! - `map_info` - firmware information (value is always 1)
//!   - Labels: name, hostname, firmware
//! - one gauge or counter per row of [`FIELDS`]
//!   - Labels: name, hostname
//!
//! The whole record is validated before the first sample is produced, so a device
//! is exported either completely or not at all.

use super::fields::{FieldSpec, FIELDS};
use crate::error::FetchError;
use crate::malina::types::FIRMWARE_FIELD;
use crate::malina::{DeviceTarget, FieldError, StatusRecord};
use crate::metrics::{MetricKind, MetricSample, SampleValue, DEVICE_LABELS};

/// Base name of the info metric (exposed as `map_info`)
pub const INFO_METRIC: &str = "map";
const INFO_HELP: &str = "MAP information";

/// Labels attached to every sample of a device
pub fn device_labels(target: &DeviceTarget) -> Vec<(String, String)> {
    let [name, hostname] = DEVICE_LABELS;
    vec![
        (name.to_string(), target.name.clone()),
        (hostname.to_string(), target.host.clone()),
    ]
}

/// Map a status record to its samples: the info sample first, then one sample
/// per table row in table order.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] naming every offending field when the firmware
/// or a required field is missing, a value is not numeric, or a counter would be
/// negative.
pub fn map_status(
    target: &DeviceTarget,
    record: &StatusRecord,
) -> Result<impl Iterator<Item = MetricSample>, FetchError> {
    let mut problems = Vec::new();

    let firmware = record.firmware();
    if firmware.is_none() {
        problems.push(format!("{}: {}", FIRMWARE_FIELD, FieldError::Missing));
    }

    let mut values: Vec<(&'static FieldSpec, f64)> = Vec::with_capacity(FIELDS.len());
    for spec in FIELDS {
        match record.numeric(spec.field) {
            Ok(raw) => {
                let value = spec.scale(raw);
                if spec.kind == MetricKind::Counter && !(value.is_finite() && value >= 0.0) {
                    problems.push(format!("{}: counter value {} is invalid", spec.field, raw));
                } else {
                    values.push((spec, value));
                }
            }
            Err(FieldError::Missing) if !spec.required => {}
            Err(e) => problems.push(format!("{}: {}", spec.field, e)),
        }
    }

    let firmware = match firmware {
        Some(fw) if problems.is_empty() => fw,
        _ => return Err(FetchError::decode(&target.host, problems.join(", "))),
    };

    let labels = device_labels(target);
    let info = MetricSample {
        name: INFO_METRIC.to_string(),
        kind: MetricKind::Info,
        help: INFO_HELP.to_string(),
        value: SampleValue::Info(vec![("firmware".to_string(), firmware)]),
        labels: labels.clone(),
    };

    let samples = values.into_iter().map(move |(spec, value)| MetricSample {
        name: spec.metric.to_string(),
        kind: spec.kind,
        help: spec.help.to_string(),
        value: SampleValue::Number(value),
        labels: labels.clone(),
    });

    Ok(std::iter::once(info).chain(samples))
}
