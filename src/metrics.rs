//! Prometheus Metric Samples
//!
//! A scrape produces a flat stream of [`MetricSample`]s. Nothing is kept between
//! scrapes: [`render`] builds a fresh [`Registry`] from the stream, encodes it in
//! the Prometheus text format and drops it.
//!
//! # Metric Types
//!
//! - **Gauge**: point-in-time value (voltage, power, temperature)
//! - **Counter**: cumulative energy total in kWh
//! - **Info**: descriptive labels (firmware), exposed as a `*_info` gauge fixed at 1
//!
//! All metrics use the `map_` prefix.

use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Device-identifying label keys, in exposition order
pub const DEVICE_LABELS: [&str; 2] = ["name", "hostname"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Number(f64),
    /// Descriptive key/value pairs of an info sample
    Info(Vec<(String, String)>),
}

/// One exposition sample
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub kind: MetricKind,
    pub help: String,
    pub value: SampleValue,
    /// Ordered label pairs; always [`DEVICE_LABELS`] for device samples
    pub labels: Vec<(String, String)>,
}

impl MetricSample {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn number(&self) -> Option<f64> {
        match self.value {
            SampleValue::Number(v) => Some(v),
            SampleValue::Info(_) => None,
        }
    }

    /// Exposed family name; info samples get the conventional `_info` suffix.
    pub fn family_name(&self) -> String {
        match self.kind {
            MetricKind::Info => format!("{}_info", self.name),
            _ => self.name.clone(),
        }
    }

    /// Labels as exposed: device labels followed by info pairs.
    fn exposed_labels(&self) -> Vec<(&str, &str)> {
        let mut labels: Vec<(&str, &str)> = self
            .labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let SampleValue::Info(pairs) = &self.value {
            labels.extend(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        labels
    }

    fn exposed_value(&self) -> f64 {
        match self.value {
            SampleValue::Number(v) => v,
            SampleValue::Info(_) => 1.0,
        }
    }
}

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// Render a sample stream in the Prometheus text exposition format
///
/// Samples sharing a family name (the same field across devices) are grouped into
/// one metric family. An empty stream renders as an empty document.
pub fn render<I>(samples: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = MetricSample>,
{
    let registry = Registry::new();
    let mut families: BTreeMap<String, Family> = BTreeMap::new();

    for sample in samples {
        let family_name = sample.family_name();
        let labels = sample.exposed_labels();
        let label_values: Vec<&str> = labels.iter().map(|(_, v)| *v).collect();

        let family = match families.entry(family_name) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let label_names: Vec<&str> = labels.iter().map(|(k, _)| *k).collect();
                let opts = Opts::new(entry.key().clone(), sample.help.clone());
                let family = match sample.kind {
                    MetricKind::Counter => {
                        let vec = CounterVec::new(opts, &label_names)?;
                        registry.register(Box::new(vec.clone()))?;
                        Family::Counter(vec)
                    }
                    MetricKind::Gauge | MetricKind::Info => {
                        let vec = GaugeVec::new(opts, &label_names)?;
                        registry.register(Box::new(vec.clone()))?;
                        Family::Gauge(vec)
                    }
                };
                entry.insert(family)
            }
        };

        let value = sample.exposed_value();
        match family {
            Family::Gauge(vec) => vec
                .get_metric_with_label_values(label_values.as_slice())?
                .set(value),
            Family::Counter(vec) => {
                anyhow::ensure!(
                    value >= 0.0,
                    "counter {} has negative value {}",
                    sample.name,
                    value
                );
                vec.get_metric_with_label_values(label_values.as_slice())?
                    .inc_by(value)
            }
        }
    }

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
