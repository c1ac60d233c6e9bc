//! Property-based tests using proptest
//!
//! Tests that verify properties hold for arbitrary inputs.

mod common;

use common::{full_status, record, status_with, target};
use malina_exporter::collectors::map_status;
use malina_exporter::metrics::{render, MetricKind, MetricSample};
use proptest::prelude::*;
use serde_json::json;

fn map(name: &str, host: &str, status: serde_json::Value) -> Vec<MetricSample> {
    map_status(&target(name, host), &record(status))
        .expect("record should map")
        .collect()
}

proptest! {
    #[test]
    fn test_energy_counters_divide_by_100(raw in 0u32..u32::MAX) {
        // Given: An arbitrary non-negative energy register
        let samples = map("home", "h", status_with(json!({"_E_ACC_CHARGE": raw})));

        // Then: The exported counter is raw / 100
        let energy = samples.iter().find(|s| s.name == "map_power_to_battery").unwrap();
        prop_assert_eq!(energy.kind, MetricKind::Counter);
        prop_assert_eq!(energy.number(), Some(raw as f64 / 100.0));
    }

    #[test]
    fn test_signed_energy_any_sign(raw in i32::MIN..i32::MAX) {
        let samples = map("home", "h", status_with(json!({"_E_NET_SIGN": raw})));

        let direction = samples
            .iter()
            .find(|s| s.name == "map_network_current_direction")
            .unwrap();
        prop_assert_eq!(direction.number(), Some(raw as f64 / 100.0));
    }

    #[test]
    fn test_every_sample_labeled_with_device(name in "\\PC{1,20}", host in "[a-z0-9.]{1,20}(:[0-9]{1,5})?") {
        let samples = map(&name, &host, full_status());

        for sample in &samples {
            let keys: Vec<&str> = sample.labels.iter().map(|(k, _)| k.as_str()).collect();
            prop_assert_eq!(keys, vec!["name", "hostname"]);
            prop_assert_eq!(sample.label("name"), Some(name.as_str()));
            prop_assert_eq!(sample.label("hostname"), Some(host.as_str()));
        }
    }

    #[test]
    fn test_any_device_name_renders_without_panic(name in "\\PC*", firmware in "\\PC*") {
        let samples = map(&name, "10.0.0.5", status_with(json!({"fw": firmware})));

        prop_assert!(render(samples).is_ok());
    }

    #[test]
    fn test_any_gauge_value_renders(value in -1e18f64..1e18f64) {
        let samples = map("home", "h", status_with(json!({"_PNET": value})));

        prop_assert!(render(samples).is_ok());
    }

    #[test]
    fn test_scrape_contains_exactly_healthy_devices(healthy in proptest::collection::vec(any::<bool>(), 0..8)) {
        // Given: N devices, some of which lack a required field
        let mut samples = Vec::new();
        for (i, ok) in healthy.iter().enumerate() {
            let status = if *ok { full_status() } else { json!({"fw": "1.2"}) };
            if let Ok(device) = map_status(&target(&format!("d{}", i), "h"), &record(status)) {
                samples.extend(device);
            }
        }

        // Then: Exactly the healthy ones are present and the output still renders
        let infos = samples.iter().filter(|s| s.kind == MetricKind::Info).count();
        prop_assert_eq!(infos, healthy.iter().filter(|ok| **ok).count());
        prop_assert!(render(samples).is_ok());
    }
}
