//! MAP Status Field Table
//!
//! Declarative mapping from status payload fields to exported metrics. The mapper
//! walks this table in order; adding a metric means adding a row.
//!
//! Energy registers are reported in hundredths of a kWh and are divided by
//! [`ENERGY_DIVISOR`]. The signed `_E_NET_SIGN` register moves in both directions,
//! so it is exported as a gauge rather than a counter.

use crate::metrics::MetricKind;

/// Energy registers count in 0.01 kWh steps
pub const ENERGY_DIVISOR: f64 = 100.0;

/// One row of the field table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Key in the status payload
    pub field: &'static str,
    /// Exported metric name
    pub metric: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    /// Raw value is divided by this before export
    pub divisor: f64,
    /// A missing required field fails the whole device for the scrape;
    /// a missing optional field is skipped.
    pub required: bool,
}

impl FieldSpec {
    const fn gauge(field: &'static str, metric: &'static str, help: &'static str) -> Self {
        Self {
            field,
            metric,
            help,
            kind: MetricKind::Gauge,
            divisor: 1.0,
            required: true,
        }
    }

    const fn energy(field: &'static str, metric: &'static str, help: &'static str) -> Self {
        Self {
            field,
            metric,
            help,
            kind: MetricKind::Counter,
            divisor: ENERGY_DIVISOR,
            required: true,
        }
    }

    const fn scaled(self, divisor: f64) -> Self {
        Self { divisor, ..self }
    }

    const fn counter(self) -> Self {
        Self {
            kind: MetricKind::Counter,
            ..self
        }
    }

    const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    /// Scale a raw register value for export
    pub fn scale(&self, raw: f64) -> f64 {
        raw / self.divisor
    }
}

pub const FIELDS: &[FieldSpec] = &[
    // Gauges
    FieldSpec::gauge("_MODE", "map_mode", "MAP operating mode"),
    FieldSpec::gauge(
        "_Status_Char",
        "map_status_charge",
        "Charge status (MicroART protocol)",
    ),
    FieldSpec::gauge("_Uacc", "map_battery_voltage", "Battery voltage, V"),
    FieldSpec::gauge(
        "_Uch_T",
        "map_battery_charge_end_voltage_with_temp",
        "Battery end-of-charge voltage corrected for the current temperature",
    ),
    FieldSpec::gauge(
        "_Ubuf_T",
        "map_battery_charge_buffer_voltage_with_temp",
        "Battery end-of-charge voltage for the buffer (float) stage",
    ),
    FieldSpec::gauge(
        "_Iacc",
        "map_battery_current_coarse",
        "Battery current, A (coarse value)",
    ),
    FieldSpec::gauge(
        "_IAcc_med_A_u16",
        "map_battery_current_fine",
        "Battery current, A (fine value, 0.1 A resolution)",
    ),
    FieldSpec::gauge(
        "_I_acc_avg",
        "map_battery_current_average",
        "Average battery current",
    ),
    FieldSpec::gauge(
        "_PLoad",
        "map_battery_power",
        "Battery power, W (MAP register)",
    ),
    FieldSpec::gauge(
        "_PLoad_calc",
        "map_battery_power_calculated",
        "Calculated battery power P(t)=I(t)*U(t), W (negative: discharging, positive: charging)",
    ),
    FieldSpec::gauge(
        "_F_Acc_Over",
        "map_battery_power_overload",
        "Battery overload state (see protocol)",
    ),
    FieldSpec::gauge(
        "_F_Net_Over",
        "map_network_power_overload",
        "Grid overload state (see protocol)",
    ),
    FieldSpec::gauge(
        "_UNET",
        "map_network_voltage",
        "Grid voltage at the MAP input, V",
    ),
    FieldSpec::gauge(
        "_INET",
        "map_network_current_coarse",
        "MAP input current, A (coarse value)",
    ),
    FieldSpec::gauge(
        "_INET_16_4",
        "map_network_current_fine",
        "MAP input current, A (fine value, 0.1 A resolution)",
    ),
    FieldSpec::gauge(
        "_E_NET_SIGN",
        "map_network_current_direction",
        "Signed energy balance by current direction at the MAP input, kWh",
    )
    .scaled(ENERGY_DIVISOR),
    FieldSpec::gauge("_PNET", "map_network_power", "MAP input power, VA"),
    FieldSpec::gauge(
        "_PNET_calc",
        "map_network_power_calculated",
        "MAP input power, VA (calculated)",
    ),
    FieldSpec::gauge(
        "_TFNET",
        "map_network_frequency",
        "Grid frequency at the MAP input, Hz",
    ),
    FieldSpec::gauge("_ThFMAP", "map_output_frequency", "MAP output frequency, Hz"),
    FieldSpec::gauge(
        "_UOUTmed",
        "map_output_voltage_average",
        "Average MAP output voltage, V",
    ),
    FieldSpec::gauge(
        "_Temp_Grad0",
        "map_temperature_external",
        "External temperature sensor (mounted on the battery)",
    ),
    FieldSpec::gauge(
        "_Temp_Grad1",
        "map_temperature_tor",
        "Toroidal transformer temperature sensor (DOMINATOR models)",
    ),
    FieldSpec::gauge(
        "_Temp_Grad2",
        "map_temperature_transistors",
        "Power transistor temperature sensor",
    ),
    FieldSpec::gauge("_CoolerSpeed", "map_cooler_speed", "Cooling fan speed"),
    FieldSpec::gauge(
        "_I_acc_3ph",
        "map__I_acc_3ph",
        "Total battery charge/discharge current of a 3-phase system, A",
    ),
    FieldSpec::gauge(
        "_I_ph1",
        "map_battery_current_phase1",
        "Battery charge/discharge current of a 3-phase system: phase 1",
    ),
    FieldSpec::gauge(
        "_I_ph2",
        "map_battery_current_phase2",
        "Battery charge/discharge current of a 3-phase system: phase 2",
    ),
    FieldSpec::gauge(
        "_I_ph3",
        "map_battery_current_phase3",
        "Battery charge/discharge current of a 3-phase system: phase 3",
    ),
    FieldSpec::gauge(
        "_P_mppt_avg",
        "map__P_mppt_avg",
        "Total power from MPPT controllers, W",
    ),
    FieldSpec::gauge(
        "_P_acc_3ph",
        "map__P_acc_3ph",
        "Battery power, all phases (negative: discharging, positive: charging)",
    ),
    FieldSpec::gauge(
        "_P_ph1",
        "map_battery_power_phase1",
        "Battery power: phase 1 (negative: discharging, positive: charging)",
    ),
    FieldSpec::gauge(
        "_P_ph2",
        "map_battery_power_phase2",
        "Battery power: phase 2 (negative: discharging, positive: charging)",
    ),
    FieldSpec::gauge(
        "_P_ph3",
        "map_battery_power_phase3",
        "Battery power: phase 3 (negative: discharging, positive: charging)",
    ),
    FieldSpec::gauge(
        "_E_NET_SIGN_B",
        "map_E_NET_SIGN_B",
        "Raw signed grid energy register _E_NET_SIGN_B",
    )
    .optional(),
    // Counters, kWh
    FieldSpec::energy(
        "_E_NET",
        "map_power_from_network",
        "Energy consumed from the grid, kWh",
    ),
    FieldSpec::energy(
        "_E_ACC",
        "map_power_from_battery",
        "Energy drawn from the battery for MAP generation, kWh",
    ),
    FieldSpec::energy(
        "_E_ACC_CHARGE",
        "map_power_to_battery",
        "Energy used to charge the battery from the grid, kWh",
    ),
    FieldSpec::gauge("_E_NET_B", "map_E_NET_B", "Raw grid energy register _E_NET_B")
        .counter()
        .optional(),
    FieldSpec::gauge("_E_ACC_B", "map_E_ACC_B", "Raw battery energy register _E_ACC_B")
        .counter()
        .optional(),
    FieldSpec::gauge(
        "_E_ACC_CHARGE_B",
        "map_E_ACC_CHARGE_B",
        "Raw battery charge energy register _E_ACC_CHARGE_B",
    )
    .counter()
    .optional(),
];

/// Rows that must be present for a device to be exported at all
pub fn required_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(|f| f.required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique() {
        let mut seen = HashSet::new();
        for spec in FIELDS {
            assert!(seen.insert(spec.metric), "duplicate metric {}", spec.metric);
        }
    }

    #[test]
    fn test_source_fields_are_unique() {
        let mut seen = HashSet::new();
        for spec in FIELDS {
            assert!(seen.insert(spec.field), "duplicate field {}", spec.field);
        }
    }

    #[test]
    fn test_energy_counters_are_scaled() {
        for field in ["_E_NET", "_E_ACC", "_E_ACC_CHARGE"] {
            let spec = FIELDS.iter().find(|f| f.field == field).unwrap();
            assert_eq!(spec.kind, MetricKind::Counter);
            assert_eq!(spec.scale(12345.0), 123.45);
        }
    }

    #[test]
    fn test_signed_energy_is_a_gauge() {
        let spec = FIELDS.iter().find(|f| f.field == "_E_NET_SIGN").unwrap();
        assert_eq!(spec.kind, MetricKind::Gauge);
        assert_eq!(spec.scale(-250.0), -2.5);
    }

    #[test]
    fn test_every_metric_has_help_and_prefix() {
        for spec in FIELDS {
            assert!(!spec.help.is_empty());
            assert!(spec.metric.starts_with("map_"));
        }
    }
}
