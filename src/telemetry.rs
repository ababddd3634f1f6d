//! Bandwidth monitoring over metric reports
//!
//! A metric report definition names its properties with wildcard
//! templates like
//! `/redfish/v1/Fabrics/Rabbit/Switches/{SwitchId}/Ports/{PortId}/Metrics/RxBytes`.
//! The monitor expands the templates against the definition's wildcard
//! value sets, then computes a throughput delta between successive
//! polls of the report and renders a fixed-width table of SI-scaled
//! rates. Only the immediately previous sample is retained per
//! property; there is no smoothing and no bounded history.

use crate::client::model::{MetricReport, MetricReportDefinition, Wildcard};
use crate::error::{Error, Result};
use crate::units::format_rate;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::fmt::Write as _;

// =============================================================================
// Wildcard Expansion
// =============================================================================

/// Expand a wildcard-templated property name into the Cartesian
/// product of all wildcard value lists, substituted in wildcard-list
/// order.
pub fn expand_wildcards(prop: &str, wildcards: &[Wildcard]) -> Vec<String> {
    let Some((wildcard, rest)) = wildcards.split_first() else {
        return vec![prop.to_string()];
    };

    let slot = format!("{{{}}}", wildcard.name);
    let mut expanded = Vec::new();
    for value in &wildcard.values {
        let substituted = prop.replace(&slot, value);
        if rest.is_empty() {
            expanded.push(substituted);
        } else {
            expanded.extend(expand_wildcards(&substituted, rest));
        }
    }
    expanded
}

// =============================================================================
// Timestamps
// =============================================================================

/// Parse a report timestamp. The controller emits RFC3339 with a
/// trailing `Z`; older firmware emits a naive local timestamp, which
/// is treated as UTC.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::TimestampParse(ts.to_string()))
}

// =============================================================================
// Samples
// =============================================================================

/// Last observed counter value for one metric property.
#[derive(Debug, Clone, Copy)]
struct Sample {
    previous: i64,
    timestamp: DateTime<Utc>,
    throughput: f64,
}

/// Tracks per-property samples across polls of one metric report.
pub struct BandwidthMonitor {
    /// Expanded property names, in wildcard-list order.
    properties: Vec<String>,
    samples: HashMap<String, Sample>,
}

impl BandwidthMonitor {
    /// Build the property set from a report definition's wildcards.
    pub fn new(definition: &MetricReportDefinition) -> Self {
        let mut properties = Vec::new();
        for prop in &definition.metric_properties {
            properties.extend(expand_wildcards(prop, &definition.wildcards));
        }
        Self {
            properties,
            samples: HashMap::new(),
        }
    }

    /// Seed the previous-sample state from the first report fetch.
    pub fn seed(&mut self, report: &MetricReport) -> Result<()> {
        for value in &report.metric_values {
            let sample = Sample {
                previous: parse_counter(&value.metric_value)?,
                timestamp: parse_timestamp(&value.timestamp)?,
                throughput: 0.0,
            };
            self.samples.insert(value.metric_property.clone(), sample);
        }
        Ok(())
    }

    /// Fold a fresh report into the sample state. Returns true when any
    /// property's timestamp advanced; a repeated identical timestamp
    /// retains the previous throughput.
    pub fn update(&mut self, report: &MetricReport) -> Result<bool> {
        let mut refresh = false;
        for value in &report.metric_values {
            let counter = parse_counter(&value.metric_value)?;
            let timestamp = parse_timestamp(&value.timestamp)?;

            match self.samples.get_mut(&value.metric_property) {
                Some(sample) => {
                    if sample.timestamp == timestamp {
                        continue;
                    }
                    let delta_bytes = counter - sample.previous;
                    let elapsed = (timestamp - sample.timestamp).num_microseconds();
                    let elapsed_secs = elapsed.unwrap_or(0) as f64 / 1e6;
                    if elapsed_secs != 0.0 {
                        sample.throughput = delta_bytes as f64 / elapsed_secs;
                    }
                    sample.previous = counter;
                    sample.timestamp = timestamp;
                    refresh = true;
                }
                None => {
                    // A property outside the definition's wildcard set;
                    // start tracking it from this sample.
                    self.samples.insert(
                        value.metric_property.clone(),
                        Sample {
                            previous: counter,
                            timestamp,
                            throughput: 0.0,
                        },
                    );
                }
            }
        }
        Ok(refresh)
    }

    /// Current throughput for a property, when sampled at least twice.
    pub fn throughput(&self, property: &str) -> Option<f64> {
        self.samples.get(property).map(|s| s.throughput)
    }

    /// Expanded property names, in wildcard-list order.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Render the fixed-width bandwidth table. Properties shaped like
    /// `.../Switches/<s>/Ports/<p>/Metrics/RxBytes` are grouped into a
    /// per-switch table of Rx/Tx rates; anything else gets a flat
    /// `property  rate` row.
    pub fn render(&self) -> String {
        let mut switches: Vec<(String, Vec<(u64, PortRates)>)> = Vec::new();
        let mut flat: Vec<(String, f64)> = Vec::new();

        for prop in &self.properties {
            let rate = self.throughput(prop).unwrap_or(0.0);
            match PortCounter::parse(prop) {
                Some(counter) => {
                    let switch = match switches.iter_mut().find(|(id, _)| *id == counter.switch) {
                        Some((_, ports)) => ports,
                        None => {
                            switches.push((counter.switch.clone(), Vec::new()));
                            &mut switches.last_mut().unwrap().1
                        }
                    };
                    let port = match switch.iter_mut().find(|(id, _)| *id == counter.port) {
                        Some((_, rates)) => rates,
                        None => {
                            switch.push((counter.port, PortRates::default()));
                            &mut switch.last_mut().unwrap().1
                        }
                    };
                    match counter.direction {
                        Direction::Rx => port.rx = rate,
                        Direction::Tx => port.tx = rate,
                    }
                }
                None => flat.push((prop.clone(), rate)),
            }
        }

        let mut out = String::new();
        for (switch, ports) in &switches {
            let title = format!("Switch {switch}");
            let _ = writeln!(out, "{title:=^28}");
            let _ = writeln!(out, "Port    RxBytes      TxBytes");
            for (port, rates) in ports {
                let rx = format_rate(rates.rx);
                let tx = format_rate(rates.tx);
                let _ = writeln!(out, "{port:<2} {rx:>12} {tx:>12}");
            }
        }
        for (prop, rate) in &flat {
            let _ = writeln!(out, "{prop} {:>12}", format_rate(*rate));
        }
        out
    }
}

fn parse_counter(value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| Error::MetricValueParse(value.to_string()))
}

#[derive(Debug, Clone, Copy, Default)]
struct PortRates {
    rx: f64,
    tx: f64,
}

enum Direction {
    Rx,
    Tx,
}

struct PortCounter {
    switch: String,
    port: u64,
    direction: Direction,
}

impl PortCounter {
    fn parse(prop: &str) -> Option<Self> {
        let direction = if prop.ends_with("/Metrics/RxBytes") {
            Direction::Rx
        } else if prop.ends_with("/Metrics/TxBytes") {
            Direction::Tx
        } else {
            return None;
        };

        let segments: Vec<&str> = prop.split('/').collect();
        let switch_idx = segments.iter().position(|s| *s == "Switches")?;
        let port_idx = segments.iter().position(|s| *s == "Ports")?;
        let switch = segments.get(switch_idx + 1)?.to_string();
        let port: u64 = segments.get(port_idx + 1)?.parse().ok()?;
        Some(Self {
            switch,
            port,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::model::MetricValue;
    use serde_json::json;

    fn wildcard(name: &str, values: &[&str]) -> Wildcard {
        Wildcard {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn report(values: &[(&str, i64, &str)]) -> MetricReport {
        serde_json::from_value(json!({
            "MetricReportDefinition": { "@odata.id": "/redfish/v1/TelemetryService/MetricReportDefinitions/SwitchPortTxRx" },
            "MetricValues": values.iter().map(|(p, v, t)| json!({
                "MetricProperty": p,
                "MetricValue": v.to_string(),
                "Timestamp": t,
            })).collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    #[test]
    fn test_expand_single_wildcard() {
        let props = expand_wildcards("/x/{A}/y", &[wildcard("A", &["0", "1"])]);
        assert_eq!(props, vec!["/x/0/y", "/x/1/y"]);
    }

    #[test]
    fn test_expand_cartesian_product_order() {
        let props = expand_wildcards(
            "/Switches/{SwitchId}/Ports/{PortId}",
            &[
                wildcard("SwitchId", &["0", "1"]),
                wildcard("PortId", &["a", "b"]),
            ],
        );
        assert_eq!(
            props,
            vec![
                "/Switches/0/Ports/a",
                "/Switches/0/Ports/b",
                "/Switches/1/Ports/a",
                "/Switches/1/Ports/b",
            ]
        );
    }

    #[test]
    fn test_expand_no_wildcards() {
        let props = expand_wildcards("/plain", &[]);
        assert_eq!(props, vec!["/plain"]);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2022-03-01T10:00:00.123456Z").is_ok());
        assert!(parse_timestamp("2022-03-01T10:00:00.123456+00:00").is_ok());
        assert!(parse_timestamp("2022-03-01T10:00:00.123456").is_ok());
        assert!(parse_timestamp("not-a-time").is_err());
    }

    #[test]
    fn test_throughput_delta() {
        let definition = MetricReportDefinition {
            wildcards: vec![],
            metric_properties: vec!["/p".into()],
        };
        let mut monitor = BandwidthMonitor::new(&definition);

        monitor
            .seed(&report(&[("/p", 1000, "2022-03-01T10:00:00.000Z")]))
            .unwrap();
        assert_eq!(monitor.throughput("/p"), Some(0.0));

        // 4000 bytes over 2 seconds
        let refreshed = monitor
            .update(&report(&[("/p", 5000, "2022-03-01T10:00:02.000Z")]))
            .unwrap();
        assert!(refreshed);
        assert_eq!(monitor.throughput("/p"), Some(2000.0));
    }

    #[test]
    fn test_repeated_timestamp_retains_throughput() {
        let definition = MetricReportDefinition {
            wildcards: vec![],
            metric_properties: vec!["/p".into()],
        };
        let mut monitor = BandwidthMonitor::new(&definition);

        monitor
            .seed(&report(&[("/p", 0, "2022-03-01T10:00:00.000Z")]))
            .unwrap();
        monitor
            .update(&report(&[("/p", 100, "2022-03-01T10:00:01.000Z")]))
            .unwrap();
        assert_eq!(monitor.throughput("/p"), Some(100.0));

        // Same timestamp again: no refresh, throughput retained even
        // though the counter moved.
        let refreshed = monitor
            .update(&report(&[("/p", 999, "2022-03-01T10:00:01.000Z")]))
            .unwrap();
        assert!(!refreshed);
        assert_eq!(monitor.throughput("/p"), Some(100.0));
    }

    #[test]
    fn test_render_groups_ports() {
        let definition = MetricReportDefinition {
            wildcards: vec![wildcard("SwitchId", &["0"]), wildcard("PortId", &["0", "1"])],
            metric_properties: vec![
                "/redfish/v1/Fabrics/Rabbit/Switches/{SwitchId}/Ports/{PortId}/Metrics/RxBytes"
                    .into(),
                "/redfish/v1/Fabrics/Rabbit/Switches/{SwitchId}/Ports/{PortId}/Metrics/TxBytes"
                    .into(),
            ],
        };
        let monitor = BandwidthMonitor::new(&definition);
        assert_eq!(monitor.properties().len(), 4);

        let table = monitor.render();
        assert!(table.contains("Switch 0"));
        assert!(table.contains("Port"));
        // One row per port, plus title and header
        assert_eq!(table.lines().count(), 4);
    }
}
