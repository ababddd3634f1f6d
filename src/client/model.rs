//! Redfish/Swordfish payload shapes
//!
//! The schemas are owned by the element controller; only the handful
//! of fields the tooling reads or writes are modeled here. Everything
//! else passes through as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// =============================================================================
// Resource References
// =============================================================================

/// An OData resource link, `{"@odata.id": "/redfish/v1/..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ODataRef {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl ODataRef {
    /// The trailing path segment, which Redfish uses as the member id.
    pub fn id(&self) -> &str {
        self.odata_id.rsplit('/').next().unwrap_or(&self.odata_id)
    }
}

/// A Redfish collection resource; only the member links matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceCollection {
    #[serde(rename = "Members", default)]
    pub members: Vec<ODataRef>,
}

/// A created resource; only the id is read back.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceId {
    #[serde(rename = "Id")]
    pub id: String,
}

// =============================================================================
// Request Payload Builders
// =============================================================================

/// Storage pool create payload. `Oem.Compliance: relaxed` lets the
/// controller round the allocation to drive granularity.
pub fn storage_pool(allocated_bytes: u64) -> Value {
    json!({
        "Capacity": { "Data": { "AllocatedBytes": allocated_bytes } },
        "Oem": { "Compliance": "relaxed" }
    })
}

/// Storage group create payload, linking a pool to a server endpoint.
pub fn storage_group(base: &str, pool_id: &str, endpoint_id: &str) -> Value {
    json!({
        "Links": {
            "StoragePool": { "@odata.id": format!("{base}/StoragePools/{pool_id}") },
            "ServerEndpoint": { "@odata.id": format!("{base}/Endpoints/{endpoint_id}") }
        }
    })
}

/// File system create payload.
pub fn file_system(base: &str, fs_type: &str, name: &str, pool_id: &str) -> Value {
    json!({
        "Links": { "StoragePool": { "@odata.id": format!("{base}/StoragePools/{pool_id}") } },
        "Oem": { "Type": fs_type, "Name": name }
    })
}

/// File share create payload, exporting a file system to an endpoint.
pub fn file_share(base: &str, endpoint_id: &str, mountpoint: &str) -> Value {
    json!({
        "Links": { "Endpoint": { "@odata.id": format!("{base}/Endpoints/{endpoint_id}") } },
        "FileSharePath": mountpoint
    })
}

/// Event subscription payload pointing at a push delivery target.
pub fn subscription(destination: &str) -> Value {
    json!({
        "Destination": destination,
        "Protocol": "Redfish"
    })
}

// =============================================================================
// Event Service Shapes
// =============================================================================

/// One event resource, as listed under `/EventService/Events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "EventId", default)]
    pub event_id: String,
    #[serde(rename = "MessageSeverity", default)]
    pub severity: String,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "MessageArgs", default)]
    pub message_args: Vec<String>,
}

/// Push-delivered event batch: `{"Events": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventBatch {
    #[serde(rename = "Events", default)]
    pub events: Vec<EventRecord>,
}

// =============================================================================
// Telemetry Service Shapes
// =============================================================================

/// A wildcard of a metric report definition: a name and the values it
/// ranges over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wildcard {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Values", default)]
    pub values: Vec<String>,
}

/// Metric report definition; wildcards plus the templated properties.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricReportDefinition {
    #[serde(rename = "Wildcards", default)]
    pub wildcards: Vec<Wildcard>,
    #[serde(rename = "MetricProperties", default)]
    pub metric_properties: Vec<String>,
}

/// One sampled value of a metric report.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricValue {
    #[serde(rename = "MetricProperty")]
    pub metric_property: String,
    #[serde(rename = "MetricValue")]
    pub metric_value: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

/// A metric report: the definition link and the current values.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricReport {
    #[serde(rename = "MetricReportDefinition")]
    pub definition: ODataRef,
    #[serde(rename = "MetricValues", default)]
    pub metric_values: Vec<MetricValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "/redfish/v1/StorageServices/NNF";

    #[test]
    fn test_odata_ref_id() {
        let r = ODataRef {
            odata_id: "/redfish/v1/EventService/Events/3".into(),
        };
        assert_eq!(r.id(), "3");
    }

    #[test]
    fn test_storage_pool_payload() {
        let payload = storage_pool(500_000_000_000);
        assert_eq!(
            payload["Capacity"]["Data"]["AllocatedBytes"],
            500_000_000_000u64
        );
        assert_eq!(payload["Oem"]["Compliance"], "relaxed");
    }

    #[test]
    fn test_storage_group_payload() {
        let payload = storage_group(BASE, "0", "1");
        assert_eq!(
            payload["Links"]["StoragePool"]["@odata.id"],
            format!("{BASE}/StoragePools/0")
        );
        assert_eq!(
            payload["Links"]["ServerEndpoint"]["@odata.id"],
            format!("{BASE}/Endpoints/1")
        );
    }

    #[test]
    fn test_file_system_payload() {
        let payload = file_system(BASE, "lvm", "test", "0");
        assert_eq!(payload["Oem"]["Type"], "lvm");
        assert_eq!(payload["Oem"]["Name"], "test");
        assert_eq!(
            payload["Links"]["StoragePool"]["@odata.id"],
            format!("{BASE}/StoragePools/0")
        );
    }

    #[test]
    fn test_file_share_payload() {
        let payload = file_share(BASE, "0", "/mnt/test");
        assert_eq!(payload["FileSharePath"], "/mnt/test");
        assert_eq!(
            payload["Links"]["Endpoint"]["@odata.id"],
            format!("{BASE}/Endpoints/0")
        );
    }

    #[test]
    fn test_subscription_payload() {
        let payload = subscription("http://10.0.0.1:8093/");
        assert_eq!(payload["Destination"], "http://10.0.0.1:8093/");
        assert_eq!(payload["Protocol"], "Redfish");
    }

    #[test]
    fn test_metric_report_parse() {
        let report: MetricReport = serde_json::from_value(serde_json::json!({
            "MetricReportDefinition": { "@odata.id": "/redfish/v1/TelemetryService/MetricReportDefinitions/SwitchPortTxRx" },
            "MetricValues": [
                { "MetricProperty": "/p", "MetricValue": "100", "Timestamp": "2022-01-01T00:00:00.000Z" }
            ]
        }))
        .unwrap();
        assert_eq!(report.definition.id(), "SwitchPortTxRx");
        assert_eq!(report.metric_values.len(), 1);
    }
}
