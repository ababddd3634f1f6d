//! REST client for the element controller
//!
//! A thin connection wrapper over the controller's Redfish/Swordfish
//! service plus the payload types the commands exchange with it.

pub mod connection;
pub mod model;

pub use connection::{ApiResponse, Connection, ServerArgs};
pub use model::{
    EventRecord, MetricReport, MetricReportDefinition, MetricValue, ODataRef, ResourceCollection,
    ResourceId, Wildcard,
};

/// Base path of the storage service on the element controller.
pub const STORAGE_SERVICE: &str = "/redfish/v1/StorageServices/NNF";

/// Base path of the event service.
pub const EVENT_SERVICE: &str = "/redfish/v1/EventService";

/// Base path of the telemetry service.
pub const TELEMETRY_SERVICE: &str = "/redfish/v1/TelemetryService";
