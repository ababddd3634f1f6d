//! swordctl - Developer tooling for a Redfish/Swordfish storage
//! element controller
//!
//! Two loosely related toolsets share this crate:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Interactive Client                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐  ┌────────────┐  ┌────────────────────────┐ │
//! │  │   Shells   │  │   Batch    │  │  Event / Telemetry     │ │
//! │  │ pool/group │  │ allocate   │  │  viewers + bandwidth   │ │
//! │  │ fs/share   │  │ cycle      │  │  monitor + listener    │ │
//! │  └─────┬──────┘  └─────┬──────┘  └───────────┬────────────┘ │
//! │        └───────────────┼─────────────────────┘              │
//! │                 ┌──────┴───────┐                            │
//! │                 │  Connection  │  GET/PUT/POST/PATCH/DELETE │
//! │                 └──────┬───────┘                            │
//! └────────────────────────┼────────────────────────────────────┘
//!                          │ http
//!               ┌──────────┴──────────┐
//!               │  Element Controller │  (external)
//!               └─────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Generator Patchers (build-time only)            │
//! │   yaml refs │ enum constants │ model imports │ sp split      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`client`]: connection wrapper and Redfish payload shapes
//! - [`shell`]: interactive command interpreter and resource menus
//! - [`provision`]: batch pool/group provisioning flows
//! - [`events`]: event rendering and the push-delivery listener
//! - [`telemetry`]: wildcard expansion and the bandwidth monitor
//! - [`patch`]: build-time patchers for generated server stubs
//! - [`units`]: byte-size parsing and SI rate scaling
//! - [`error`]: error types and handling

pub mod client;
pub mod error;
pub mod events;
pub mod patch;
pub mod provision;
pub mod shell;
pub mod telemetry;
pub mod units;

// Re-export commonly used types
pub use client::{ApiResponse, Connection, ServerArgs};
pub use error::{Error, Result};
pub use telemetry::BandwidthMonitor;
pub use units::parse_byte_size;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
