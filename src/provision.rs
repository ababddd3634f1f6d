//! Batch provisioning flows
//!
//! The non-interactive counterparts of the storage shell: allocate
//! pools and groups for a set of compute nodes, soak-test storage
//! group create/delete, and the quick setup/teardown sequences used by
//! the shell's `quick` menu. Every flow is a fixed, ordered sequence
//! of requests; any non-2xx response aborts it.

use crate::client::{model, ApiResponse, Connection};
use crate::error::{Error, Result};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

// =============================================================================
// Request Plans
// =============================================================================

/// One step of a provisioning sequence.
#[derive(Debug, Clone)]
pub struct PlannedRequest {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

impl PlannedRequest {
    fn post(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            payload: Some(payload),
        }
    }

    fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            payload: None,
        }
    }
}

/// Issue one planned request on the connection.
pub async fn execute(conn: &Connection, request: &PlannedRequest) -> Result<ApiResponse> {
    debug!(method = %request.method, path = %request.path, "plan step");
    match request.method {
        Method::POST => {
            conn.post(&request.path, request.payload.clone().unwrap_or(Value::Null))
                .await
        }
        Method::PUT => {
            conn.put(&request.path, request.payload.clone().unwrap_or(Value::Null))
                .await
        }
        Method::DELETE => conn.delete(&request.path).await,
        _ => conn.get(&request.path).await,
    }
}

/// The quick-setup sequence: pool, group, file system, file share, in
/// that order. Identifiers are the literal defaults (`0`); the real
/// system assigns them, nothing is validated locally.
pub fn quick_setup_plan(base: &str, fs_type: &str) -> Vec<PlannedRequest> {
    let capacity = 1 << 30; // 1GiB
    vec![
        PlannedRequest::post("/StoragePools", model::storage_pool(capacity)),
        PlannedRequest::post("/StorageGroups", model::storage_group(base, "0", "0")),
        PlannedRequest::post("/FileSystems", model::file_system(base, fs_type, "test", "0")),
        PlannedRequest::post(
            "/FileSystems/0/ExportedFileShares",
            model::file_share(base, "0", "/mnt/test"),
        ),
    ]
}

/// Quick teardown: deleting pool `0` cascades through the stack on the
/// controller side.
pub fn quick_teardown_plan() -> Vec<PlannedRequest> {
    vec![PlannedRequest::delete("/StoragePools/0")]
}

// =============================================================================
// Allocate
// =============================================================================

/// Create a storage pool and a storage group for each compute node.
/// Endpoint 0 is reserved for the controller itself, so node `n`
/// attaches through endpoint `n + 1`.
pub async fn allocate(conn: &Connection, nodes: &[u8], size: u64) -> Result<()> {
    for &node in nodes {
        println!("Starting Node '{node}' Sequence...");

        print!("\tCreating Storage Pool... ");
        let pool = created_id(conn.post("/StoragePools", model::storage_pool(size)).await?)?;
        println!("Created Storage Pool ID '{pool}'");

        print!("\tCreating Storage Group... ");
        let endpoint = (node + 1).to_string();
        let payload = model::storage_group(&conn.base(), &pool, &endpoint);
        let group = created_id(conn.post("/StorageGroups", payload).await?)?;
        println!("Created Storage Group ID '{group}'");

        println!("Storage Node '{node}' Ready.");
    }

    println!();
    println!("All Nodes Ready");
    Ok(())
}

// =============================================================================
// Cycle
// =============================================================================

/// Storage group create/delete soak loop against one pool. Runs until
/// interrupted or a request fails.
pub async fn cycle(conn: &Connection, size: u64, endpoint: &str, pause: u64) -> Result<()> {
    print!("Creating Storage Pool: Size: {size}...");
    let pool = created_id(conn.post("/StoragePools", model::storage_pool(size)).await?)?;
    println!("Created: Id: {pool}");

    println!("Beginning Storage Group Create/Delete Loop: Pool: {pool} Endpoint: {endpoint}");
    loop {
        print!("Creating Storage Group...");
        let payload = model::storage_group(&conn.base(), &pool, endpoint);
        let group = created_id(conn.post("/StorageGroups", payload).await?)?;
        println!("Created: Id: {group}");

        println!("Pause {pause} seconds for Storage Group to come ready");
        tokio::time::sleep(Duration::from_secs(pause)).await;

        print!("Delete Storage Group {group}....");
        let response = conn.delete(&format!("/StorageGroups/{group}")).await?;
        if !response.ok() {
            println!("ERROR: {}", response.status());
            return Err(Error::HttpStatus {
                status: response.status(),
                path: format!("/StorageGroups/{group}"),
            });
        }
        println!("Deleted: Id: {group}");

        println!("Pause {pause} seconds for Storage Group to delete");
        tokio::time::sleep(Duration::from_secs(pause)).await;
    }
}

/// Pull the assigned `Id` out of a create response, mapping a non-2xx
/// status to the batch-failure error.
fn created_id(response: ApiResponse) -> Result<String> {
    if !response.ok() {
        println!("ERROR: {}", response.status());
        return Err(Error::HttpStatus {
            status: response.status(),
            path: String::new(),
        });
    }
    let resource: crate::client::ResourceId = response.parse()?;
    Ok(resource.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "/redfish/v1/StorageServices/NNF";

    #[test]
    fn test_quick_setup_is_four_posts_in_order() {
        let plan = quick_setup_plan(BASE, "lvm");
        assert_eq!(plan.len(), 4);
        assert!(plan.iter().all(|r| r.method == Method::POST));

        let paths: Vec<&str> = plan.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/StoragePools",
                "/StorageGroups",
                "/FileSystems",
                "/FileSystems/0/ExportedFileShares",
            ]
        );
    }

    #[test]
    fn test_quick_setup_uses_default_identifiers() {
        let plan = quick_setup_plan(BASE, "xfs");
        let group = plan[1].payload.as_ref().unwrap();
        assert_eq!(
            group["Links"]["StoragePool"]["@odata.id"],
            format!("{BASE}/StoragePools/0")
        );
        let fs = plan[2].payload.as_ref().unwrap();
        assert_eq!(fs["Oem"]["Type"], "xfs");
        assert_eq!(fs["Oem"]["Name"], "test");
        let share = plan[3].payload.as_ref().unwrap();
        assert_eq!(share["FileSharePath"], "/mnt/test");
    }

    #[test]
    fn test_quick_teardown_deletes_pool_zero() {
        let plan = quick_teardown_plan();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].method, Method::DELETE);
        assert_eq!(plan[0].path, "/StoragePools/0");
    }

    #[test]
    fn test_created_id_success() {
        let response = ApiResponse::fake(200, Some(json!({"Id": "3"})));
        assert_eq!(created_id(response).unwrap(), "3");
    }

    #[test]
    fn test_created_id_http_failure() {
        let response = ApiResponse::fake(507, None);
        let err = created_id(response).unwrap_err();
        assert!(err.is_http_failure());
    }
}
