//! Connection wrapper for the element controller's REST API
//!
//! Holds a base URL (host, port, path prefix) and exposes one method
//! per HTTP verb, each issuing a request and handing the status and
//! JSON body back to the caller untouched: no retry, no auth, no
//! timeout handling beyond the client defaults. A stack of base paths
//! lets a caller temporarily retarget requests at an absolute
//! `@odata.id` link returned by the server, then restore the prior
//! context.

use crate::error::Result;
use clap::Args;
use parking_lot::Mutex;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

// =============================================================================
// Server Arguments
// =============================================================================

/// Connection flags shared by every client subcommand.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Element controller host
    #[arg(long, env = "SWORDCTL_HOST", default_value = "localhost")]
    pub host: String,

    /// Element controller port
    #[arg(long, env = "SWORDCTL_PORT", default_value = "8080")]
    pub port: u16,
}

impl ServerArgs {
    /// Open a connection against a service base path.
    pub fn connect(&self, base: &str) -> Connection {
        Connection::new(&self.host, self.port, base)
    }
}

// =============================================================================
// Response
// =============================================================================

/// Raw response from the controller: status plus the JSON body, if any.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Option<Value>,
}

impl ApiResponse {
    /// True for any 2xx status.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Numeric HTTP status.
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// JSON body, when the server sent one.
    pub fn json(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Deserialize the body into a typed model.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.clone().unwrap_or(Value::Null);
        Ok(serde_json::from_value(body)?)
    }

    #[cfg(test)]
    pub(crate) fn fake(status: u16, body: Option<Value>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body,
        }
    }
}

// =============================================================================
// Connection
// =============================================================================

/// A connection to one service root on the element controller.
pub struct Connection {
    host: String,
    port: u16,
    client: Client,
    /// Stack of base paths; the last entry is the active one. The
    /// bottom element is the service base handed to `new` and is never
    /// popped.
    paths: Mutex<Vec<String>>,
}

impl Connection {
    /// Create a connection rooted at `base`, e.g.
    /// `/redfish/v1/StorageServices/NNF`.
    pub fn new(host: &str, port: u16, base: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            client: Client::new(),
            paths: Mutex::new(vec![base.to_string()]),
        }
    }

    /// The base path this connection was opened against (stack bottom).
    pub fn base(&self) -> String {
        self.paths.lock().first().cloned().unwrap_or_default()
    }

    /// The full URL prefix requests are currently issued against.
    pub fn url(&self) -> String {
        let paths = self.paths.lock();
        let active = paths.last().map(String::as_str).unwrap_or_default();
        format!("http://{}:{}{}", self.host, self.port, active)
    }

    /// Temporarily retarget requests at an absolute path, usually an
    /// `@odata.id` returned by the server.
    pub fn push_path(&self, path: &str) {
        self.paths.lock().push(path.to_string());
    }

    /// Restore the previously active base path. Popping the bottom
    /// element is a no-op.
    pub fn pop_path(&self) {
        let mut paths = self.paths.lock();
        if paths.len() > 1 {
            paths.pop();
        }
    }

    pub async fn get(&self, odata_id: &str) -> Result<ApiResponse> {
        self.request(Method::GET, odata_id, None).await
    }

    pub async fn put(&self, odata_id: &str, json: Value) -> Result<ApiResponse> {
        self.request(Method::PUT, odata_id, Some(json)).await
    }

    pub async fn post(&self, odata_id: &str, json: Value) -> Result<ApiResponse> {
        self.request(Method::POST, odata_id, Some(json)).await
    }

    pub async fn patch(&self, odata_id: &str, json: Value) -> Result<ApiResponse> {
        self.request(Method::PATCH, odata_id, Some(json)).await
    }

    pub async fn delete(&self, odata_id: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, odata_id, None).await
    }

    async fn request(
        &self,
        method: Method,
        odata_id: &str,
        json: Option<Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.url(), odata_id);
        debug!(%method, %url, "issuing request");

        let mut builder = self.client.request(method, &url);
        if let Some(json) = json {
            builder = builder.json(&json);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.ok();

        debug!(status = status.as_u16(), "response received");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_restores_url() {
        let conn = Connection::new("localhost", 8080, "/redfish/v1/StorageServices/NNF");
        let original = conn.url();
        assert_eq!(original, "http://localhost:8080/redfish/v1/StorageServices/NNF");

        conn.push_path("/redfish/v1/Fabrics/Rabbit");
        assert_eq!(conn.url(), "http://localhost:8080/redfish/v1/Fabrics/Rabbit");

        conn.pop_path();
        assert_eq!(conn.url(), original);
    }

    #[test]
    fn test_pop_never_drops_service_base() {
        let conn = Connection::new("localhost", 8080, "/redfish/v1/EventService");
        conn.pop_path();
        conn.pop_path();
        assert_eq!(conn.url(), "http://localhost:8080/redfish/v1/EventService");
        assert_eq!(conn.base(), "/redfish/v1/EventService");
    }

    #[test]
    fn test_nested_push_pop() {
        let conn = Connection::new("rabbit", 80, "/a");
        conn.push_path("/b");
        conn.push_path("/c");
        assert_eq!(conn.url(), "http://rabbit:80/c");
        conn.pop_path();
        assert_eq!(conn.url(), "http://rabbit:80/b");
        conn.pop_path();
        assert_eq!(conn.url(), "http://rabbit:80/a");
        // base is unchanged by pushes
        assert_eq!(conn.base(), "/a");
    }

    #[test]
    fn test_response_ok() {
        assert!(ApiResponse::fake(200, None).ok());
        assert!(ApiResponse::fake(204, None).ok());
        assert!(!ApiResponse::fake(404, None).ok());
        assert_eq!(ApiResponse::fake(500, None).status(), 500);
    }
}
