//! Storage platform controller splitter
//!
//! The generator emits one monolithic default API controller. The
//! storage-platform endpoints are custom-implemented in a separate
//! source file; every remaining handler is copied out of the default
//! controller into a storage-platform controller so the two can be
//! routed independently. Runs after the openapi-generator call.

use crate::error::Result;
use std::path::Path;

/// Default file names inside the router package.
pub const DEFAULT_SRC: &str = "sp_api.go";
pub const DEFAULT_API: &str = "api_default.go";
pub const DEFAULT_DEST: &str = "sp_api_default.go";

const HEADER: &str = r#"/*
 * Redfish
 *
 * This contains the default implementation of a Storage Platform Redfish service
 *
 * Auto-generated. DO NOT EDIT.
 */

package routermux

import (
	"encoding/json"
	"net/http"
	"strings"

	"github.com/gorilla/mux"
	openapi "github.com/swordctl/rfsf/pkg/models"
)

// A StoragePlatformApiController binds http requests to an api service and writes the service results to the http response
type StoragePlatformApiController struct {
	service DefaultApiServicer
}

// NewStoragePlatformApiController creates a storage platform api controller
func NewStoragePlatformApiController(s DefaultApiServicer) Router {
	return &StoragePlatformApiController{service: s}
}

"#;

/// Handler names already custom-implemented in the storage-platform
/// source: one per `func ... Name(w http.ResponseWriter, ...)`.
pub(crate) fn custom_handlers(src: &str) -> Vec<String> {
    let mut names = Vec::new();
    for ln in src.lines() {
        if !ln.starts_with("func") {
            continue;
        }
        // func (c *StoragePlatformApiController) RedfishV1...Post(w http.ResponseWriter, r *http.Request) {
        if let Some(token) = ln.split(' ').nth(3) {
            if let Some(name) = token.split('(').next() {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Copy every handler block of the default controller whose endpoint is
/// not in `custom` into a storage-platform controller body, rewriting
/// the receiver type. The `Routes` block is always copied.
pub(crate) fn split(default: &str, custom: &[String]) -> String {
    let mut out = String::from(HEADER);
    let mut in_func = false;

    for ln in default.lines() {
        if in_func {
            let line = if ln.starts_with("func (c *DefaultApiController) ") {
                ln.replace("DefaultApiController", "StoragePlatformApiController")
            } else {
                ln.to_string()
            };
            out.push_str(&line);
            out.push('\n');
            if ln.starts_with('}') {
                in_func = false;
                out.push('\n');
            }
        } else if ln.starts_with("// Redfish") {
            let endpoint = ln.split(' ').nth(1).unwrap_or("");
            if !custom.iter().any(|name| name == endpoint) {
                out.push_str(ln);
                out.push('\n');
                in_func = true;
            }
        } else if ln.starts_with("// Routes") {
            out.push_str(ln);
            out.push('\n');
            in_func = true;
        }
    }
    out
}

/// Generate the storage-platform controller inside `dir`.
pub fn run(dir: &Path, src: &str, default: &str, dest: &str) -> Result<()> {
    let custom = custom_handlers(&std::fs::read_to_string(dir.join(src))?);
    for name in &custom {
        println!("Endpoint exists in SP API: {name}");
    }

    let default = std::fs::read_to_string(dir.join(default))?;
    std::fs::write(dir.join(dest), split(&default, &custom))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SP_API: &str = "\
package routermux

func (c *StoragePlatformApiController) RedfishV1StorageServicesGet(w http.ResponseWriter, r *http.Request) {
}
";

    const API_DEFAULT: &str = "\
package routermux

// Routes returns all of the api route for the DefaultApiController
func (c *DefaultApiController) Routes() Routes {
	return Routes{}
}

// RedfishV1StorageServicesGet -
func (c *DefaultApiController) RedfishV1StorageServicesGet(w http.ResponseWriter, r *http.Request) {
	body()
}

// RedfishV1ChassisGet -
func (c *DefaultApiController) RedfishV1ChassisGet(w http.ResponseWriter, r *http.Request) {
	body()
}
";

    #[test]
    fn test_custom_handlers_extracted() {
        let names = custom_handlers(SP_API);
        assert_eq!(names, vec!["RedfishV1StorageServicesGet"]);
    }

    #[test]
    fn test_split_skips_custom_endpoints() {
        let custom = custom_handlers(SP_API);
        let out = split(API_DEFAULT, &custom);

        // Custom-implemented handler is not copied
        assert!(!out.contains("RedfishV1StorageServicesGet(w http.ResponseWriter"));
        // Unimplemented handler is copied with the rewritten receiver
        assert!(out.contains(
            "func (c *StoragePlatformApiController) RedfishV1ChassisGet(w http.ResponseWriter"
        ));
        assert!(!out.contains("func (c *DefaultApiController) RedfishV1ChassisGet"));
    }

    #[test]
    fn test_split_always_copies_routes() {
        let out = split(API_DEFAULT, &[]);
        assert!(out.contains("func (c *StoragePlatformApiController) Routes() Routes {"));
    }

    #[test]
    fn test_split_emits_controller_header() {
        let out = split(API_DEFAULT, &[]);
        assert!(out.starts_with("/*"));
        assert!(out.contains("type StoragePlatformApiController struct"));
        assert!(out.contains("func NewStoragePlatformApiController(s DefaultApiServicer) Router"));
    }
}
