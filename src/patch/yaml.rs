//! Schema `$ref` name repair
//!
//! The upstream schema bundler collapses nested definitions into names
//! like `ManagerAccountCollection_ManagerAccountCollection_ManagerAccountCollection`
//! or `Certificate_v1_2_1_Certificate_v1_2_1_RekeyRequestBody`. The
//! generator then derives model names from these, so the duplication
//! has to be folded away before generation. Runs before the
//! openapi-generator call.

use crate::error::Result;
use crate::patch::at_line;
use std::io::Write;
use std::path::Path;

/// Known bad entry referencing a legacy swordfish schema definition;
/// the collection actually lives in the redfish namespace.
const BAD_DRIVE_COLLECTION: &str = "redfish.dmtf.org/schemas/swordfish/v1/DriveCollection.yaml#/components/schemas/DriveCollection_DriveCollection";

/// Filter one line of the schema.
pub fn patch_line(ln: &str) -> Result<String> {
    let mut line = ln.to_string();

    if line.trim_start().starts_with("$ref:") && !line.trim_end().ends_with('\'') {
        line = fix_collection(&line)?;
    }

    if line.contains(BAD_DRIVE_COLLECTION) {
        line = line.replace("swordfish/", "");
    }

    Ok(line)
}

/// Collapse a duplicated schema name on a `$ref:` line.
fn fix_collection(ln: &str) -> Result<String> {
    let url = ln.rsplit(':').next().unwrap_or("");
    let name = url.rsplit('/').next().unwrap_or("").trim_end();
    if name.is_empty() {
        return Err(crate::error::Error::Internal(format!(
            "$ref line has no schema name: {ln}"
        )));
    }
    let names: Vec<&str> = name.split('_').collect();

    if name.contains("v1") {
        // Versioned model: Certificate_v1_2_1_Certificate_v1_2_1_Rekey...
        let model = names[..names.len().min(4)].join("_");
        if name.matches(&model).count() == 2 {
            let last = names.last().unwrap_or(&"");
            let fixed = format!("{model}_{last}");
            return Ok(ln.replace(name, &fixed));
        }
        Ok(ln.to_string())
    } else {
        // Collection type: Foo_Foo_Foo collapses to Foo_Foo.
        if names.len() == 2 {
            return Ok(ln.to_string());
        }
        let fixed = format!("{}_{}", names[0], names[0]);
        Ok(ln.replace(name, &fixed))
    }
}

/// Filter a schema file, writing the patched stream to `output` (or
/// stdout when none is given).
pub fn run(src: &Path, output: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(src)?;

    let mut patched = String::with_capacity(content.len());
    for (num, ln) in content.lines().enumerate() {
        let line = patch_line(ln).map_err(|e| at_line(src, num + 1, e.to_string()))?;
        patched.push_str(&line);
        patched.push('\n');
    }

    match output {
        Some(path) => std::fs::write(path, patched)?,
        None => std::io::stdout().write_all(patched.as_bytes())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_collapsed() {
        let ln = "        $ref: yaml#/components/schemas/ManagerAccountCollection_ManagerAccountCollection_ManagerAccountCollection";
        let patched = patch_line(ln).unwrap();
        assert!(patched.ends_with(
            "/ManagerAccountCollection_ManagerAccountCollection"
        ));
        assert!(!patched.ends_with(
            "ManagerAccountCollection_ManagerAccountCollection_ManagerAccountCollection"
        ));
    }

    #[test]
    fn test_collection_pair_untouched() {
        let ln = "  $ref: yaml#/components/schemas/DriveCollection_DriveCollection";
        assert_eq!(patch_line(ln).unwrap(), ln);
    }

    #[test]
    fn test_versioned_model_collapsed() {
        let ln =
            "  $ref: yaml#/components/schemas/Certificate_v1_2_1_Certificate_v1_2_1_RekeyRequestBody";
        let patched = patch_line(ln).unwrap();
        assert!(patched.ends_with("/Certificate_v1_2_1_RekeyRequestBody"));
    }

    #[test]
    fn test_versioned_model_single_occurrence_untouched() {
        let ln = "  $ref: yaml#/components/schemas/Certificate_v1_2_1_Certificate";
        assert_eq!(patch_line(ln).unwrap(), ln);
    }

    #[test]
    fn test_quoted_ref_untouched() {
        let ln = "  $ref: 'yaml#/components/schemas/Foo_Foo_Foo'";
        assert_eq!(patch_line(ln).unwrap(), ln);
    }

    #[test]
    fn test_non_ref_line_untouched() {
        let ln = "      description: A storage pool";
        assert_eq!(patch_line(ln).unwrap(), ln);
    }

    #[test]
    fn test_swordfish_drive_collection_rewritten() {
        let ln = format!("  $ref: 'http://{BAD_DRIVE_COLLECTION}'");
        let patched = patch_line(&ln).unwrap();
        assert!(!patched.contains("swordfish/"));
        assert!(patched.contains("redfish.dmtf.org/schemas/v1/DriveCollection.yaml"));
    }
}
