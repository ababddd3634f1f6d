//! Generated enum constant renamer
//!
//! The generator emits string enums whose constants reference a
//! camel-cased type that is never declared:
//!
//! ```text
//! type Resource_v1_10_0_Reference string
//!
//! // List of Resource_v1_10_0_Reference
//! const (
//!     TOP ResourceV1100Reference = "Top"
//!     ...
//! )
//! ```
//!
//! The type declaration is renamed to the camel form the constants
//! expect, each constant gains a type-derived suffix so identical
//! constant names in different enums stop colliding, and the rename is
//! then propagated through every generated file by literal substring
//! substitution. Runs after the openapi-generator call.

use crate::error::Result;
use crate::patch::files_in;
use std::path::Path;

// =============================================================================
// Line Classification
// =============================================================================

/// A string-enum type declaration, e.g.
/// `type Chassis_v1_14_0_IndicatorLED string`.
fn is_enum_type(ln: &str) -> bool {
    ln.starts_with("type ") && ln.trim_end().ends_with(" string")
}

/// The declared type name on an enum declaration line.
fn enum_name(ln: &str) -> &str {
    ln.split_whitespace().nth(1).unwrap_or("")
}

/// Camel-case a generated type name:
/// `Chassis_v1_14_0_IndicatorLED` → `ChassisV1140IndicatorLED`.
fn make_type_name(ln: &str) -> String {
    enum_name(ln).replacen("v1", "V1", 1).replace('_', "")
}

/// Abbreviate a type into a constant suffix by dropping all lowercase
/// letters and underscores: `Chassis_v1_14_0_IndicatorLED` → `CV1140ILED`.
/// Types ending in `State` get a trailing `T` so they stay distinct
/// from the matching `Status` enum.
fn make_type_suffix(ln: &str) -> String {
    let name = enum_name(ln);
    let mut suffix: String = name
        .replacen("v1", "V1", 1)
        .chars()
        .filter(|c| !c.is_ascii_lowercase() && *c != '_')
        .collect();
    if name.ends_with("State") {
        suffix.push('T');
    }
    suffix
}

/// First token of a constant line, e.g. `UNKNOWN`.
fn const_name(ln: &str) -> &str {
    ln.trim_start().split(' ').next().unwrap_or("")
}

/// Second token of a constant line: the constant's declared type.
fn const_type(ln: &str) -> &str {
    ln.trim_start().split(' ').nth(1).unwrap_or("")
}

/// Constant identifiers are ALL_CAPS or numeric (`_2_5` style).
fn is_const_line(ln: &str) -> bool {
    let name = const_name(ln);
    if name.is_empty() {
        return false;
    }
    let upper = name.chars().any(|c| c.is_alphabetic())
        && !name.chars().any(|c| c.is_lowercase());
    let numeric = {
        let digits = name.replace('_', "");
        !digits.is_empty() && digits.chars().all(|c| c.is_numeric())
    };
    upper || numeric
}

/// Rewrite one constant line: suffix the identifier, retype it to the
/// camel name.
fn make_const_line(ln: &str, name: &str, suffix: &str) -> String {
    let cnst = const_name(ln).to_string();
    let ln = ln.replacen(&cnst, &format!("{cnst}_{suffix}"), 1);
    let typ = const_type(&ln).to_string();
    ln.replacen(&typ, name, 1)
}

// =============================================================================
// File Patching
// =============================================================================

/// Patch the enum declarations and constants in one file's content.
/// Returns the patched content and, when a constant was rewritten, the
/// `(old, new)` type-name pair to propagate through the other files.
pub(crate) fn patch_enums(content: &str) -> (String, Option<(String, String)>) {
    let mut rename = None;
    let mut name = String::new();
    let mut suffix = String::new();

    let mut lines = Vec::new();
    for ln in content.lines() {
        let mut line = ln.to_string();

        if is_enum_type(&line) {
            name = make_type_name(&line);
            suffix = make_type_suffix(&line);
            line = line.replace(enum_name(&line), &name);
        } else if is_const_line(&line) && !suffix.is_empty() {
            // Avoid patching an existing patch
            if !const_name(&line).ends_with(&suffix) {
                rename = Some((const_type(&line).to_string(), name.clone()));
                line = make_const_line(&line, &name, &suffix);
            }
        }
        lines.push(line);
    }

    let mut patched = lines.join("\n");
    if content.ends_with('\n') {
        patched.push('\n');
    }
    (patched, rename)
}

/// Patch every constant-declaring file under `dir`, propagating each
/// type rename through all files via literal substring substitution.
pub fn run(dir: &Path) -> Result<()> {
    for path in files_in(dir)? {
        let content = std::fs::read_to_string(&path)?;
        if !content.lines().any(is_enum_type) {
            continue;
        }

        println!("Found patch file {}", path.display());
        let (patched, rename) = patch_enums(&content);
        std::fs::write(&path, patched)?;

        if let Some((src, dst)) = rename {
            propagate(&src, &dst, dir)?;
        }
    }
    Ok(())
}

fn propagate(src: &str, dst: &str, dir: &Path) -> Result<()> {
    if src == dst {
        return Ok(());
    }
    println!("  Patching models from {src} to {dst}");
    for path in files_in(dir)? {
        let content = std::fs::read_to_string(&path)?;
        if content.contains(src) {
            std::fs::write(&path, content.replace(src, dst))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = "\
type Chassis_v1_14_0_IndicatorLED string

// List of Chassis_v1_14_0_IndicatorLED
const (
\tUNKNOWN ChassisV1140IndicatorLED = \"Unknown\"
\tLIT ChassisV1140IndicatorLED = \"Lit\"
)
";

    #[test]
    fn test_type_name_and_suffix() {
        let ln = "type Chassis_v1_14_0_IndicatorLED string";
        assert_eq!(make_type_name(ln), "ChassisV1140IndicatorLED");
        assert_eq!(make_type_suffix(ln), "CV1140ILED");
    }

    #[test]
    fn test_state_suffix_disambiguated() {
        let ln = "type Resource_v1_0_0_PowerState string";
        assert_eq!(make_type_suffix(ln), "RV100PST");
    }

    #[test]
    fn test_const_line_detection() {
        assert!(is_const_line("\tUNKNOWN ChassisV1140IndicatorLED = \"Unknown\""));
        assert!(is_const_line("\t_2_5 ProtocolV110Version = \"2.5\""));
        assert!(!is_const_line("// List of things"));
        assert!(!is_const_line("type Foo string"));
    }

    #[test]
    fn test_patch_enums_rewrites_type_and_constants() {
        let (patched, rename) = patch_enums(GENERATED);

        assert!(patched.contains("type ChassisV1140IndicatorLED string"));
        assert!(patched.contains("UNKNOWN_CV1140ILED ChassisV1140IndicatorLED = \"Unknown\""));
        assert!(patched.contains("LIT_CV1140ILED ChassisV1140IndicatorLED = \"Lit\""));

        let (src, dst) = rename.unwrap();
        assert_eq!(src, "ChassisV1140IndicatorLED");
        assert_eq!(dst, "ChassisV1140IndicatorLED");
    }

    #[test]
    fn test_patch_enums_idempotent() {
        let (first, _) = patch_enums(GENERATED);
        let (second, rename) = patch_enums(&first);
        assert_eq!(first, second);
        assert!(rename.is_none());
    }

    #[test]
    fn test_run_propagates_rename() {
        let dir = tempfile::tempdir().unwrap();
        let enum_file = dir.path().join("model_chassis.go");
        let user_file = dir.path().join("model_system.go");

        std::fs::write(
            &enum_file,
            "type Chassis_v1_14_0_PowerState string\n\
             const (\n\
             \tON ChassisV1140PowerState = \"On\"\n\
             )\n",
        )
        .unwrap();
        std::fs::write(&user_file, "var x ChassisV1140PowerState\n").unwrap();

        run(dir.path()).unwrap();

        let patched = std::fs::read_to_string(&enum_file).unwrap();
        assert!(patched.contains("type ChassisV1140PowerState string"));
        assert!(patched.contains("ON_CV1140PST ChassisV1140PowerState = \"On\""));

        // Other files keep referencing the (unchanged) camel name.
        let user = std::fs::read_to_string(&user_file).unwrap();
        assert!(user.contains("ChassisV1140PowerState"));
    }
}
