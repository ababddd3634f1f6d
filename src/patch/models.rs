//! Package qualifier for generated model references
//!
//! The hand-maintained service implementation files reference generated
//! model types bare, e.g.
//!
//! ```text
//! RedfishV1AccountServiceAccountsPost(ManagerAccountV162ManagerAccount) (interface{}, error)
//! certificateV121RenewRequestBody := &CertificateV121RenewRequestBody{}
//! ```
//!
//! after regeneration those types live in the models package, so every
//! bare reference gains an `openapi.` prefix and the models import is
//! injected into import blocks that lack it.

use crate::error::Result;
use crate::patch::files_in;
use std::path::Path;

/// Default import path of the generated models package.
pub const DEFAULT_MODELS_IMPORT: &str = "github.com/swordctl/rfsf/pkg/models";

/// Qualify every upper-case token of interest on the line.
fn patch_tokens(ln: &str, tokens: &[&str]) -> String {
    let mut line = ln.to_string();
    for token in tokens {
        if token.chars().next().is_some_and(|c| c.is_uppercase()) {
            let qualified = format!("openapi.{token}");
            // Tokens can repeat across the declaration; qualify once.
            if !line.contains(&qualified) {
                line = line.replace(token, &qualified);
            }
        }
    }
    line
}

/// Method declarations on the servicer interface, e.g.
/// `RedfishV1AccountServiceAccountsPost(ManagerAccountV162ManagerAccount) (interface{}, error)`.
fn patch_declare(ln: &str) -> String {
    let stripped = ln.trim();
    let mut tokens: Vec<&str> = Vec::new();
    if let Some((_, rest)) = stripped.split_once('(') {
        tokens.push(rest);
    }
    tokens.extend(stripped.split_whitespace().skip(1));
    patch_tokens(ln, &tokens)
}

/// Method implementations on the default service, e.g.
/// `func (s *DefaultApiService) RedfishV1...Post(id string, body ManagerAccountV162ManagerAccount)`.
fn patch_function(ln: &str) -> String {
    if ln.contains("()") {
        return ln.to_string();
    }
    // Parameter-list tail after the receiver and method name, plus the
    // alternating parameter types.
    let mut tokens: Vec<&str> = Vec::new();
    if let Some(tail) = ln.splitn(3, '(').nth(2) {
        tokens.extend(tail.split_whitespace().skip(1));
    }
    tokens.extend(ln.trim_end().split_whitespace().skip(6).step_by(2));
    patch_tokens(ln, &tokens)
}

/// Zero-value constructions, e.g.
/// `certificateV121RenewRequestBody := &CertificateV121RenewRequestBody{}`.
fn patch_variable(ln: &str) -> String {
    let Some(var) = ln.trim_start().split_whitespace().next() else {
        return ln.to_string();
    };
    if var == "body" {
        return ln.to_string();
    }

    let Some(last) = ln.trim_end().split_whitespace().last() else {
        return ln.to_string();
    };
    let type_name = last
        .trim_start_matches('&')
        .trim_end_matches(|c| c == '{' || c == '}');

    // Only the `typeName := &TypeName{}` idiom is rewritten.
    if var.to_lowercase() != type_name.to_lowercase() {
        return ln.to_string();
    }
    if type_name.starts_with("openapi.") {
        return ln.to_string();
    }
    ln.replace(type_name, &format!("openapi.{type_name}"))
}

/// Patch one file's content, qualifying model references and injecting
/// the models import where missing.
pub(crate) fn patch_source(content: &str, import_path: &str) -> String {
    let mut lines = Vec::new();
    let mut in_import = false;

    for ln in content.lines() {
        let mut line = ln.to_string();

        if ln.trim_start().starts_with("RedfishV1") {
            line = patch_declare(ln);
        } else if ln.starts_with("func (s *DefaultApiService) RedfishV1") {
            line = patch_function(ln);
        } else if ln.ends_with("{}") {
            line = patch_variable(ln);
        } else if ln.trim() == "import (" {
            in_import = true;
        } else if in_import {
            if ln.contains("openapi") {
                in_import = false;
            } else if ln.trim() == ")" {
                line = format!("\topenapi \"{import_path}\"\n{ln}");
                in_import = false;
            }
        }
        lines.push(line);
    }

    let mut patched = lines.join("\n");
    if content.ends_with('\n') {
        patched.push('\n');
    }
    patched
}

/// Patch the files under `dir`, optionally restricted to one file name.
pub fn run(dir: &Path, only: Option<&str>, import_path: &str) -> Result<()> {
    for path in files_in(dir)? {
        if let Some(only) = only {
            if path.file_name().and_then(|n| n.to_str()) != Some(only) {
                continue;
            }
        }
        let content = std::fs::read_to_string(&path)?;
        std::fs::write(&path, patch_source(&content, import_path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_qualified() {
        let ln = "\tRedfishV1AccountServiceAccountsPost(ManagerAccountV162ManagerAccount) (interface{}, error)";
        let patched = patch_declare(ln);
        assert!(patched.contains("(openapi.ManagerAccountV162ManagerAccount)"));
    }

    #[test]
    fn test_declare_with_id_parameter() {
        let ln = "\tRedfishV1AccountServiceAccountsManagerAccountIdPut(string, ManagerAccountV162ManagerAccount) (interface{}, error)";
        let patched = patch_declare(ln);
        assert!(patched.contains("openapi.ManagerAccountV162ManagerAccount"));
        // lowercase builtin stays bare
        assert!(!patched.contains("openapi.string"));
    }

    #[test]
    fn test_function_signature_qualified() {
        let ln = "func (s *DefaultApiService) RedfishV1AccountServiceAccountsManagerAccountIdPatch(managerAccountId string, managerAccountV162ManagerAccount ManagerAccountV162ManagerAccount) (interface{}, error) {";
        let patched = patch_function(ln);
        assert!(patched.contains("managerAccountV162ManagerAccount openapi.ManagerAccountV162ManagerAccount"));
    }

    #[test]
    fn test_function_without_params_untouched() {
        let ln = "func (s *DefaultApiService) RedfishV1AccountServiceGet() (interface{}, error) {";
        assert_eq!(patch_function(ln), ln);
    }

    #[test]
    fn test_variable_construction_qualified() {
        let ln = "\tcertificateV121RenewRequestBody := &CertificateV121RenewRequestBody{}";
        let patched = patch_variable(ln);
        assert!(patched.contains(":= &openapi.CertificateV121RenewRequestBody{}"));
    }

    #[test]
    fn test_variable_already_qualified_untouched() {
        let ln = "\tcertificateV121RenewRequestBody := &openapi.CertificateV121RenewRequestBody{}";
        assert_eq!(patch_variable(ln), ln);
    }

    #[test]
    fn test_variable_body_untouched() {
        let ln = "\tbody := &RekeyRequestBody{}";
        assert_eq!(patch_variable(ln), ln);
    }

    #[test]
    fn test_variable_mismatched_name_untouched() {
        let ln = "\tresult := &SomethingElse{}";
        assert_eq!(patch_variable(ln), ln);
    }

    #[test]
    fn test_import_injection() {
        let src = "package service\n\nimport (\n\t\"net/http\"\n)\n";
        let patched = patch_source(src, DEFAULT_MODELS_IMPORT);
        assert!(patched.contains(&format!("\topenapi \"{DEFAULT_MODELS_IMPORT}\"\n)")));
    }

    #[test]
    fn test_import_present_untouched() {
        let src = "package service\n\nimport (\n\topenapi \"x/models\"\n)\n";
        let patched = patch_source(src, DEFAULT_MODELS_IMPORT);
        assert_eq!(patched, src);
    }
}
