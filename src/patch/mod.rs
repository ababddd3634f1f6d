//! Build-time patchers for the OpenAPI-generated server stub
//!
//! Independent line-oriented text filters run once during the build
//! pipeline against the code generator's output. They correct known
//! generator defects by string matching: no parsing, no transactional
//! guarantee. A failure leaves the generated sources partially patched,
//! which is acceptable because they are disposable, regenerable build
//! artifacts.

pub mod constants;
pub mod models;
pub mod platform;
pub mod yaml;

use crate::error::{Error, Result};
use std::path::Path;

/// Wrap a per-line failure with its file and 1-based line number.
pub(crate) fn at_line(path: &Path, line: usize, reason: impl Into<String>) -> Error {
    Error::Patch {
        file: path.display().to_string(),
        line,
        reason: reason.into(),
    }
}

/// List the regular files directly under a directory, the way the
/// generator drops its output: one flat directory of sources.
pub(crate) fn files_in(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
