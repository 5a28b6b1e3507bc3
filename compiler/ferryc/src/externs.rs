//! Placement of auxiliary extern files.
//!
//! An extern file implements a module the program only declares. It names
//! that module on a marker line (the backend's [`Backend::extern_marker`])
//! and is copied to `<out>/<module>.<ext>` so generated imports find it.

use std::fs;
use std::path::{Path, PathBuf};

use ferry_codegen::{Backend, CodegenError};
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::DriverError;

/// One extern file and where it was copied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedExtern {
    pub source: PathBuf,
    pub module: String,
    pub target: PathBuf,
}

/// The module named by the first marker line in `contents`, if any.
pub fn module_name_of<'a>(marker: &Regex, contents: &'a str) -> Option<&'a str> {
    contents
        .lines()
        .find_map(|line| marker.captures(line)?.get(1))
        .map(|m| m.as_str())
}

/// Validate every extern file, then copy each into `out`.
///
/// Nothing is written unless all files have the target extension and a
/// marker line.
#[instrument(level = "debug", skip_all, fields(count = files.len()))]
pub fn place_externs<B: Backend>(
    backend: &B,
    files: &[PathBuf],
    out: &Path,
) -> Result<Vec<PlacedExtern>, DriverError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }
    let marker = Regex::new(backend.extern_marker())
        .map_err(|e| CodegenError::internal(format!("invalid extern marker pattern: {e}")))?;
    let ext = backend.file_extension();

    let mut placed = Vec::with_capacity(files.len());
    for path in files {
        if path.extension().and_then(|e| e.to_str()) != Some(ext) {
            return Err(DriverError::UnrecognizedExternFile { path: path.clone() });
        }
        let contents = fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
        let Some(module) = module_name_of(&marker, &contents) else {
            return Err(DriverError::MissingModuleMarker { path: path.clone() });
        };
        debug!(file = %path.display(), module, "extern module");
        placed.push(PlacedExtern {
            source: path.clone(),
            module: module.to_string(),
            target: out.join(format!("{module}.{ext}")),
        });
    }

    for file in &placed {
        fs::copy(&file.source, &file.target).map_err(|e| DriverError::io(&file.target, e))?;
        info!(
            "additional input {} copied to {}",
            file.source.display(),
            file.target.display()
        );
    }
    Ok(placed)
}
