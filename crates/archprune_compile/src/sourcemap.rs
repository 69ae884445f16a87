//! Post-emit processing of emitted code and its source map.
//!
//! The host serves source maps out-of-band and cannot serve the original
//! sources, so the reference comment is removed from the code and every
//! source text is embedded in the map.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::adapter::read_to_string;
use crate::error::CompileError;

const SOURCE_MAP_MARKER: &str = "//# sourceMappingURL=";

/// Removes the first `//# sourceMappingURL=` comment, up to its line end.
///
/// The line terminator itself is kept.
pub fn strip_source_map_reference(emitted: &str) -> String {
    let Some(start) = emitted.find(SOURCE_MAP_MARKER) else {
        return emitted.to_string();
    };
    let end = emitted[start..]
        .find(['\r', '\n'])
        .map_or(emitted.len(), |offset| start + offset);
    let mut out = String::with_capacity(emitted.len() - (end - start));
    out.push_str(&emitted[..start]);
    out.push_str(&emitted[end..]);
    out
}

/// Rewrites the map's `file` to `output_name` and fills `sourcesContent`
/// with the text of every entry in `sources`, read relative to `base`.
pub fn embed_sources(
    source_map: &str,
    output_name: &str,
    base: &Path,
) -> Result<String, CompileError> {
    let mut map: Value = serde_json::from_str(source_map).map_err(|e| CompileError::SourceMap {
        reason: e.to_string(),
    })?;
    let object = map.as_object_mut().ok_or_else(|| CompileError::SourceMap {
        reason: "top level is not an object".to_string(),
    })?;

    let sources = object
        .get("sources")
        .and_then(Value::as_array)
        .ok_or_else(|| CompileError::SourceMap {
            reason: "missing `sources` array".to_string(),
        })?;

    let mut contents = Vec::with_capacity(sources.len());
    for source in sources {
        let relative = source.as_str().ok_or_else(|| CompileError::SourceMap {
            reason: format!("non-string entry in `sources`: {source}"),
        })?;
        let path = normalize_lexically(&base.join(relative));
        contents.push(Value::String(read_to_string(&path)?));
    }

    object.insert("file".to_string(), Value::String(output_name.to_string()));
    object.insert("sourcesContent".to_string(), Value::Array(contents));

    serde_json::to_string(&map).map_err(|e| CompileError::SourceMap {
        reason: e.to_string(),
    })
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `base` may be a directory that no longer exists by the time the map is
/// processed, so the OS cannot be asked to walk through it.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
