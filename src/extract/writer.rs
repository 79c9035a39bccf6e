//! Result rendering and collision-safe output writing

use crate::error::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Render an extraction payload to the text that gets persisted.
///
/// Objects are pretty-printed with 2-space indentation; serde_json keeps
/// key order stable and leaves non-ASCII characters unescaped. A bare
/// string is written as-is, anything else as its compact JSON form.
pub fn render_payload(data: &Value) -> String {
    match data {
        Value::Object(_) => serde_json::to_string_pretty(data).unwrap_or_default(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Find a free output path for `base_name` under `dir`.
///
/// Starts at `<base_name>.txt` and appends `_1`, `_2`, ... until the name
/// is free. Probes the live filesystem on every step so files written
/// earlier in the same batch are respected.
pub fn reserve_output_path(dir: &Path, base_name: &str) -> PathBuf {
    let mut target = dir.join(format!("{base_name}.txt"));
    let mut counter = 1;
    while target.exists() {
        target = dir.join(format!("{base_name}_{counter}.txt"));
        counter += 1;
    }
    target
}

/// Write rendered text for `source` into `dir`, never overwriting an
/// existing file. Returns the base name of the file actually written.
pub fn write_result(dir: &Path, source: &Path, text: &str) -> Result<String> {
    let base_name = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    let target = reserve_output_path(dir, &base_name);
    std::fs::write(&target, text)?;

    Ok(target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default())
}
