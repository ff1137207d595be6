use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::{ToolError, ToolKind};

/// Resolve `path` against the browse root; the result must stay under it
pub fn resolve_path(root: &Path, path: &str) -> Result<PathBuf, ToolError> {
    let unreadable = |e: std::io::Error| ToolError::Invocation {
        tool: ToolKind::GetFileContents.name(),
        message: format!("Failed to read file '{}': {}", path, e),
    };

    let root = root.canonicalize().map_err(unreadable)?;
    let resolved = root.join(path).canonicalize().map_err(unreadable)?;
    if !resolved.starts_with(&root) {
        return Err(ToolError::InvalidParameter {
            tool: ToolKind::GetFileContents.name(),
            parameter: "file".to_string(),
            reason: format!("'{}' is outside {}", path, root.display()),
        });
    }
    Ok(resolved)
}

/// Read a file's text contents. The `file` field echoes the path as requested.
pub fn get_file_contents(root: &Path, file: &str) -> Result<Value, ToolError> {
    let resolved = resolve_path(root, file)?;
    match fs::read_to_string(&resolved) {
        Ok(contents) => Ok(json!({
            "file": file,
            "contents": contents,
        })),
        Err(e) => Err(ToolError::Invocation {
            tool: ToolKind::GetFileContents.name(),
            message: format!("Failed to read file '{}': {}", file, e),
        }),
    }
}
