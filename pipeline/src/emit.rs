//! File emission helpers.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{PipelineError, Result};

/// Writes `contents` to `out_dir/rel_path`, creating parent directories.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns [`PipelineError::UnsafePath`] if `rel_path` is absolute or climbs
/// out of `out_dir`, or [`PipelineError::Io`] if a directory or the file
/// cannot be written.
pub fn emit_file(out_dir: &Path, rel_path: &str, contents: &[u8]) -> Result<PathBuf> {
    let rel = Path::new(rel_path);
    let escapes = rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || rel_path.is_empty() {
        return Err(PipelineError::UnsafePath(rel_path.to_string()));
    }

    let path = out_dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| PipelineError::io("creating directory", parent, e))?;
    }
    std::fs::write(&path, contents).map_err(|e| PipelineError::io("writing file", &path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(path)
}

/// Removes `dir` and everything under it. A missing directory is not an error.
pub fn clear_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::io("deleting directory", dir, e)),
    }
}
