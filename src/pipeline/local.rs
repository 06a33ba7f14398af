//! Server-side inputs read from the configured local directory.

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::PipelineError;

/// Resolve `relative` inside `root`, refusing anything that could leave it.
pub fn resolve(root: Option<&Path>, relative: &str) -> Result<PathBuf, PipelineError> {
    let root = root.ok_or_else(|| {
        PipelineError::validation("Local files are not enabled on this server (set SAGE_LOCAL_DIR)")
    })?;

    let path = Path::new(relative.trim());
    let escapes = path.as_os_str().is_empty()
        || path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(PipelineError::validation(format!(
            "Local path must be relative to the local directory: {relative}"
        )));
    }

    Ok(root.join(path))
}

pub async fn read_transcript(root: Option<&Path>, relative: &str) -> Result<String, PipelineError> {
    let path = resolve(root, relative)?;
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| PipelineError::validation(format!("Cannot read local transcript {relative}: {e}")))
}

/// Read a local PDF as bare base64.
pub async fn read_document(root: Option<&Path>, relative: &str) -> Result<String, PipelineError> {
    let path = resolve(root, relative)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| PipelineError::validation(format!("Cannot read local file {relative}: {e}")))?;
    Ok(STANDARD.encode(bytes))
}
