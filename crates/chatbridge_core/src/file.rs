use std::path::{Path, PathBuf};

use crate::error::{BridgeError, Result};

/// A repository-relative file reference. Content is read lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: String,
    fs_path: PathBuf,
}

impl FileRef {
    pub fn new(path: impl Into<String>, repo_root: impl AsRef<Path>) -> Self {
        let path = path.into();
        let fs_path = repo_root.as_ref().join(&path);
        Self { path, fs_path }
    }

    /// Path relative to the repository root, as supplied by the host.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn fs_path(&self) -> &Path {
        &self.fs_path
    }

    /// Extension including the leading dot, or an empty string.
    pub fn suffix(&self) -> String {
        self.fs_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default()
    }

    pub fn exists(&self) -> bool {
        self.fs_path.is_file()
    }

    pub fn read_content(&self) -> Result<String> {
        std::fs::read_to_string(&self.fs_path)
            .map_err(|e| BridgeError::file_unavailable(&self.path, e))
    }
}
