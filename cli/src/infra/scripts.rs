//! Local scripts directory implementing the `ScriptCatalog` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ScriptCatalog;

pub struct LocalScriptsDir {
    root: PathBuf,
}

impl LocalScriptsDir {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ScriptCatalog for LocalScriptsDir {
    /// Matches directory entries by exact name, so `install_web` never
    /// resolves to `install_web.bak` or a differently cased file.
    fn find(&self, file_name: &str) -> Result<Option<PathBuf>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %self.root.display(), "scripts directory missing");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", self.root.display()));
            }
        };
        for entry in entries {
            let entry = entry.with_context(|| format!("cannot read {}", self.root.display()))?;
            if entry.file_name() == file_name && entry.path().is_file() {
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }
}
