//! File-backed `SelectionStore`: the selected box's address in `~/.jiffyi/selected`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::SelectionStore;

/// Environment variable overriding the selection file location.
pub const SELECTED_ENV: &str = "JIFFY_SELECTED";

pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at `$JIFFY_SELECTED`, falling back to `~/.jiffyi/selected`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        if let Ok(val) = std::env::var(SELECTED_ENV) {
            return Ok(Self::new(PathBuf::from(val)));
        }
        Ok(Self::new(state_dir()?.join("selected")))
    }
}

impl SelectionStore for FileSelectionStore {
    fn save(&self, address: &str) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        std::fs::write(&self.path, address)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        Ok(self.path.clone())
    }
}

/// `~/.jiffyi`, home of the selection file and ssh control sockets.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn state_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".jiffyi"))
}
