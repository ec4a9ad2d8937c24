//! Preset naming rules.
//!
//! A preset `web` is the script file `install_web` in the scripts directory.

use std::path::PathBuf;

use crate::domain::error::JiffyError;

pub const SCRIPT_PREFIX: &str = "install_";

/// Preset that always runs before the requested ones.
pub const IMPLICIT_PRESET: &str = "all";

/// A preset resolved to its script file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetScript {
    pub name: String,
    pub path: PathBuf,
}

impl PresetScript {
    /// File name of the script, also used as its remote name.
    #[must_use]
    pub fn file_name(&self) -> String {
        script_file_name(&self.name)
    }
}

/// Exact file name a preset resolves to.
#[must_use]
pub fn script_file_name(name: &str) -> String {
    format!("{SCRIPT_PREFIX}{name}")
}

/// Rejects names that could escape the scripts directory.
///
/// # Errors
///
/// Returns `JiffyError::Configuration` for empty names or names containing
/// path separators.
pub fn validate_preset_name(name: &str) -> Result<(), JiffyError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(JiffyError::Configuration(format!(
            "invalid preset name '{name}'"
        )));
    }
    Ok(())
}

/// Execution order: the implicit preset first, then the requested names.
///
/// An explicit request for the implicit preset is not run a second time.
#[must_use]
pub fn run_order(requested: &[String]) -> Vec<String> {
    std::iter::once(IMPLICIT_PRESET.to_string())
        .chain(
            requested
                .iter()
                .filter(|n| n.as_str() != IMPLICIT_PRESET)
                .cloned(),
        )
        .collect()
}
