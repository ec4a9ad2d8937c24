//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout: the command's result on success, the error object on failure.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::provision::ProvisionReport;
use crate::domain::{BoxId, JiffyBox};

/// Format the JSON error object printed when a command fails.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Print `value` as a pretty-printed JSON document on stdout.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let doc = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{doc}");
    Ok(())
}

/// Renders command results as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_box_list(&self, boxes: &[JiffyBox]) -> Result<()> {
        print(boxes)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_box(&self, b: &JiffyBox) -> Result<()> {
        print(b)
    }

    /// Catalog listings are printed as the API returned them.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_catalog(&self, result: &serde_json::Value) -> Result<()> {
        print(result)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_selection(&self, b: &JiffyBox, path: &Path) -> Result<()> {
        print(&serde_json::json!({
            "id": b.id,
            "address": b.public_address(),
            "path": path.display().to_string(),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_provision_report(
        &self,
        created: &JiffyBox,
        report: &ProvisionReport,
        torn_down: bool,
    ) -> Result<()> {
        print(&serde_json::json!({
            "box": created,
            "provision": report,
            "torn_down": torn_down,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_done(&self, id: BoxId, action: &str) -> Result<()> {
        print(&serde_json::json!({ "id": id, "action": action, "ok": true }))
    }
}
