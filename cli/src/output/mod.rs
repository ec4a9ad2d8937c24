//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;

use crate::application::services::provision::ProvisionReport;
use crate::domain::{BoxId, JiffyBox};

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether stdout is reserved for JSON documents; messages go to stderr.
    pub json: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool, json: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && !json && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
            json,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet && !self.json
    }

    /// Print a status line, to stderr in JSON mode. Suppressed when `quiet`.
    pub(crate) fn line(&self, line: &str) {
        if self.quiet {
            return;
        }
        if self.json {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        self.line(&format!("  {} {msg}", "✓".style(self.styles.success)));
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        self.line(&format!("  {} {msg}", "⚠".style(self.styles.warning)));
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        self.line(&format!("  {} {msg}", "ℹ".style(self.styles.info)));
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        self.line(&format!("  {}", msg.style(self.styles.header)));
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        self.line(&format!("  {:<14} {value}", key.style(self.styles.dim)));
    }
}

/// Renderer for the active output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_box_list(&self, boxes: &[JiffyBox]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_box_list(boxes);
                Ok(())
            }
            Self::Json(r) => r.render_box_list(boxes),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_box(&self, b: &JiffyBox) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_box(b);
                Ok(())
            }
            Self::Json(r) => r.render_box(b),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_catalog(&self, title: &str, result: &serde_json::Value) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_catalog(title, result);
                Ok(())
            }
            Self::Json(r) => r.render_catalog(result),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_selection(&self, b: &JiffyBox, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_selection(b, path);
                Ok(())
            }
            Self::Json(r) => r.render_selection(b, path),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_provision_report(
        &self,
        created: &JiffyBox,
        report: &ProvisionReport,
        torn_down: bool,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_provision_report(report);
                Ok(())
            }
            Self::Json(r) => r.render_provision_report(created, report, torn_down),
        }
    }

    /// Report a finished action without a result document of its own.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_done(&self, id: BoxId, action: &str, message: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_done(message);
                Ok(())
            }
            Self::Json(r) => r.render_done(id, action),
        }
    }
}
