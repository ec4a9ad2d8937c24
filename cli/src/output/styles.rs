//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

use crate::domain::BoxStatus;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Success messages and running boxes (green)
    pub success: Style,
    /// Warnings and boxes in transition (yellow)
    pub warning: Style,
    /// Error messages and vanished boxes (red)
    pub error: Style,
    /// Info messages (blue)
    pub info: Style,
    /// Dimmed/secondary text
    pub dim: Style,
    pub bold: Style,
    /// Headers/section titles
    pub header: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }

    /// Style for a box's status column.
    #[must_use]
    pub fn status(&self, status: &BoxStatus, running: bool) -> Style {
        match status {
            BoxStatus::Ready if running => self.success,
            BoxStatus::Ready => self.dim,
            BoxStatus::Creating | BoxStatus::Updating | BoxStatus::Stopping => self.warning,
            BoxStatus::Deleting | BoxStatus::Deleted | BoxStatus::Unknown(_) => self.error,
        }
    }
}
