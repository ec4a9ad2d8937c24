//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::{ApiResponse, BoxId, CreateSpec, JiffyConfig, Transition};

// ── Value Types ───────────────────────────────────────────────────────────────

/// One multiplexed remote-shell channel to a box, valid for a single
/// provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteShellSession {
    /// Public address of the box.
    pub address: String,
    /// Login user.
    pub user: String,
    pub port: u16,
    /// Control socket shared by every command of the run.
    pub control_path: PathBuf,
    /// Directory on the box scripts are staged in.
    pub remote_dir: String,
}

impl RemoteShellSession {
    /// `user@address` destination.
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.address)
    }
}

// ── Remote API Port ───────────────────────────────────────────────────────────

/// JiffyBox hosting API.
///
/// Implementations fail with `JiffyError::Transport` for connection problems
/// and `JiffyError::Api` for non-2xx replies; a parsed reply is returned as is.
#[allow(async_fn_in_trait)]
pub trait BoxApi {
    async fn list_boxes(&self) -> Result<ApiResponse>;
    async fn get_box(&self, id: BoxId) -> Result<ApiResponse>;
    async fn create_box(&self, spec: &CreateSpec) -> Result<ApiResponse>;
    /// Send `status=<ACTION>` to the box.
    async fn transition_box(&self, id: BoxId, action: Transition) -> Result<ApiResponse>;
    async fn delete_box(&self, id: BoxId) -> Result<ApiResponse>;
    async fn list_plans(&self) -> Result<ApiResponse>;
    async fn list_distributions(&self) -> Result<ApiResponse>;
}

// ── Remote Shell Port ─────────────────────────────────────────────────────────

/// Authenticated remote-command channel to a box.
#[allow(async_fn_in_trait)]
pub trait ShellRunner {
    /// Open the background master connection all later calls reuse.
    async fn open_master(&self, session: &RemoteShellSession) -> Result<Output>;
    /// Run a shell command on the box and capture its output.
    async fn exec(&self, session: &RemoteShellSession, command: &str) -> Result<Output>;
    /// Run a shell command on the box with its output streamed to the terminal.
    async fn exec_streamed(&self, session: &RemoteShellSession, command: &str)
    -> Result<ExitStatus>;
    /// Copy a local file to `remote` on the box.
    async fn upload(&self, session: &RemoteShellSession, local: &Path, remote: &str)
    -> Result<Output>;
    /// Ask the master connection to exit.
    async fn close_master(&self, session: &RemoteShellSession) -> Result<Output>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with its output streamed to stderr and return only its
    /// exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Local Files Ports ─────────────────────────────────────────────────────────

/// Abstracts config file I/O so services and commands can be tested without
/// touching the filesystem.
pub trait ConfigStore {
    /// Load the config file, or an empty config if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<JiffyConfig>;
    /// Location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

/// Local directory of `install_<preset>` scripts.
pub trait ScriptCatalog {
    /// Path of the file named exactly `file_name`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    fn find(&self, file_name: &str) -> Result<Option<PathBuf>>;
}

/// Persists the address of the selected box for other tooling.
pub trait SelectionStore {
    /// Write `address` and return the file it was written to.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, address: &str) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
