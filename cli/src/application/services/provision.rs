//! Provisioning pipeline: stage preset scripts on a box and run them over one
//! multiplexed remote-shell channel.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, RemoteShellSession, ScriptCatalog, ShellRunner};
use crate::domain::JiffyError;
use crate::domain::config::SshSettings;
use crate::domain::preset::{
    IMPLICIT_PRESET, PresetScript, run_order, script_file_name, validate_preset_name,
};

/// Pause before the first connection, giving a fresh box time to start sshd.
pub const WARM_UP: Duration = Duration::from_secs(10);
/// Pause after opening the master connection before reusing it.
pub const MASTER_SETTLE: Duration = Duration::from_secs(5);

/// Outcome of one provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProvisionReport {
    pub address: String,
    /// Presets whose scripts ran, in order.
    pub executed: Vec<String>,
    /// Requested presets without a script.
    pub skipped: Vec<String>,
}

pub struct ProvisioningPipeline<'a, S: ShellRunner, C: ScriptCatalog, P: ProgressReporter> {
    shell: &'a S,
    scripts: &'a C,
    reporter: &'a P,
    ssh: SshSettings,
    control_dir: PathBuf,
}

impl<'a, S: ShellRunner, C: ScriptCatalog, P: ProgressReporter> ProvisioningPipeline<'a, S, C, P> {
    /// `control_dir` holds the control sockets of master connections.
    #[must_use]
    pub fn new(
        shell: &'a S,
        scripts: &'a C,
        reporter: &'a P,
        ssh: SshSettings,
        control_dir: PathBuf,
    ) -> Self {
        Self {
            shell,
            scripts,
            reporter,
            ssh,
            control_dir,
        }
    }

    /// Session parameters for `address`, without connecting.
    #[must_use]
    pub fn session(&self, address: &str) -> RemoteShellSession {
        RemoteShellSession {
            address: address.to_string(),
            user: self.ssh.user.clone(),
            port: self.ssh.port,
            control_path: self
                .control_dir
                .join(format!("cm-{}@{address}:{}", self.ssh.user, self.ssh.port)),
            remote_dir: self.ssh.remote_dir.clone(),
        }
    }

    /// Open the master connection to `address` and create the staging directory.
    ///
    /// # Errors
    ///
    /// Fails with `Configuration` when the box has no public address yet and
    /// with `RemoteExecution` when the connection or the staging directory
    /// cannot be set up.
    pub async fn prepare_channel(&self, address: Option<&str>) -> Result<RemoteShellSession> {
        let address = address.ok_or_else(|| {
            JiffyError::Configuration("JiffyBox has no public address yet".to_string())
        })?;
        let session = self.session(address);

        self.reporter.step(&format!(
            "waiting {}s for {address} to accept connections...",
            WARM_UP.as_secs()
        ));
        tokio::time::sleep(WARM_UP).await;

        self.reporter
            .step(&format!("opening ssh master connection to {}...", session.destination()));
        let opened = self
            .shell
            .open_master(&session)
            .await
            .context("spawning ssh master connection")?;
        ensure_success(&opened, "opening ssh master connection", address)?;

        // the master is backgrounded and outlives us unless closed
        if let Err(e) = self.stage(&session).await {
            self.close(&session).await;
            return Err(e);
        }

        tracing::info!(address, control_path = %session.control_path.display(), "remote shell ready");
        Ok(session)
    }

    async fn stage(&self, session: &RemoteShellSession) -> Result<()> {
        tokio::time::sleep(MASTER_SETTLE).await;
        let mkdir = self
            .shell
            .exec(session, &format!("mkdir -p {}", quote(&session.remote_dir)))
            .await
            .context("creating staging directory")?;
        ensure_success(&mkdir, "creating staging directory", &session.address)?;
        Ok(())
    }

    /// Find the script of preset `name`, if the scripts directory has one.
    ///
    /// Names that could escape the scripts directory never match.
    ///
    /// # Errors
    ///
    /// Fails when the scripts directory cannot be read.
    pub fn resolve_preset(&self, name: &str) -> Result<Option<PresetScript>> {
        if let Err(e) = validate_preset_name(name) {
            tracing::debug!(name, error = %e, "preset name cannot match a script");
            return Ok(None);
        }
        let found = self.scripts.find(&script_file_name(name))?;
        Ok(found.map(|path| PresetScript {
            name: name.to_string(),
            path,
        }))
    }

    /// Upload `script` to the staging directory and run it, streaming its output.
    ///
    /// # Errors
    ///
    /// Fails with `RemoteExecution` when the upload fails or the script exits
    /// non-zero.
    pub async fn run_preset(&self, session: &RemoteShellSession, script: &PresetScript) -> Result<()> {
        let remote = format!("{}/{}", session.remote_dir, script.file_name());
        let step = format!("preset '{}'", script.name);

        let copied = self
            .shell
            .upload(session, &script.path, &remote)
            .await
            .with_context(|| format!("uploading {}", script.path.display()))?;
        ensure_success(&copied, &format!("uploading {step}"), &session.address)?;

        let target = quote(&remote);
        let command = format!("sh -c {}", quote(&format!("chmod +x {target} && {target}")));
        let status = self
            .shell
            .exec_streamed(session, &command)
            .await
            .with_context(|| format!("running {step}"))?;
        if !status.success() {
            return Err(JiffyError::RemoteExecution {
                step,
                address: session.address.clone(),
                detail: format!("script {status}"),
            }
            .into());
        }
        Ok(())
    }

    /// Run `all` followed by each requested preset, skipping those without a script.
    ///
    /// # Errors
    ///
    /// Stops at the first preset that fails; see [`Self::run_preset`].
    pub async fn run(&self, session: &RemoteShellSession, requested: &[String]) -> Result<ProvisionReport> {
        let explicit_all = requested.iter().any(|n| n == IMPLICIT_PRESET);
        let mut report = ProvisionReport {
            address: session.address.clone(),
            ..ProvisionReport::default()
        };

        for name in run_order(requested) {
            let Some(script) = self.resolve_preset(&name)? else {
                if name != IMPLICIT_PRESET || explicit_all {
                    self.reporter.warn(&format!(
                        "no script {} for preset '{name}', skipping",
                        script_file_name(&name)
                    ));
                    report.skipped.push(name);
                } else {
                    tracing::debug!("no {} script, nothing to run first", script_file_name(&name));
                }
                continue;
            };
            self.reporter.step(&format!("running preset '{name}'..."));
            self.run_preset(session, &script).await?;
            self.reporter.success(&format!("preset '{name}' finished"));
            report.executed.push(name);
        }
        Ok(report)
    }

    /// Close the master connection. Failures are only logged.
    pub async fn close(&self, session: &RemoteShellSession) {
        match self.shell.close_master(session).await {
            Ok(out) if out.status.success() => {
                tracing::debug!(address = %session.address, "ssh master closed");
            }
            Ok(out) => tracing::warn!(
                address = %session.address,
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "ssh master did not exit cleanly"
            ),
            Err(e) => tracing::warn!(address = %session.address, error = %e, "closing ssh master"),
        }
    }
}

fn ensure_success(output: &Output, step: &str, address: &str) -> Result<(), JiffyError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = match stderr.trim() {
        "" => format!("exited with {}", output.status),
        msg => msg.to_string(),
    };
    Err(JiffyError::RemoteExecution {
        step: step.to_string(),
        address: address.to_string(),
        detail,
    })
}

/// Single-quote `s` for a POSIX shell.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
