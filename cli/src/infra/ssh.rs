//! OpenSSH implementation of the `ShellRunner` port.
//!
//! Every call of a session goes through one master connection identified by
//! its control socket (`ControlMaster`/`ControlPath`), so the box sees a
//! single login per provisioning run.

use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, RemoteShellSession, ShellRunner};

/// How long an idle master connection outlives its last client.
pub const CONTROL_PERSIST: Duration = Duration::from_secs(600);

/// Budget for authenticating and backgrounding the master.
pub const MASTER_TIMEOUT: Duration = Duration::from_secs(60);

pub struct OpenSsh<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> OpenSsh<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

/// Options shared by the master and its clients.
fn control_opts(session: &RemoteShellSession) -> Vec<String> {
    vec![
        "-o".to_string(),
        format!("ControlPath={}", session.control_path.display()),
        "-o".to_string(),
        format!("ControlPersist={}", CONTROL_PERSIST.as_secs()),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=accept-new".to_string(),
    ]
}

/// Client options: reuse the master, or fall back to a direct connection.
fn client_opts(session: &RemoteShellSession) -> Vec<String> {
    let mut args = vec!["-o".to_string(), "ControlMaster=auto".to_string()];
    args.extend(control_opts(session));
    args
}

pub(crate) fn ssh_args(session: &RemoteShellSession, command: &str) -> Vec<String> {
    let mut args = client_opts(session);
    args.extend([
        "-p".to_string(),
        session.port.to_string(),
        session.destination(),
        "--".to_string(),
        command.to_string(),
    ]);
    args
}

pub(crate) fn master_args(session: &RemoteShellSession) -> Vec<String> {
    let mut args = vec!["-M".to_string(), "-N".to_string(), "-f".to_string()];
    args.extend(control_opts(session));
    args.extend(["-p".to_string(), session.port.to_string(), session.destination()]);
    args
}

pub(crate) fn scp_args(session: &RemoteShellSession, local: &Path, remote: &str) -> Vec<String> {
    let mut args = client_opts(session);
    args.extend([
        "-P".to_string(),
        session.port.to_string(),
        local.display().to_string(),
        format!("{}:{remote}", session.destination()),
    ]);
    args
}

pub(crate) fn exit_args(session: &RemoteShellSession) -> Vec<String> {
    vec![
        "-o".to_string(),
        format!("ControlPath={}", session.control_path.display()),
        "-O".to_string(),
        "exit".to_string(),
        session.destination(),
    ]
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

impl<R: CommandRunner> ShellRunner for OpenSsh<R> {
    async fn open_master(&self, session: &RemoteShellSession) -> Result<Output> {
        if let Some(dir) = session.control_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let args = master_args(session);
        self.runner
            .run_with_timeout("ssh", &as_strs(&args), MASTER_TIMEOUT)
            .await
    }

    async fn exec(&self, session: &RemoteShellSession, command: &str) -> Result<Output> {
        let args = ssh_args(session, command);
        self.runner.run("ssh", &as_strs(&args)).await
    }

    async fn exec_streamed(
        &self,
        session: &RemoteShellSession,
        command: &str,
    ) -> Result<ExitStatus> {
        let args = ssh_args(session, command);
        self.runner.run_status("ssh", &as_strs(&args)).await
    }

    async fn upload(
        &self,
        session: &RemoteShellSession,
        local: &Path,
        remote: &str,
    ) -> Result<Output> {
        let args = scp_args(session, local, remote);
        self.runner.run("scp", &as_strs(&args)).await
    }

    async fn close_master(&self, session: &RemoteShellSession) -> Result<Output> {
        let args = exit_args(session);
        self.runner.run("ssh", &as_strs(&args)).await
    }
}
