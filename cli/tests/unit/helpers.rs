//! Shared test helpers: in-memory ports and output constructors.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use jiffy_cli::application::ports::{BoxApi, ProgressReporter, RemoteShellSession, ShellRunner};
use jiffy_cli::domain::config::SshSettings;
use jiffy_cli::domain::jiffybox::ApiMessage;
use jiffy_cli::domain::{ApiResponse, BoxId, CreateSpec, JiffyError, Transition};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── API replies ──────────────────────────────────────────────────────────────

pub fn box_json(id: u64, status: &str, running: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("web{id}"),
        "status": status,
        "running": running,
        "ips": {"public": [format!("203.0.113.{id}")], "private": []},
        "plan": {"id": 5, "name": "CloudLevel 1"},
        "distribution": "ubuntu"
    })
}

pub fn box_reply(id: u64, status: &str, running: bool) -> ApiResponse {
    ApiResponse {
        messages: Vec::new(),
        result: box_json(id, status, running),
    }
}

/// `reply` with the given advisory texts attached.
pub fn with_messages(mut reply: ApiResponse, messages: &[&str]) -> ApiResponse {
    reply.messages = messages
        .iter()
        .map(|m| ApiMessage {
            kind: Some("info".to_string()),
            message: (*m).to_string(),
        })
        .collect();
    reply
}

/// Reply of a read for a box the API no longer knows.
pub fn gone_reply() -> ApiResponse {
    ApiResponse {
        messages: Vec::new(),
        result: serde_json::Value::Bool(false),
    }
}

pub fn jiffy_error(err: &anyhow::Error) -> &JiffyError {
    err.downcast_ref::<JiffyError>()
        .unwrap_or_else(|| panic!("expected a JiffyError, got: {err:#}"))
}

pub fn ssh_settings() -> SshSettings {
    SshSettings {
        user: "root".to_string(),
        port: 22,
        remote_dir: "/tmp/jiffyi".to_string(),
    }
}

// ── FakeApi ──────────────────────────────────────────────────────────────────

/// In-memory JiffyBox account.
///
/// Reads are replayed in order; once the script runs out the last reply is
/// repeated, which models a box stuck in one state. Every call is logged as
/// `get 7`, `create web1`, `SHUTDOWN 7`, `delete 7` or `list`.
pub struct FakeApi {
    reads: Mutex<VecDeque<Result<ApiResponse, String>>>,
    last_read: Mutex<Option<ApiResponse>>,
    listing: Mutex<serde_json::Value>,
    create_reply: Mutex<Option<ApiResponse>>,
    transition_reply: Mutex<Option<ApiResponse>>,
    delete_reply: Mutex<ApiResponse>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            reads: Mutex::new(VecDeque::new()),
            last_read: Mutex::new(None),
            listing: Mutex::new(serde_json::Value::Null),
            create_reply: Mutex::new(None),
            transition_reply: Mutex::new(None),
            delete_reply: Mutex::new(ApiResponse {
                messages: Vec::new(),
                result: serde_json::Value::Bool(true),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn reading(replies: impl IntoIterator<Item = ApiResponse>) -> Self {
        let api = Self::default();
        api.reads.lock().unwrap().extend(replies.into_iter().map(Ok));
        api
    }

    /// Queue a read that fails at the transport level.
    pub fn then_unreachable(self, detail: &str) -> Self {
        self.reads.lock().unwrap().push_back(Err(detail.to_string()));
        self
    }

    pub fn on_create(self, reply: ApiResponse) -> Self {
        *self.create_reply.lock().unwrap() = Some(reply);
        self
    }

    pub fn on_transition(self, reply: ApiResponse) -> Self {
        *self.transition_reply.lock().unwrap() = Some(reply);
        self
    }

    pub fn on_delete(self, reply: ApiResponse) -> Self {
        *self.delete_reply.lock().unwrap() = reply;
        self
    }

    pub fn with_listing(self, result: serde_json::Value) -> Self {
        *self.listing.lock().unwrap() = result;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of logged calls starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BoxApi for FakeApi {
    async fn list_boxes(&self) -> Result<ApiResponse> {
        self.record("list".to_string());
        Ok(ApiResponse {
            messages: Vec::new(),
            result: self.listing.lock().unwrap().clone(),
        })
    }

    async fn get_box(&self, id: BoxId) -> Result<ApiResponse> {
        self.record(format!("get {id}"));
        let next = self.reads.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => {
                *self.last_read.lock().unwrap() = Some(reply.clone());
                Ok(reply)
            }
            Some(Err(detail)) => Err(JiffyError::Transport(detail).into()),
            None => self
                .last_read
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no read scripted for {id}")),
        }
    }

    async fn create_box(&self, spec: &CreateSpec) -> Result<ApiResponse> {
        self.record(format!("create {}", spec.name));
        self.create_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("create not expected in this test"))
    }

    async fn transition_box(&self, id: BoxId, action: Transition) -> Result<ApiResponse> {
        self.record(format!("{action} {id}"));
        Ok(self
            .transition_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| box_reply(id.0, "UPDATING", false)))
    }

    async fn delete_box(&self, id: BoxId) -> Result<ApiResponse> {
        self.record(format!("delete {id}"));
        Ok(self.delete_reply.lock().unwrap().clone())
    }

    async fn list_plans(&self) -> Result<ApiResponse> {
        anyhow::bail!("not expected in this test")
    }

    async fn list_distributions(&self) -> Result<ApiResponse> {
        anyhow::bail!("not expected in this test")
    }
}

// ── FakeShell ────────────────────────────────────────────────────────────────

/// Remote shell that logs every call as `open`, `exec`, `upload`, `run` or
/// `close` and fails the steps it is told to.
#[derive(Default)]
pub struct FakeShell {
    calls: Mutex<Vec<String>>,
    refuse_master: bool,
    failing_script: Option<String>,
    failing_close: bool,
}

impl FakeShell {
    pub fn refusing_master() -> Self {
        Self {
            refuse_master: true,
            ..Self::default()
        }
    }

    /// Streamed commands mentioning `script` exit 1.
    pub fn failing_on(script: &str) -> Self {
        Self {
            failing_script: Some(script.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_close() -> Self {
        Self {
            failing_close: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Logged calls of one kind, without the kind prefix.
    pub fn calls_of(&self, kind: &str) -> Vec<String> {
        let prefix = format!("{kind} ");
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ShellRunner for FakeShell {
    async fn open_master(&self, session: &RemoteShellSession) -> Result<Output> {
        self.record(format!("open {}", session.destination()));
        if self.refuse_master {
            return Ok(err_output(255, b"ssh: connect to host port 22: Connection refused"));
        }
        Ok(ok_output(b""))
    }

    async fn exec(&self, _: &RemoteShellSession, command: &str) -> Result<Output> {
        self.record(format!("exec {command}"));
        Ok(ok_output(b""))
    }

    async fn exec_streamed(&self, _: &RemoteShellSession, command: &str) -> Result<ExitStatus> {
        self.record(format!("run {command}"));
        let fails = self
            .failing_script
            .as_deref()
            .is_some_and(|s| command.contains(s));
        Ok(exit_status(i32::from(fails)))
    }

    async fn upload(&self, _: &RemoteShellSession, local: &Path, remote: &str) -> Result<Output> {
        let file = local.file_name().map_or_else(String::new, |f| f.to_string_lossy().into_owned());
        self.record(format!("upload {file} {remote}"));
        Ok(ok_output(b""))
    }

    async fn close_master(&self, session: &RemoteShellSession) -> Result<Output> {
        self.record(format!("close {}", session.destination()));
        if self.failing_close {
            anyhow::bail!("ssh not found");
        }
        Ok(ok_output(b""))
    }
}

// ── Reporters ────────────────────────────────────────────────────────────────

/// Keeps every progress event, prefixed with its kind.
#[derive(Default)]
pub struct CollectingReporter(Mutex<Vec<String>>);

impl CollectingReporter {
    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }
}

impl ProgressReporter for CollectingReporter {
    fn step(&self, message: &str) {
        self.0.lock().unwrap().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.0.lock().unwrap().push(format!("ok: {message}"));
    }
    fn warn(&self, message: &str) {
        self.0.lock().unwrap().push(format!("warn: {message}"));
    }
}
