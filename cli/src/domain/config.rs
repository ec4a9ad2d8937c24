//! Domain types for jiffyi configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::JiffyError;
use crate::domain::jiffybox::BoxId;
use crate::domain::lifecycle::PollPolicy;
use crate::domain::protected::ProtectedIds;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_API_URL: &str = "https://api.jiffybox.de";
pub const DEFAULT_SCRIPTS_DIR: &str = "scripts";
pub const DEFAULT_SSH_USER: &str = "root";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_REMOTE_DIR: &str = "/tmp/jiffyi";

// ── Config schema ────────────────────────────────────────────────────────────

/// Contents of `~/.jiffyirc`: one profile per top-level key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JiffyConfig(pub BTreeMap<String, Profile>);

impl JiffyConfig {
    /// The named profile, or an empty one when the file does not define it.
    #[must_use]
    pub fn profile(&self, name: &str) -> Profile {
        self.0.get(name).cloned().unwrap_or_default()
    }
}

/// One profile section. Keys written by the Ruby tool (`:apitoken`) are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(alias = ":apitoken", deserialize_with = "scalar_string")]
    pub apitoken: Option<String>,
    #[serde(alias = ":protected_ids")]
    pub protected_ids: Vec<u64>,
    #[serde(alias = ":name", deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(alias = ":planid", deserialize_with = "scalar_string")]
    pub planid: Option<String>,
    #[serde(alias = ":distribution", deserialize_with = "scalar_string")]
    pub distribution: Option<String>,
    pub api_url: Option<String>,
    pub scripts_dir: Option<PathBuf>,
    pub ssh_user: Option<String>,
    pub ssh_port: Option<u16>,
    pub remote_dir: Option<String>,
    pub poll_timeout_secs: Option<u64>,
    pub poll_max: Option<u32>,
}

/// YAML scalars such as `planid: 5` are read as strings.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}

// ── Resolved settings ────────────────────────────────────────────────────────

/// Values given on the command line (or their env vars); they win over the profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub apitoken: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Remote-shell settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshSettings {
    pub user: String,
    pub port: u16,
    /// Staging directory scripts are copied to.
    pub remote_dir: String,
}

/// Defaults for `create`/`install` taken from the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDefaults {
    pub name: Option<String>,
    pub plan_id: Option<String>,
    pub distribution: Option<String>,
}

/// Effective configuration after applying overrides to a profile.
#[derive(Debug, Clone)]
pub struct Settings {
    pub apitoken: Option<String>,
    pub api_url: String,
    pub protected: ProtectedIds,
    pub create_defaults: CreateDefaults,
    pub scripts_dir: PathBuf,
    pub ssh: SshSettings,
    pub poll: PollPolicy,
}

impl Settings {
    /// Merge a profile with command-line overrides.
    #[must_use]
    pub fn resolve(profile: Profile, overrides: Overrides) -> Self {
        let mut poll = PollPolicy::default();
        if let Some(secs) = overrides.timeout_secs.or(profile.poll_timeout_secs) {
            poll.timeout = Duration::from_secs(secs);
        }
        poll.max_polls = profile.poll_max;

        Self {
            apitoken: overrides.apitoken.or(profile.apitoken),
            api_url: overrides
                .api_url
                .or(profile.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            protected: profile.protected_ids.into_iter().map(BoxId).collect(),
            create_defaults: CreateDefaults {
                name: profile.name,
                plan_id: profile.planid,
                distribution: profile.distribution,
            },
            scripts_dir: profile
                .scripts_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPTS_DIR)),
            ssh: SshSettings {
                user: profile
                    .ssh_user
                    .unwrap_or_else(|| DEFAULT_SSH_USER.to_string()),
                port: profile.ssh_port.unwrap_or(DEFAULT_SSH_PORT),
                remote_dir: profile
                    .remote_dir
                    .unwrap_or_else(|| DEFAULT_REMOTE_DIR.to_string()),
            },
            poll,
        }
    }

    /// The API token, required by every API call.
    ///
    /// # Errors
    ///
    /// Returns `JiffyError::Configuration` when no token is configured.
    pub fn require_token(&self) -> Result<&str, JiffyError> {
        self.apitoken
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                JiffyError::Configuration(
                    "no API token: pass -a/--apitoken, set JIFFY_APITOKEN or add apitoken to ~/.jiffyirc"
                        .to_string(),
                )
            })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
