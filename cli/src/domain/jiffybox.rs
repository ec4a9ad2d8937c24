//! JiffyBox resource types and the API reply envelope.
//!
//! Pure data and decoding only: no I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::JiffyError;

// ── Identity ─────────────────────────────────────────────────────────────────

/// Numeric identifier of a box, as assigned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(pub u64);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BoxId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(BoxId)
            .map_err(|_| "ID must be numeric!".to_string())
    }
}

// ── Status ───────────────────────────────────────────────────────────────────

/// Box status as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BoxStatus {
    Creating,
    Ready,
    Updating,
    Stopping,
    Deleting,
    /// The API no longer returns the box.
    Deleted,
    /// Anything the client does not recognise. Always fatal in the lifecycle loops.
    Unknown(String),
}

impl Default for BoxStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<&str> for BoxStatus {
    fn from(s: &str) -> Self {
        match s {
            "CREATING" => Self::Creating,
            "READY" => Self::Ready,
            "UPDATING" => Self::Updating,
            "STOPPING" => Self::Stopping,
            "DELETING" => Self::Deleting,
            "DELETED" => Self::Deleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for BoxStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<BoxStatus> for String {
    fn from(status: BoxStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for BoxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creating => f.write_str("CREATING"),
            Self::Ready => f.write_str("READY"),
            Self::Updating => f.write_str("UPDATING"),
            Self::Stopping => f.write_str("STOPPING"),
            Self::Deleting => f.write_str("DELETING"),
            Self::Deleted => f.write_str("DELETED"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

// ── Box snapshot ─────────────────────────────────────────────────────────────

/// Addresses assigned to a box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxIps {
    #[serde(default)]
    pub public: Vec<String>,
    #[serde(default)]
    pub private: Vec<String>,
}

/// Plan a box was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Locally cached, possibly stale snapshot of a box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiffyBox {
    pub id: BoxId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: BoxStatus,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub ips: BoxIps,
    #[serde(default)]
    pub plan: Option<PlanRef>,
    #[serde(default)]
    pub distribution: Option<String>,
}

impl JiffyBox {
    /// First public address, if the API assigned one yet.
    #[must_use]
    pub fn public_address(&self) -> Option<&str> {
        self.ips.public.first().map(String::as_str)
    }
}

// ── Transitions ──────────────────────────────────────────────────────────────

/// State-changing action sent as `status=<ACTION>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Shutdown,
    Pullplug,
    Freeze,
    Thaw,
}

impl Transition {
    /// Stop action: immediate power-off when `now`, graceful shutdown otherwise.
    #[must_use]
    pub fn stop(now: bool) -> Self {
        if now { Self::Pullplug } else { Self::Shutdown }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Shutdown => "SHUTDOWN",
            Self::Pullplug => "PULLPLUG",
            Self::Freeze => "FREEZE",
            Self::Thaw => "THAW",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Create request ───────────────────────────────────────────────────────────

/// Validated parameters of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSpec {
    pub name: String,
    pub plan_id: String,
    pub distribution: String,
}

impl CreateSpec {
    /// Build a spec, rejecting missing or blank fields.
    ///
    /// # Errors
    ///
    /// Returns `JiffyError::Configuration` naming every missing field.
    pub fn new(
        name: Option<&str>,
        plan_id: Option<&str>,
        distribution: Option<&str>,
    ) -> Result<Self, JiffyError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        let fields = [
            ("name (-n)", present(name)),
            ("plan (-p)", present(plan_id)),
            ("distribution (-d)", present(distribution)),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(label, _)| *label)
            .collect();
        if let [(_, Some(name)), (_, Some(plan_id)), (_, Some(distribution))] = fields {
            return Ok(Self {
                name: name.to_string(),
                plan_id: plan_id.to_string(),
                distribution: distribution.to_string(),
            });
        }
        Err(JiffyError::Configuration(format!(
            "create needs {}: create -n name -d distribution -p planid",
            missing.join(", ")
        )))
    }

    /// Form fields of the POST body. Boxes always get the account's SSH key.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("planid", self.plan_id.clone()),
            ("distribution", self.distribution.clone()),
            ("use_sshkey", "1".to_string()),
        ]
    }
}

// ── Reply envelope ───────────────────────────────────────────────────────────

/// Advisory attached to an API reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub message: String,
}

/// Envelope shared by every API reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl ApiResponse {
    /// Decode `result` as a single box.
    ///
    /// # Errors
    ///
    /// Returns `JiffyError::UnexpectedResponse` when `result` is not a box object.
    pub fn into_box(self) -> Result<JiffyBox, JiffyError> {
        serde_json::from_value(self.result.clone()).map_err(|e| {
            JiffyError::UnexpectedResponse(format!("result is not a box ({e}): {}", self.result))
        })
    }

    /// Decode `result` of a read, mapping an empty result to `None` (box gone).
    ///
    /// # Errors
    ///
    /// Returns `JiffyError::UnexpectedResponse` when `result` is neither empty nor a box.
    pub fn into_box_if_present(self) -> Result<Option<JiffyBox>, JiffyError> {
        match &self.result {
            serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(None),
            _ => self.into_box().map(Some),
        }
    }

    /// Decode the `result` of a listing, which the API keys by box id.
    ///
    /// Boxes are returned sorted by id.
    ///
    /// # Errors
    ///
    /// Returns `JiffyError::UnexpectedResponse` when any entry is not a box.
    pub fn into_box_list(self) -> Result<Vec<JiffyBox>, JiffyError> {
        let entries: Vec<serde_json::Value> = match self.result {
            serde_json::Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            serde_json::Value::Array(items) => items,
            serde_json::Value::Null => Vec::new(),
            other => {
                return Err(JiffyError::UnexpectedResponse(format!(
                    "box listing is not a collection: {other}"
                )));
            }
        };
        let mut boxes = entries
            .into_iter()
            .map(|v| {
                serde_json::from_value::<JiffyBox>(v).map_err(|e| {
                    JiffyError::UnexpectedResponse(format!("box listing entry is not a box: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        boxes.sort_by_key(|b| b.id);
        Ok(boxes)
    }

    /// Whether a mutating reply explicitly refused the request (`result: false`).
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.result == serde_json::Value::Bool(false)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
