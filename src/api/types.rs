//! Wire types for the policy manager REST API
//!
//! These mirror the JSON the backend returns for Gatekeeper constraints.
//! Unknown fields are ignored; optional blocks default so a constraint that
//! Gatekeeper has not audited yet still deserializes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Enforcement action assumed when a spec is present but does not name one
pub const DEFAULT_ENFORCEMENT_ACTION: &str = "deny";

/// A single Gatekeeper constraint as served by `/api/v1/constraints/{context}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRecord {
    /// Constraint kind, which is also the name of its template
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ConstraintSpec>,
    #[serde(default)]
    pub status: ConstraintStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_action: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_criteria: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintStatus {
    /// `None` until Gatekeeper's audit has evaluated the constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_violations: Option<u64>,
    /// Returned violations, possibly truncated by the audit violations limit
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub by_pod: Vec<PodStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(default)]
    pub enforcement_action: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// Per-replica view of whether the constraint is enforced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    pub id: String,
    #[serde(default)]
    pub enforced: bool,
    #[serde(default)]
    pub observed_generation: i64,
}

/// Enforcement mode of a constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnforcementMode {
    DryRun,
    Warn,
    Deny,
    Other(String),
}

impl EnforcementMode {
    pub fn parse(action: &str) -> Self {
        match action {
            "dryrun" => Self::DryRun,
            "warn" => Self::Warn,
            "deny" => Self::Deny,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the mode blocks admission
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::DryRun)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::DryRun => "dryrun",
            Self::Warn => "warn",
            Self::Deny => "deny",
            Self::Other(s) => s,
        }
    }
}

/// Three-way violation state of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationState {
    /// Not evaluated by the audit yet
    Unknown,
    None,
    Present { total: u64, shown: usize },
}

impl ConstraintRecord {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// `None` when the constraint has no spec at all
    pub fn enforcement_mode(&self) -> Option<EnforcementMode> {
        self.spec.as_ref().map(|spec| {
            EnforcementMode::parse(
                spec.enforcement_action
                    .as_deref()
                    .unwrap_or(DEFAULT_ENFORCEMENT_ACTION),
            )
        })
    }

    pub fn violation_state(&self) -> ViolationState {
        match self.status.total_violations {
            None => ViolationState::Unknown,
            Some(0) => ViolationState::None,
            Some(total) => ViolationState::Present {
                total,
                shown: self.status.violations.len(),
            },
        }
    }

    /// Sidebar badge value. Zero and unknown both fold to 0 here.
    pub fn badge(&self) -> u64 {
        self.status.total_violations.unwrap_or(0)
    }
}

impl ViolationState {
    /// Returned entries are fewer than the audit total
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Present { total, shown } if (*shown as u64) < *total)
    }
}

/// Structured error payload used by the backend and by the error view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    /// Short summary
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub description: String,
    /// Suggested action for the user
    #[serde(default)]
    pub action: String,
}

impl BackendError {
    pub fn is_empty(&self) -> bool {
        self.error.is_empty() && self.description.is_empty() && self.action.is_empty()
    }
}
