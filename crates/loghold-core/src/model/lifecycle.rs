//! Typed lifecycle policy document.
//!
//! # Design
//! - One record per phase; optional actions are `Option` fields so the document
//!   shape (present or absent) carries the meaning, never a `false` flag.
//! - Every field defaults on decode so documents written by other tools, or
//!   carrying extra actions, still parse.

use serde::{Deserialize, Serialize};

/// Lifecycle policy body: the `policy` object of an ILM request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    /// Ordered phases of the policy.
    #[serde(default)]
    pub phases: PolicyPhases,
}

/// The three phases managed by Loghold, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyPhases {
    /// Phase for the index currently receiving writes.
    #[serde(default)]
    pub hot: HotPhase,
    /// Phase entered right after rollover.
    #[serde(default)]
    pub warm: WarmPhase,
    /// Terminal phase removing the index.
    #[serde(default)]
    pub delete: DeletePhase,
}

/// Hot phase definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotPhase {
    /// Actions run while hot.
    #[serde(default)]
    pub actions: HotActions,
}

/// Actions of the hot phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotActions {
    /// Rollover thresholds.
    #[serde(default)]
    pub rollover: Rollover,
    /// Recovery priority of hot indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_priority: Option<SetPriority>,
}

/// Rollover thresholds; whichever is reached first triggers the rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rollover {
    /// Maximum primary size, formatted as a byte count (`"1073741824b"`).
    #[serde(default)]
    pub max_size: String,
    /// Maximum index age (`"1h"`, `"2d"`).
    #[serde(default)]
    pub max_age: String,
}

/// Index recovery priority action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPriority {
    /// Higher values recover first.
    pub priority: u32,
}

/// Warm phase definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmPhase {
    /// Actions run while warm.
    #[serde(default)]
    pub actions: WarmActions,
}

/// Actions of the warm phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmActions {
    /// Recovery priority of warm indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_priority: Option<SetPriority>,
    /// Present when rolled-over indices become read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<EmptyAction>,
}

/// Delete phase definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePhase {
    /// Age after rollover at which the phase starts (`"8d"`).
    #[serde(default)]
    pub min_age: String,
    /// Actions run when the phase starts.
    #[serde(default)]
    pub actions: DeleteActions,
}

/// Actions of the delete phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteActions {
    /// Unconditional index deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<EmptyAction>,
}

/// Parameterless action, encoded as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyAction {}
