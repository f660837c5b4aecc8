//! Lifecycle policy synthesis and structural comparison.

use loghold_core::{
    DeleteActions, DeletePhase, EmptyAction, HotActions, HotPhase, LifecyclePolicy, PolicyPhases,
    Rollover, SetPriority, WarmActions, WarmPhase,
};

use crate::budget::PolicyDetail;

/// Recovery priority of the hot phase.
pub const HOT_PRIORITY: u32 = 100;
/// Recovery priority of the warm phase.
pub const WARM_PRIORITY: u32 = 50;

/// Build the lifecycle policy for a computed detail.
///
/// The warm phase carries a `readonly` action only when the detail asks for
/// it; otherwise the action is left out of the document entirely.
#[must_use]
pub fn synthesize(detail: &PolicyDetail) -> LifecyclePolicy {
    LifecyclePolicy {
        phases: PolicyPhases {
            hot: HotPhase {
                actions: HotActions {
                    rollover: Rollover {
                        max_size: detail.rollover_max_size.clone(),
                        max_age: detail.rollover_max_age.clone(),
                    },
                    set_priority: Some(SetPriority {
                        priority: HOT_PRIORITY,
                    }),
                },
            },
            warm: WarmPhase {
                actions: WarmActions {
                    set_priority: Some(SetPriority {
                        priority: WARM_PRIORITY,
                    }),
                    readonly: detail.read_only_after_rollover.then_some(EmptyAction {}),
                },
            },
            delete: DeletePhase {
                min_age: detail.delete_min_age.clone(),
                actions: DeleteActions {
                    delete: Some(EmptyAction {}),
                },
            },
        },
    }
}

/// The fields that decide whether a stored policy must be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyFingerprint {
    /// `hot.actions.rollover.max_age`
    pub max_age: String,
    /// `hot.actions.rollover.max_size`
    pub max_size: String,
    /// `delete.min_age`
    pub min_age: String,
    /// Presence of `warm.actions.readonly`.
    pub readonly: bool,
}

impl PolicyFingerprint {
    /// Fingerprint of a stored or synthesized document.
    #[must_use]
    pub fn from_document(policy: &LifecyclePolicy) -> Self {
        let phases = &policy.phases;
        Self {
            max_age: phases.hot.actions.rollover.max_age.clone(),
            max_size: phases.hot.actions.rollover.max_size.clone(),
            min_age: phases.delete.min_age.clone(),
            readonly: phases.warm.actions.readonly.is_some(),
        }
    }

    /// Fingerprint of the desired state.
    #[must_use]
    pub fn from_detail(detail: &PolicyDetail) -> Self {
        Self {
            max_age: detail.rollover_max_age.clone(),
            max_size: detail.rollover_max_size.clone(),
            min_age: detail.delete_min_age.clone(),
            readonly: detail.read_only_after_rollover,
        }
    }

    /// Names of the fields that differ from `other`, in a stable order.
    #[must_use]
    pub fn changed_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.max_age != other.max_age {
            changed.push("max_age");
        }
        if self.max_size != other.max_size {
            changed.push("max_size");
        }
        if self.min_age != other.min_age {
            changed.push("min_age");
        }
        if self.readonly != other.readonly {
            changed.push("readonly");
        }
        changed
    }
}
