//! Wire documents exchanged with the log store.

mod lifecycle;
mod security;

pub use lifecycle::{
    DeleteActions, DeletePhase, EmptyAction, HotActions, HotPhase, LifecyclePolicy, PolicyPhases,
    Rollover, SetPriority, WarmActions, WarmPhase,
};
pub use security::{
    ApplicationPrivilege, PrincipalBody, PrincipalRecord, RoleDefinition, RoleIndex,
};
