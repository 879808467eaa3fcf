use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by role administration use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is created.
    RoleCreated,
    /// Emitted when a role's name or description changes.
    RoleUpdated,
    /// Emitted when a role is activated or deactivated.
    RoleStatusChanged,
    /// Emitted when a role is logically deleted.
    RoleDeleted,
    /// Emitted when a role's grant set is replaced.
    RolePermissionsReplaced,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleCreated => "rbac.role.created",
            Self::RoleUpdated => "rbac.role.updated",
            Self::RoleStatusChanged => "rbac.role.status_changed",
            Self::RoleDeleted => "rbac.role.deleted",
            Self::RolePermissionsReplaced => "rbac.role.permissions_replaced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuditAction;

    #[test]
    fn audit_actions_share_the_rbac_namespace() {
        for action in [
            AuditAction::RoleCreated,
            AuditAction::RoleUpdated,
            AuditAction::RoleStatusChanged,
            AuditAction::RoleDeleted,
            AuditAction::RolePermissionsReplaced,
        ] {
            assert!(action.as_str().starts_with("rbac.role."));
        }
    }
}
