//! Edit boundary between principals and roles.
//!
//! Rules are evaluated in order and the first match wins. The last rule is an
//! explicit allow, so every combination gets exactly one decision.

use loanflow_core::{AppError, AppResult, Principal, PrincipalScope, TenantId};
use serde::Serialize;

use crate::role::Role;
use crate::space::Space;

/// Rule that decided a boundary evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRule {
    /// System operators only oversee tenant roles.
    TenantOwnedRole,
    /// Tenant operators cannot touch system roles.
    SystemReservedRole,
    /// Tenant operators cannot touch another tenant's roles.
    CrossTenantRole,
    /// Nothing forbids the edit.
    Allowed,
}

impl BoundaryRule {
    /// Returns a stable value for logs and transports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenantOwnedRole => "tenant_owned_role",
            Self::SystemReservedRole => "system_reserved_role",
            Self::CrossTenantRole => "cross_tenant_role",
            Self::Allowed => "allowed",
        }
    }

    /// Returns the operator-facing explanation.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TenantOwnedRole => {
                "Tenant roles are managed by the tenant; system operators have read-only oversight."
            }
            Self::SystemReservedRole => "System roles are reserved for system operators.",
            Self::CrossTenantRole => "This role belongs to a different tenant.",
            Self::Allowed => "",
        }
    }
}

/// Outcome of a boundary evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundaryDecision {
    /// Whether the principal may mutate the role.
    pub editable: bool,
    /// Explanation shown when the role is read-only. Empty when editable.
    pub reason: &'static str,
    /// Rule that matched.
    pub rule: BoundaryRule,
}

impl BoundaryDecision {
    fn from_rule(rule: BoundaryRule) -> Self {
        Self {
            editable: rule == BoundaryRule::Allowed,
            reason: rule.reason(),
            rule,
        }
    }

    /// Converts a read-only decision into `BoundaryDenied`.
    pub fn require_editable(self) -> AppResult<()> {
        if self.editable {
            return Ok(());
        }

        Err(AppError::BoundaryDenied(self.reason.to_owned()))
    }
}

/// Evaluates the boundary for a principal scope and a role's space and tenant.
#[must_use]
pub fn evaluate_boundary(
    scope: PrincipalScope,
    role_space: Space,
    role_tenant_id: Option<TenantId>,
) -> BoundaryDecision {
    let rule = match (scope, role_space, role_tenant_id) {
        (PrincipalScope::System, Space::Tenant, _) => BoundaryRule::TenantOwnedRole,
        (PrincipalScope::Tenant(_), Space::System, _) => BoundaryRule::SystemReservedRole,
        (PrincipalScope::Tenant(own), _, Some(owner)) if owner != own => {
            BoundaryRule::CrossTenantRole
        }
        _ => BoundaryRule::Allowed,
    };

    BoundaryDecision::from_rule(rule)
}

/// Decides whether `principal` may mutate `role`.
#[must_use]
pub fn can_edit(principal: &Principal, role: &Role) -> BoundaryDecision {
    evaluate_boundary(principal.scope(), role.space(), role.tenant_id())
}
