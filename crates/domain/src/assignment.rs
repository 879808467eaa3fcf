//! Pure planning of grant replacements.
//!
//! A plan is computed from a role snapshot and a requested key set. It
//! validates every requested key against the catalog and the role space,
//! re-inserts the essential tenant permissions, and records the net delta.
//! Persisting the plan is the caller's job.

use loanflow_core::{AppError, AppResult};
use serde::Serialize;

use crate::catalog::PermissionCatalog;
use crate::grants::{GrantDelta, GrantSet, essential_tenant_permissions};
use crate::permission::PermissionKey;
use crate::role::{Role, RoleId};
use crate::scoping::{SpaceCompatibility, compatibility};
use crate::space::Space;

/// Knobs for grant planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanningPolicy {
    /// Lets system roles hold tenant permissions (flagged, not dropped).
    pub allow_cross_space_for_system: bool,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        Self {
            allow_cross_space_for_system: true,
        }
    }
}

/// Outcome of planning a grant replacement for one role revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantPlan {
    role_id: RoleId,
    base_version: u64,
    grants: GrantSet,
    delta: GrantDelta,
    essential_restored: Vec<PermissionKey>,
    flagged: Vec<PermissionKey>,
}

impl GrantPlan {
    /// Returns the planned role.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the role version the plan was computed against.
    #[must_use]
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    /// Returns the full resulting grant set.
    #[must_use]
    pub fn grants(&self) -> &GrantSet {
        &self.grants
    }

    /// Returns the net change against the snapshot.
    #[must_use]
    pub fn delta(&self) -> &GrantDelta {
        &self.delta
    }

    /// Returns essential keys the request omitted and the plan put back.
    #[must_use]
    pub fn essential_restored(&self) -> &[PermissionKey] {
        &self.essential_restored
    }

    /// Returns tenant keys accepted on a system role.
    #[must_use]
    pub fn flagged(&self) -> &[PermissionKey] {
        &self.flagged
    }

    /// Returns whether persisting the plan would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.delta.is_empty()
    }
}

/// Plans replacing the role's grants with `requested`.
///
/// Fails with `NotFound` listing every key missing from the catalog, then with
/// `SpaceMismatch` listing every key the role space cannot hold. Tenant roles
/// always end up with the essential permissions, even when the request
/// removes them.
pub fn plan_grant_replacement(
    role: &Role,
    requested: &GrantSet,
    catalog: &PermissionCatalog,
    policy: PlanningPolicy,
) -> AppResult<GrantPlan> {
    let unknown: Vec<String> = requested
        .iter()
        .filter(|key| !catalog.contains(key))
        .map(ToString::to_string)
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::NotFound(format!(
            "unknown permission keys: {}",
            unknown.join(", ")
        )));
    }

    let mut mismatched = Vec::new();
    let mut flagged = Vec::new();
    for key in requested.iter() {
        let permission_space = catalog.resolve(key)?.space();
        match compatibility(role.space(), permission_space) {
            SpaceCompatibility::Native => {}
            SpaceCompatibility::Flagged if policy.allow_cross_space_for_system => {
                flagged.push(key.clone());
            }
            SpaceCompatibility::Flagged | SpaceCompatibility::Rejected => {
                mismatched.push(format!("{key} ({permission_space})"));
            }
        }
    }
    if !mismatched.is_empty() {
        return Err(AppError::SpaceMismatch(format!(
            "{} role '{}' cannot hold: {}",
            role.space(),
            role.name(),
            mismatched.join(", ")
        )));
    }

    let (grants, essential_restored) = if role.space() == Space::Tenant {
        let essential = essential_tenant_permissions();
        let restored = essential.difference(requested);
        (requested.union(&essential), restored)
    } else {
        (requested.clone(), Vec::new())
    };

    Ok(GrantPlan {
        role_id: role.id(),
        base_version: role.version(),
        delta: role.grants().delta_to(&grants),
        grants,
        essential_restored,
        flagged,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use loanflow_core::{AppError, NonEmptyString, TenantId};
    use proptest::prelude::*;

    use crate::catalog::PermissionCatalog;
    use crate::grants::{GrantSet, essential_tenant_permissions};
    use crate::permission::PermissionKey;
    use crate::role::{NewRole, Role};
    use crate::space::Space;

    use super::{PlanningPolicy, plan_grant_replacement};

    fn catalog() -> PermissionCatalog {
        PermissionCatalog::standard().unwrap_or_else(|_| unreachable!())
    }

    fn key(value: &str) -> PermissionKey {
        PermissionKey::parse(value).unwrap_or_else(|_| unreachable!())
    }

    fn grants(values: &[&str]) -> GrantSet {
        values.iter().map(|value| key(value)).collect()
    }

    fn role(space: Space) -> Role {
        let tenant_id = (space == Space::Tenant)
            .then(|| TenantId::new(7).unwrap_or_else(|_| unreachable!()));
        Role::new(
            NewRole {
                name: NonEmptyString::new("Collector").unwrap_or_else(|_| unreachable!()),
                description: None,
                space,
                tenant_id,
                parent_role_id: None,
            },
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn applied(role: &Role, requested: &GrantSet) -> Role {
        let plan = plan_grant_replacement(role, requested, &catalog(), PlanningPolicy::default())
            .unwrap_or_else(|_| unreachable!());
        role.with_plan(&plan, Utc::now())
            .unwrap_or_else(|_| unreachable!())
            .next_revision()
    }

    #[test]
    fn collector_scenario_adds_essential_permissions() {
        let role = role(Space::Tenant);
        let plan = plan_grant_replacement(
            &role,
            &grants(&["money-loan:assigned-payments:collect"]),
            &catalog(),
            PlanningPolicy::default(),
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            plan.grants(),
            &grants(&[
                "money-loan:assigned-payments:collect",
                "tenant-dashboard:view",
                "tenant-users:read",
            ])
        );
        assert_eq!(plan.essential_restored().len(), 2);
    }

    #[test]
    fn unknown_keys_are_all_reported() {
        let result = plan_grant_replacement(
            &role(Space::Tenant),
            &grants(&["loans:teleport", "tenant-users:fly", "tenant-users:read"]),
            &catalog(),
            PlanningPolicy::default(),
        );

        let Err(AppError::NotFound(message)) = result else {
            unreachable!("expected not found");
        };
        assert!(message.contains("loans:teleport"));
        assert!(message.contains("tenant-users:fly"));
    }

    #[test]
    fn tenant_roles_reject_system_permissions() {
        let result = plan_grant_replacement(
            &role(Space::Tenant),
            &grants(&["loans:approve"]),
            &catalog(),
            PlanningPolicy::default(),
        );

        assert!(matches!(result, Err(AppError::SpaceMismatch(_))));
    }

    #[test]
    fn customer_roles_reject_tenant_permissions() {
        let result = plan_grant_replacement(
            &role(Space::Customer),
            &grants(&["customer-loans:read", "tenant-users:read"]),
            &catalog(),
            PlanningPolicy::default(),
        );

        assert!(matches!(result, Err(AppError::SpaceMismatch(_))));
    }

    #[test]
    fn system_roles_accept_tenant_permissions_with_a_flag() {
        let plan = plan_grant_replacement(
            &role(Space::System),
            &grants(&["loans:read", "tenant-users:read"]),
            &catalog(),
            PlanningPolicy::default(),
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(plan.grants().len(), 2);
        assert_eq!(plan.flagged(), &[key("tenant-users:read")]);
        assert!(plan.essential_restored().is_empty());
    }

    #[test]
    fn system_roles_reject_customer_permissions() {
        let result = plan_grant_replacement(
            &role(Space::System),
            &grants(&["loans:read", "customer-loans:apply"]),
            &catalog(),
            PlanningPolicy::default(),
        );

        let Err(AppError::SpaceMismatch(message)) = result else {
            unreachable!();
        };
        assert!(message.ends_with("cannot hold: customer-loans:apply (customer)"));
    }

    #[test]
    fn strict_policy_rejects_cross_space_grants_on_system_roles() {
        let result = plan_grant_replacement(
            &role(Space::System),
            &grants(&["tenant-users:read"]),
            &catalog(),
            PlanningPolicy {
                allow_cross_space_for_system: false,
            },
        );

        assert!(matches!(result, Err(AppError::SpaceMismatch(_))));
    }

    #[test]
    fn delta_is_computed_against_the_snapshot() {
        let role = applied(&role(Space::System), &grants(&["loans:read", "loans:delete"]));
        let plan = plan_grant_replacement(
            &role,
            &grants(&["loans:read", "loans:approve"]),
            &catalog(),
            PlanningPolicy::default(),
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(plan.delta().to_add, vec![key("loans:approve")]);
        assert_eq!(plan.delta().to_remove, vec![key("loans:delete")]);
        assert_eq!(plan.base_version(), 1);
    }

    #[test]
    fn stale_plan_cannot_be_applied() {
        let base = role(Space::System);
        let plan = plan_grant_replacement(
            &base,
            &grants(&["loans:read"]),
            &catalog(),
            PlanningPolicy::default(),
        )
        .unwrap_or_else(|_| unreachable!());
        let moved_on = base.next_revision();

        assert!(matches!(
            moved_on.with_plan(&plan, Utc::now()),
            Err(AppError::Conflict(_))
        ));
    }

    fn tenant_key_strategy() -> impl Strategy<Value = GrantSet> {
        let tenant_keys: Vec<PermissionKey> = catalog()
            .iter()
            .filter(|entry| entry.space() == Space::Tenant)
            .map(|entry| entry.key().clone())
            .collect();
        proptest::sample::subsequence(tenant_keys.clone(), 0..12)
            .prop_map(|keys| keys.into_iter().collect::<GrantSet>())
    }

    proptest! {
        #[test]
        fn tenant_grants_always_contain_the_essential_set(requested in tenant_key_strategy()) {
            let updated = applied(&role(Space::Tenant), &requested);

            prop_assert!(updated.grants().is_superset(&essential_tenant_permissions()));
            prop_assert!(updated.grants().is_superset(&requested));
        }

        #[test]
        fn replacement_is_idempotent(requested in tenant_key_strategy()) {
            let once = applied(&role(Space::Tenant), &requested);
            let plan = plan_grant_replacement(
                &once,
                &requested,
                &catalog(),
                PlanningPolicy::default(),
            );

            prop_assert!(plan.is_ok());
            let plan = plan.unwrap_or_else(|_| unreachable!());
            prop_assert!(plan.is_noop());
            prop_assert_eq!(plan.grants(), once.grants());
        }
    }
}
