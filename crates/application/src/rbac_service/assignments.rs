use super::*;

use chrono::Utc;
use loanflow_domain::{GrantPlan, GrantSet, PermissionKey, plan_grant_replacement};
use tracing::{debug, info, warn};

use crate::rbac_ports::AssignmentResult;

impl RbacService {
    /// Replaces every grant of a role with `keys`.
    ///
    /// Tenant roles keep the essential permissions even when `keys` leaves
    /// them out; the result lists what was put back. Replaying the same
    /// request changes nothing and emits no audit event.
    pub async fn bulk_assign_permissions(
        &self,
        principal: &Principal,
        role_id: RoleId,
        keys: Vec<PermissionKey>,
    ) -> AppResult<AssignmentResult> {
        let requested: GrantSet = keys.into_iter().collect();
        self.replace_grants(principal, role_id, move |_| requested)
            .await
    }

    /// Grants one key on top of the current grants.
    pub async fn assign_permission(
        &self,
        principal: &Principal,
        role_id: RoleId,
        key: PermissionKey,
    ) -> AppResult<AssignmentResult> {
        self.catalog.resolve(&key)?;
        self.replace_grants(principal, role_id, move |current| current.with(key))
            .await
    }

    /// Withdraws one key. Essential tenant permissions stay granted.
    pub async fn revoke_permission(
        &self,
        principal: &Principal,
        role_id: RoleId,
        key: PermissionKey,
    ) -> AppResult<AssignmentResult> {
        self.catalog.resolve(&key)?;
        self.replace_grants(principal, role_id, move |current| current.without(&key))
            .await
    }

    async fn replace_grants<F>(
        &self,
        principal: &Principal,
        role_id: RoleId,
        requested_from: F,
    ) -> AppResult<AssignmentResult>
    where
        F: FnOnce(&GrantSet) -> GrantSet + Send,
    {
        let (_guard, current) = self.lock_editable_role(principal, role_id).await?;

        let requested = requested_from(current.grants());
        let plan = plan_grant_replacement(&current, &requested, self.catalog(), self.policy)?;
        if plan.is_noop() {
            return Ok(AssignmentResult::from_plan(current, &plan));
        }

        let updated = current.with_plan(&plan, Utc::now())?;
        let role = self.repository.save_role(updated, current.version()).await?;

        trace_plan(&role, &plan);
        info!(
            role_id = %role.id(),
            added = plan.delta().to_add.len(),
            removed = plan.delta().to_remove.len(),
            subject = principal.subject(),
            "role permissions replaced"
        );
        self.append_audit(
            principal,
            &role,
            AuditAction::RolePermissionsReplaced,
            format!(
                "role '{}' now holds {} permissions (+{} -{})",
                role.name(),
                role.grants().len(),
                plan.delta().to_add.len(),
                plan.delta().to_remove.len()
            ),
        )
        .await?;

        Ok(AssignmentResult::from_plan(role, &plan))
    }
}

/// Logs the normalizations a plan applied.
pub(super) fn trace_plan(role: &Role, plan: &GrantPlan) {
    if !plan.flagged().is_empty() {
        warn!(
            role_id = %role.id(),
            flagged = ?plan.flagged().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "system role holds permissions from another space"
        );
    }
    if !plan.essential_restored().is_empty() {
        debug!(
            role_id = %role.id(),
            restored = ?plan
                .essential_restored()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            "essential tenant permissions re-inserted"
        );
    }
}
