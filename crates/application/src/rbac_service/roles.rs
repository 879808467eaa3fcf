use super::*;

use chrono::Utc;
use loanflow_core::{NonEmptyString, PrincipalScope, TenantId};
use loanflow_domain::{
    BoundaryDecision, GrantSet, NewRole, RoleStatus, Space, can_edit, evaluate_boundary,
    plan_grant_replacement,
};
use tracing::{info, warn};

use crate::rbac_ports::{
    CreateRoleInput, MultiTenantCreation, RoleDetail, RoleListQuery, RoleSummary,
    TenantCreationFailure, UpdateRoleInput,
};

use super::assignments::trace_plan;

impl RbacService {
    /// Lists roles visible to the principal. Tenant operators only see their own tenant.
    pub async fn list_roles(
        &self,
        principal: &Principal,
        query: RoleListQuery,
    ) -> AppResult<Vec<RoleSummary>> {
        let query = match (principal.scope(), query.tenant_id) {
            (PrincipalScope::Tenant(own), Some(requested)) if requested != own => {
                return Err(AppError::BoundaryDenied(
                    BoundaryRule::CrossTenantRole.reason().to_owned(),
                ));
            }
            (PrincipalScope::Tenant(own), _) => RoleListQuery {
                tenant_id: Some(own),
                ..query
            },
            (PrincipalScope::System, _) => query,
        };

        let roles = self.repository.list_roles(&query).await?;
        Ok(roles.iter().map(RoleSummary::from).collect())
    }

    /// Returns one role with its grants and the caller's edit boundary.
    pub async fn get_role(&self, principal: &Principal, role_id: RoleId) -> AppResult<RoleDetail> {
        let role = self.load_readable_role(principal, role_id).await?;
        let boundary = can_edit(principal, &role);

        Ok(RoleDetail { role, boundary })
    }

    /// Creates a role with its initial grants.
    ///
    /// System roles are created by system operators only. Tenant operators
    /// create roles for their own tenant, which is filled in when omitted.
    pub async fn create_role(&self, principal: &Principal, input: CreateRoleInput) -> AppResult<Role> {
        let name = role_name(input.name)?;
        if input.permissions.is_empty() {
            return Err(AppError::Validation(
                "a role needs at least one permission".to_owned(),
            ));
        }

        let tenant_id = match (principal.scope(), input.space) {
            (PrincipalScope::Tenant(own), Space::Tenant | Space::Customer) => {
                input.tenant_id.or(Some(own))
            }
            _ => input.tenant_id,
        };
        if !principal.is_system() {
            evaluate_boundary(principal.scope(), input.space, tenant_id).require_editable()?;
        }
        if let Some(parent_role_id) = input.parent_role_id {
            self.load_readable_role(principal, parent_role_id)
                .await
                .map_err(|error| match error {
                    AppError::NotFound(_) => AppError::NotFound(format!(
                        "parent role '{parent_role_id}' not found"
                    )),
                    other => other,
                })?;
        }

        let now = Utc::now();
        let role = Role::new(
            NewRole {
                name,
                description: input.description,
                space: input.space,
                tenant_id,
                parent_role_id: input.parent_role_id,
            },
            now,
        )?;
        let requested: GrantSet = input.permissions.into_iter().collect();
        let plan = plan_grant_replacement(&role, &requested, self.catalog(), self.policy)?;
        let role = self.repository.create_role(role.with_plan(&plan, now)?).await?;

        trace_plan(&role, &plan);
        info!(
            role_id = %role.id(),
            space = %role.space(),
            tenant_id = ?role.tenant_id().map(|tenant_id| tenant_id.as_i64()),
            subject = principal.subject(),
            permission_count = role.grants().len(),
            "role created"
        );
        self.append_audit(
            principal,
            &role,
            AuditAction::RoleCreated,
            format!(
                "created {} role '{}' with {} permissions",
                role.space(),
                role.name(),
                role.grants().len()
            ),
        )
        .await?;

        Ok(role)
    }

    /// Creates the same tenant role once per tenant.
    ///
    /// Tenants that fail are reported and skipped. When no role could be
    /// created, the first failure is returned.
    pub async fn create_role_for_tenants(
        &self,
        principal: &Principal,
        input: CreateRoleInput,
        tenant_ids: &[TenantId],
    ) -> AppResult<MultiTenantCreation> {
        if input.space != Space::Tenant {
            return Err(AppError::Validation(
                "only tenant roles can be created for several tenants".to_owned(),
            ));
        }
        if tenant_ids.is_empty() {
            return Err(AppError::Validation(
                "at least one tenant must be selected".to_owned(),
            ));
        }

        let mut outcome = MultiTenantCreation::default();
        let mut first_error = None;
        for tenant_id in tenant_ids {
            let per_tenant = CreateRoleInput {
                tenant_id: Some(*tenant_id),
                ..input.clone()
            };
            match self.create_role(principal, per_tenant).await {
                Ok(role) => outcome.created.push(role),
                Err(error) => {
                    warn!(
                        tenant_id = tenant_id.as_i64(),
                        error = %error,
                        "tenant role creation skipped"
                    );
                    outcome.failed.push(TenantCreationFailure {
                        tenant_id: *tenant_id,
                        message: error.to_string(),
                    });
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) if outcome.created.is_empty() => Err(error),
            _ => Ok(outcome),
        }
    }

    /// Renames or re-describes a role. Space and tenant never change.
    pub async fn update_role(
        &self,
        principal: &Principal,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        if input.is_empty() {
            return Err(AppError::Validation("no fields to update".to_owned()));
        }
        let name = input.name.map(role_name).transpose()?;

        let (_guard, current) = self.lock_editable_role(principal, role_id).await?;

        let updated = current.with_details(name, input.description, Utc::now());
        let role = self.repository.save_role(updated, current.version()).await?;

        info!(role_id = %role.id(), subject = principal.subject(), "role updated");
        self.append_audit(
            principal,
            &role,
            AuditAction::RoleUpdated,
            format!("updated role '{}'", role.name()),
        )
        .await?;

        Ok(role)
    }

    /// Flips a role between active and inactive.
    pub async fn toggle_role_status(&self, principal: &Principal, role_id: RoleId) -> AppResult<Role> {
        self.change_status(principal, role_id, |current| current.toggled()).await
    }

    /// Puts a role into `status`. Setting the status it already has writes nothing.
    pub async fn set_role_status(
        &self,
        principal: &Principal,
        role_id: RoleId,
        status: RoleStatus,
    ) -> AppResult<Role> {
        self.change_status(principal, role_id, |_| status).await
    }

    async fn change_status(
        &self,
        principal: &Principal,
        role_id: RoleId,
        next: impl FnOnce(RoleStatus) -> RoleStatus + Send,
    ) -> AppResult<Role> {
        let (_guard, current) = self.lock_editable_role(principal, role_id).await?;

        let status = next(current.status());
        if status == current.status() {
            return Ok(current);
        }
        let role = self
            .repository
            .save_role(current.with_status(status, Utc::now()), current.version())
            .await?;

        info!(
            role_id = %role.id(),
            status = status.as_str(),
            subject = principal.subject(),
            "role status changed"
        );
        self.append_audit(
            principal,
            &role,
            AuditAction::RoleStatusChanged,
            format!("role '{}' is now {}", role.name(), status.as_str()),
        )
        .await?;

        Ok(role)
    }

    /// Logically deletes a role and drops its grants.
    pub async fn delete_role(&self, principal: &Principal, role_id: RoleId) -> AppResult<()> {
        let (_guard, current) = self.lock_editable_role(principal, role_id).await?;

        let role = self
            .repository
            .save_role(current.deleted(Utc::now()), current.version())
            .await?;

        info!(role_id = %role.id(), subject = principal.subject(), "role deleted");
        self.append_audit(
            principal,
            &role,
            AuditAction::RoleDeleted,
            format!("deleted role '{}'", role.name()),
        )
        .await
    }

    /// Evaluates whether the principal may mutate the role.
    pub async fn role_boundary(
        &self,
        principal: &Principal,
        role_id: RoleId,
    ) -> AppResult<BoundaryDecision> {
        let role = self.load_readable_role(principal, role_id).await?;
        Ok(can_edit(principal, &role))
    }
}

fn role_name(value: String) -> AppResult<NonEmptyString> {
    NonEmptyString::new(value.trim())
        .map_err(|_| AppError::Validation("role name is required".to_owned()))
}
