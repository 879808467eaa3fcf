use super::*;

use loanflow_domain::{
    EffectivePermissions, PermissionDescriptor, PermissionMatrix, Product, ScopingOptions,
    SpaceFilter, filter_assignable,
};

impl RbacService {
    /// Lists catalog entries. The product narrows tenant entries only.
    #[must_use]
    pub fn list_permissions(
        &self,
        space: SpaceFilter,
        product: Option<Product>,
    ) -> Vec<PermissionDescriptor> {
        self.catalog
            .list(space, product)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Lists the catalog entries the role may be granted.
    ///
    /// Tenant entries are offered to system roles only when cross-space
    /// grants are enabled.
    pub async fn assignable_permissions(
        &self,
        principal: &Principal,
        role_id: RoleId,
        options: ScopingOptions,
    ) -> AppResult<Vec<PermissionDescriptor>> {
        let role = self.load_readable_role(principal, role_id).await?;
        let options = ScopingOptions {
            include_tenant_for_system: options.include_tenant_for_system
                && self.policy.allow_cross_space_for_system,
            ..options
        };

        Ok(filter_assignable(self.catalog(), role.space(), options)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Projects a role's grants into a resource by action matrix.
    pub async fn permission_matrix(
        &self,
        principal: &Principal,
        role_id: RoleId,
    ) -> AppResult<PermissionMatrix> {
        let role = self.load_readable_role(principal, role_id).await?;
        Ok(PermissionMatrix::build(&role))
    }

    /// Unions the grants of the given roles. Inactive roles contribute nothing.
    pub async fn effective_permissions(
        &self,
        principal: &Principal,
        role_ids: &[RoleId],
    ) -> AppResult<EffectivePermissions> {
        let mut roles = Vec::with_capacity(role_ids.len());
        for role_id in role_ids {
            roles.push(self.load_readable_role(principal, *role_id).await?);
        }

        Ok(EffectivePermissions::from_roles(&roles))
    }
}
