//! Union of grants across the roles held by one subject.

use serde::Serialize;

use crate::grants::GrantSet;
use crate::permission::PermissionKey;
use crate::role::Role;

/// Permissions a subject holds through its active roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectivePermissions {
    grants: GrantSet,
}

impl EffectivePermissions {
    /// Unions the grants of the active roles. Inactive and deleted roles count for nothing.
    #[must_use]
    pub fn from_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Self {
        let grants = roles
            .into_iter()
            .filter(|role| role.is_active())
            .fold(GrantSet::new(), |acc, role| acc.union(role.grants()));

        Self { grants }
    }

    /// Returns the combined grant set.
    #[must_use]
    pub fn grants(&self) -> &GrantSet {
        &self.grants
    }

    /// Returns whether the key is held.
    #[must_use]
    pub fn allows(&self, key: &PermissionKey) -> bool {
        self.grants.contains(key)
    }

    /// Returns whether at least one of `required` is held. An empty requirement allows.
    #[must_use]
    pub fn allows_any(&self, required: &[PermissionKey]) -> bool {
        required.is_empty() || required.iter().any(|key| self.allows(key))
    }
}
