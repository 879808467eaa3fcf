//! Narrowing of the catalog to what a role may be granted.

use crate::catalog::PermissionCatalog;
use crate::permission::PermissionDescriptor;
use crate::space::{Product, Space, SpaceFilter};

/// How a permission space relates to a role space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceCompatibility {
    /// Permission belongs to the role's own space.
    Native,
    /// Accepted, but unusual: a system role holding tenant permissions.
    Flagged,
    /// Never assignable.
    Rejected,
}

/// Classifies a permission space against a role space.
///
/// System roles may also hold tenant permissions; every other pairing must
/// match exactly.
#[must_use]
pub fn compatibility(role_space: Space, permission_space: Space) -> SpaceCompatibility {
    match (role_space, permission_space) {
        (role, permission) if role == permission => SpaceCompatibility::Native,
        (Space::System, Space::Tenant) => SpaceCompatibility::Flagged,
        _ => SpaceCompatibility::Rejected,
    }
}

/// Options for [`filter_assignable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopingOptions {
    /// Narrows tenant-space entries to one product.
    pub product: Option<Product>,
    /// Offers tenant-space entries to system roles.
    pub include_tenant_for_system: bool,
}

/// Returns the catalog entries assignable to a role of `role_space`.
///
/// Customer roles see customer permissions only, whatever the options say.
#[must_use]
pub fn filter_assignable(
    catalog: &PermissionCatalog,
    role_space: Space,
    options: ScopingOptions,
) -> Vec<&PermissionDescriptor> {
    match role_space {
        Space::Customer => catalog.list(SpaceFilter::Only(Space::Customer), None),
        Space::Tenant => catalog.list(SpaceFilter::Only(Space::Tenant), options.product),
        Space::System => {
            let mut assignable = catalog.list(SpaceFilter::Only(Space::System), None);
            if options.include_tenant_for_system {
                assignable.extend(catalog.list(SpaceFilter::Only(Space::Tenant), options.product));
            }
            assignable
        }
    }
}
