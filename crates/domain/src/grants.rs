use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::permission::PermissionKey;

/// Storage values of the permissions every tenant role keeps.
pub const ESSENTIAL_TENANT_PERMISSIONS: [(&str, &str); 2] =
    [("tenant-dashboard", "view"), ("tenant-users", "read")];

/// Immutable set of granted permission keys.
///
/// Every operation returns a new value; a set is never mutated in place, so a
/// snapshot read from the store can be diffed safely against a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantSet(BTreeSet<PermissionKey>);

impl GrantSet {
    /// Creates an empty grant set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the key is granted.
    #[must_use]
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.0.contains(key)
    }

    /// Returns the number of granted keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no key is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionKey> {
        self.0.iter()
    }

    /// Returns a copy that also contains `key`.
    #[must_use]
    pub fn with(&self, key: PermissionKey) -> Self {
        let mut keys = self.0.clone();
        keys.insert(key);
        Self(keys)
    }

    /// Returns a copy without `key`.
    #[must_use]
    pub fn without(&self, key: &PermissionKey) -> Self {
        let mut keys = self.0.clone();
        keys.remove(key);
        Self(keys)
    }

    /// Returns the union of both sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Returns keys present in `self` and absent from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Vec<PermissionKey> {
        self.0.difference(&other.0).cloned().collect()
    }

    /// Returns whether every key of `other` is granted.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.0.is_superset(&other.0)
    }

    /// Computes the delta that turns `self` into `target`.
    #[must_use]
    pub fn delta_to(&self, target: &Self) -> GrantDelta {
        GrantDelta {
            to_add: target.difference(self),
            to_remove: self.difference(target),
        }
    }

    /// Returns the keys in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<PermissionKey> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<PermissionKey> for GrantSet {
    fn from_iter<T: IntoIterator<Item = PermissionKey>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for GrantSet {
    type Item = PermissionKey;
    type IntoIter = std::collections::btree_set::IntoIter<PermissionKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Keys added and removed by one grant replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantDelta {
    /// Keys newly granted.
    pub to_add: Vec<PermissionKey>,
    /// Keys no longer granted.
    pub to_remove: Vec<PermissionKey>,
}

impl GrantDelta {
    /// Returns whether the replacement changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Returns the fixed minimum grants of every tenant role.
#[must_use]
pub fn essential_tenant_permissions() -> GrantSet {
    ESSENTIAL_TENANT_PERMISSIONS
        .iter()
        .filter_map(|(resource, action)| PermissionKey::new(*resource, *action).ok())
        .collect()
}
