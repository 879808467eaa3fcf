//! Resource by action projection of a grant set.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::grants::GrantSet;
use crate::role::Role;

/// Canonical action groups used by summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionBucket {
    /// `view` and `read`.
    View,
    /// `create`.
    Create,
    /// `update` and `edit`.
    Update,
    /// `delete`.
    Delete,
}

impl ActionBucket {
    /// Classifies an action name. Domain verbs such as `approve` have no bucket.
    #[must_use]
    pub fn classify(action: &str) -> Option<Self> {
        match action {
            "view" | "read" => Some(Self::View),
            "create" => Some(Self::Create),
            "update" | "edit" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Counts describing a grant set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PermissionSummary {
    /// Number of granted keys.
    pub total_permissions: usize,
    /// Number of distinct resources.
    pub resource_count: usize,
    /// Keys in the view bucket.
    pub view_count: usize,
    /// Keys in the create bucket.
    pub create_count: usize,
    /// Keys in the update bucket.
    pub update_count: usize,
    /// Keys in the delete bucket.
    pub delete_count: usize,
}

/// `resource -> action -> granted`. Absent cells mean not granted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, BTreeMap<String, bool>>);

impl PermissionMatrix {
    /// Projects a grant set.
    #[must_use]
    pub fn from_grants(grants: &GrantSet) -> Self {
        let mut cells: BTreeMap<String, BTreeMap<String, bool>> = BTreeMap::new();
        for key in grants.iter() {
            cells
                .entry(key.resource().to_owned())
                .or_default()
                .insert(key.action().to_owned(), true);
        }

        Self(cells)
    }

    /// Projects a role's grants.
    #[must_use]
    pub fn build(role: &Role) -> Self {
        Self::from_grants(role.grants())
    }

    /// Returns whether the cell is set.
    #[must_use]
    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        self.0
            .get(resource)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the resources with at least one granted action.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the granted actions of one resource.
    #[must_use]
    pub fn actions(&self, resource: &str) -> BTreeSet<&str> {
        self.0
            .get(resource)
            .map(|actions| actions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Summarizes the matrix.
    #[must_use]
    pub fn summary(&self) -> PermissionSummary {
        let mut summary = PermissionSummary {
            resource_count: self.0.len(),
            ..PermissionSummary::default()
        };

        for action in self.0.values().flat_map(BTreeMap::keys) {
            summary.total_permissions += 1;
            match ActionBucket::classify(action) {
                Some(ActionBucket::View) => summary.view_count += 1,
                Some(ActionBucket::Create) => summary.create_count += 1,
                Some(ActionBucket::Update) => summary.update_count += 1,
                Some(ActionBucket::Delete) => summary.delete_count += 1,
                None => {}
            }
        }

        summary
    }
}

/// Returns whether the role grants `resource:action`.
#[must_use]
pub fn has_permission(role: &Role, resource: &str, action: &str) -> bool {
    PermissionMatrix::build(role).has_permission(resource, action)
}
