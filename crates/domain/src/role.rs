//! Role aggregate.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use loanflow_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::GrantPlan;
use crate::grants::GrantSet;
use crate::space::Space;

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| AppError::NotFound(format!("role '{value}' not found")))
    }
}

/// Role lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    /// Grants take effect.
    Active,
    /// Grants are retained but ignored.
    Inactive,
}

impl RoleStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Returns the opposite status.
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

impl FromStr for RoleStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown role status '{value}'"
            ))),
        }
    }
}

/// Validated attributes of a role about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Display name, unique within its space and tenant.
    pub name: NonEmptyString,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Role space.
    pub space: Space,
    /// Owning tenant; required for tenant roles.
    pub tenant_id: Option<TenantId>,
    /// Inert hierarchy pointer.
    pub parent_role_id: Option<RoleId>,
}

/// A named bundle of granted permission keys within one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: Option<String>,
    space: Space,
    tenant_id: Option<TenantId>,
    parent_role_id: Option<RoleId>,
    status: RoleStatus,
    grants: GrantSet,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Creates an active role without grants.
    ///
    /// Tenant roles must name their tenant and system roles must not.
    pub fn new(input: NewRole, now: DateTime<Utc>) -> AppResult<Self> {
        match (input.space, input.tenant_id) {
            (Space::Tenant, None) => {
                return Err(AppError::Validation(
                    "tenant roles require a tenant id".to_owned(),
                ));
            }
            (Space::System, Some(tenant_id)) => {
                return Err(AppError::Validation(format!(
                    "system roles cannot belong to tenant '{tenant_id}'"
                )));
            }
            _ => {}
        }

        Ok(Self {
            id: RoleId::new(),
            name: input.name,
            description: normalize_description(input.description),
            space: input.space,
            tenant_id: input.tenant_id,
            parent_role_id: input.parent_role_id,
            status: RoleStatus::Active,
            grants: GrantSet::new(),
            version: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the role space.
    #[must_use]
    pub fn space(&self) -> Space {
        self.space
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Returns the parent role pointer. It is recorded only; grants are not inherited.
    #[must_use]
    pub fn parent_role_id(&self) -> Option<RoleId> {
        self.parent_role_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> RoleStatus {
        self.status
    }

    /// Returns whether the role is active and not deleted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RoleStatus::Active && self.deleted_at.is_none()
    }

    /// Returns the granted keys.
    #[must_use]
    pub fn grants(&self) -> &GrantSet {
        &self.grants
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the logical deletion timestamp.
    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the role was logically removed.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns a copy with new display details. Space and tenant never change.
    #[must_use]
    pub fn with_details(
        &self,
        name: Option<NonEmptyString>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut updated = self.clone();
        if let Some(name) = name {
            updated.name = name;
        }
        if description.is_some() {
            updated.description = normalize_description(description);
        }
        updated.updated_at = now;
        updated
    }

    /// Returns a copy with the given status.
    #[must_use]
    pub fn with_status(&self, status: RoleStatus, now: DateTime<Utc>) -> Self {
        let mut updated = self.clone();
        updated.status = status;
        updated.updated_at = now;
        updated
    }

    /// Returns a copy carrying the grants computed by a plan for this role.
    pub fn with_plan(&self, plan: &GrantPlan, now: DateTime<Utc>) -> AppResult<Self> {
        if plan.role_id() != self.id || plan.base_version() != self.version {
            return Err(AppError::Conflict(format!(
                "grant plan for role '{}' was computed against a different revision",
                self.id
            )));
        }

        let mut updated = self.clone();
        updated.grants = plan.grants().clone();
        updated.updated_at = now;
        Ok(updated)
    }

    /// Returns a tombstoned copy; deleted roles keep no grants.
    #[must_use]
    pub fn deleted(&self, now: DateTime<Utc>) -> Self {
        let mut updated = self.clone();
        updated.grants = GrantSet::new();
        updated.updated_at = now;
        updated.deleted_at = Some(now);
        updated
    }

    /// Returns a copy with the next version number. Stores call this when persisting.
    #[must_use]
    pub fn next_revision(&self) -> Self {
        let mut updated = self.clone();
        updated.version = self.version.saturating_add(1);
        updated
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use loanflow_core::{NonEmptyString, TenantId};

    use crate::space::Space;

    use super::{NewRole, Role, RoleStatus};

    fn new_role(space: Space, tenant_id: Option<i64>) -> NewRole {
        NewRole {
            name: NonEmptyString::new("Collector").unwrap_or_else(|_| unreachable!()),
            description: Some("  ".to_owned()),
            space,
            tenant_id: tenant_id.map(|value| TenantId::new(value).unwrap_or_else(|_| unreachable!())),
            parent_role_id: None,
        }
    }

    #[test]
    fn tenant_role_requires_tenant_id() {
        assert!(Role::new(new_role(Space::Tenant, None), Utc::now()).is_err());
        assert!(Role::new(new_role(Space::Tenant, Some(7)), Utc::now()).is_ok());
    }

    #[test]
    fn system_role_cannot_carry_tenant_id() {
        assert!(Role::new(new_role(Space::System, Some(7)), Utc::now()).is_err());
    }

    #[test]
    fn blank_description_is_dropped() {
        let role = Role::new(new_role(Space::Customer, None), Utc::now())
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(role.description(), None);
        assert_eq!(role.status(), RoleStatus::Active);
        assert!(role.grants().is_empty());
    }

    #[test]
    fn deleted_role_is_inactive_and_empty() {
        let role = Role::new(new_role(Space::Tenant, Some(7)), Utc::now())
            .unwrap_or_else(|_| unreachable!());
        let deleted = role.deleted(Utc::now());

        assert!(deleted.is_deleted());
        assert!(!deleted.is_active());
        assert!(deleted.grants().is_empty());
    }

    #[test]
    fn status_toggles_between_active_and_inactive() {
        assert_eq!(RoleStatus::Active.toggled(), RoleStatus::Inactive);
        assert_eq!(RoleStatus::Inactive.toggled(), RoleStatus::Active);
    }
}
