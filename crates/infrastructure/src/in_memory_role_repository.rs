use std::collections::HashMap;

use async_trait::async_trait;
use loanflow_application::{RoleListQuery, RoleRepository};
use loanflow_core::{AppError, AppResult};
use loanflow_domain::{Role, RoleId};
use tokio::sync::RwLock;


/// In-memory role store with compare-and-replace writes.
///
/// Deleted roles stay in the map as tombstones.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<RoleId, Role>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
        }
    }
}

fn ensure_unique_name(roles: &HashMap<RoleId, Role>, candidate: &Role) -> AppResult<()> {
    let taken = roles.values().any(|stored| {
        stored.id() != candidate.id()
            && !stored.is_deleted()
            && stored.space() == candidate.space()
            && stored.tenant_id() == candidate.tenant_id()
            && stored
                .name()
                .as_str()
                .eq_ignore_ascii_case(candidate.name().as_str())
    });

    if taken {
        return Err(AppError::Conflict(format!(
            "a {} role named '{}' already exists",
            candidate.space(),
            candidate.name()
        )));
    }

    Ok(())
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create_role(&self, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;

        if roles.contains_key(&role.id()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.id()
            )));
        }
        ensure_unique_name(&roles, &role)?;

        roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&role_id)
            .filter(|role| !role.is_deleted())
            .cloned())
    }

    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;

        let mut values: Vec<Role> = roles
            .values()
            .filter(|role| !role.is_deleted() && query.matches(role))
            .cloned()
            .collect();
        values.sort_by(|left, right| {
            left.name()
                .as_str()
                .cmp(right.name().as_str())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(values)
    }

    async fn save_role(&self, role: Role, expected_version: u64) -> AppResult<Role> {
        let mut roles = self.roles.write().await;

        let stored_version = match roles.get(&role.id()) {
            Some(stored) if !stored.is_deleted() => stored.version(),
            _ => {
                return Err(AppError::NotFound(format!(
                    "role '{}' not found",
                    role.id()
                )));
            }
        };
        if stored_version != expected_version {
            return Err(AppError::Conflict(format!(
                "role '{}' changed concurrently (expected version {expected_version}, found {stored_version})",
                role.id()
            )));
        }
        if !role.is_deleted() {
            ensure_unique_name(&roles, &role)?;
        }

        let saved = role.next_revision();
        roles.insert(saved.id(), saved.clone());
        Ok(saved)
    }
}
