use async_trait::async_trait;

use loanflow_core::AppResult;
use loanflow_domain::{Role, RoleId};

use super::roles::RoleListQuery;

/// Repository port for role storage.
///
/// Deleted roles are tombstones: they keep their row but are invisible to
/// `find_role` and `list_roles`.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Stores a new role. Fails with `Conflict` when the name is taken in the
    /// same space and tenant.
    async fn create_role(&self, role: Role) -> AppResult<Role>;

    /// Returns one live role.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Lists live roles matching the query, ordered by name.
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<Vec<Role>>;

    /// Replaces a role when its stored version still equals `expected_version`.
    ///
    /// Returns the stored revision with its version bumped. A stale version is
    /// a `Conflict`; an unknown or deleted role is `NotFound`.
    async fn save_role(&self, role: Role, expected_version: u64) -> AppResult<Role>;
}
