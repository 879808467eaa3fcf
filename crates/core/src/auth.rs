use serde::{Deserialize, Serialize};

use crate::TenantId;

/// Scope of an acting principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tenant_id", rename_all = "snake_case")]
pub enum PrincipalScope {
    /// Platform operator without tenant affiliation.
    System,
    /// Operator bound to exactly one tenant.
    Tenant(TenantId),
}

/// Acting identity supplied by the external identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    subject: String,
    scope: PrincipalScope,
}

impl Principal {
    /// Creates a principal from an identity subject and scope.
    #[must_use]
    pub fn new(subject: impl Into<String>, scope: PrincipalScope) -> Self {
        Self {
            subject: subject.into(),
            scope,
        }
    }

    /// Creates a system-wide operator.
    #[must_use]
    pub fn system(subject: impl Into<String>) -> Self {
        Self::new(subject, PrincipalScope::System)
    }

    /// Creates an operator scoped to one tenant.
    #[must_use]
    pub fn tenant(subject: impl Into<String>, tenant_id: TenantId) -> Self {
        Self::new(subject, PrincipalScope::Tenant(tenant_id))
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the principal scope.
    #[must_use]
    pub fn scope(&self) -> PrincipalScope {
        self.scope
    }

    /// Returns the tenant affiliation, if any.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self.scope {
            PrincipalScope::System => None,
            PrincipalScope::Tenant(tenant_id) => Some(tenant_id),
        }
    }

    /// Returns whether the principal is a system-wide operator.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self.scope, PrincipalScope::System)
    }
}
