use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use loanflow_application::{AuditEvent, AuditRepository};
use loanflow_core::AppResult;

/// Append-only audit log kept in process memory and mirrored to the trace log.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event in append order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            target: "loanflow::audit",
            action = event.action.as_str(),
            subject = %event.subject,
            tenant_id = ?event.tenant_id.map(|tenant_id| tenant_id.as_i64()),
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );

        self.events.write().await.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use loanflow_application::{AuditEvent, AuditRepository};
    use loanflow_domain::AuditAction;

    use super::InMemoryAuditRepository;

    #[tokio::test]
    async fn events_are_kept_in_append_order() {
        let repository = InMemoryAuditRepository::new();

        for action in [AuditAction::RoleCreated, AuditAction::RoleDeleted] {
            let result = repository
                .append_event(AuditEvent {
                    tenant_id: None,
                    subject: "platform-admin".to_owned(),
                    action,
                    resource_type: "rbac_role".to_owned(),
                    resource_id: "role-1".to_owned(),
                    detail: None,
                })
                .await;
            assert!(result.is_ok());
        }

        let actions: Vec<AuditAction> = repository
            .events()
            .await
            .into_iter()
            .map(|event| event.action)
            .collect();
        assert_eq!(actions, vec![AuditAction::RoleCreated, AuditAction::RoleDeleted]);
    }
}
