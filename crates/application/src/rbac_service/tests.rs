use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use loanflow_core::{AppError, AppResult, Principal, TenantId};
use loanflow_domain::{
    AuditAction, BoundaryRule, PermissionCatalog, PermissionKey, PlanningPolicy, Role, RoleId,
    RoleStatus, Space, SpaceFilter,
};

use crate::rbac_ports::{
    AuditEvent, AuditRepository, CreateRoleInput, RoleListQuery, RoleRepository, UpdateRoleInput,
};

use super::RbacService;

#[derive(Default)]
struct FakeRoleRepository {
    roles: Mutex<HashMap<RoleId, Role>>,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn create_role(&self, role: Role) -> AppResult<Role> {
        self.roles.lock().await.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .get(&role_id)
            .filter(|role| !role.is_deleted())
            .cloned())
    }

    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .roles
            .lock()
            .await
            .values()
            .filter(|role| !role.is_deleted() && query.matches(role))
            .cloned()
            .collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(roles)
    }

    async fn save_role(&self, role: Role, expected_version: u64) -> AppResult<Role> {
        let mut roles = self.roles.lock().await;
        let Some(stored) = roles.get(&role.id()) else {
            return Err(AppError::NotFound(format!("role '{}' not found", role.id())));
        };
        if stored.version() != expected_version {
            return Err(AppError::Conflict("stale role version".to_owned()));
        }

        let saved = role.next_revision();
        roles.insert(saved.id(), saved.clone());
        Ok(saved)
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

fn tenant(value: i64) -> TenantId {
    TenantId::new(value).unwrap_or_else(|_| unreachable!())
}

fn key(value: &str) -> PermissionKey {
    PermissionKey::parse(value).unwrap_or_else(|_| unreachable!())
}

fn operator() -> Principal {
    Principal::system("platform-admin")
}

fn tenant_operator(tenant_id: i64) -> Principal {
    Principal::tenant(format!("tenant-{tenant_id}-admin"), tenant(tenant_id))
}

fn build_service() -> (RbacService, Arc<FakeAuditRepository>) {
    let catalog = PermissionCatalog::standard().unwrap_or_else(|_| unreachable!());
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = RbacService::new(
        Arc::new(catalog),
        Arc::new(FakeRoleRepository::default()),
        audit_repository.clone(),
        PlanningPolicy::default(),
    );
    (service, audit_repository)
}

fn role_input(name: &str, space: Space, tenant_id: Option<i64>, keys: &[&str]) -> CreateRoleInput {
    CreateRoleInput {
        name: name.to_owned(),
        description: None,
        space,
        tenant_id: tenant_id.map(tenant),
        parent_role_id: None,
        permissions: keys.iter().map(|value| key(value)).collect(),
    }
}

async fn create(service: &RbacService, principal: &Principal, input: CreateRoleInput) -> Role {
    service
        .create_role(principal, input)
        .await
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn collector_role_gets_essential_permissions_on_creation() {
    let (service, audit_repository) = build_service();

    let role = create(
        &service,
        &tenant_operator(7),
        role_input(
            "Collector",
            Space::Tenant,
            None,
            &["money-loan:assigned-payments:collect"],
        ),
    )
    .await;

    assert_eq!(role.tenant_id(), Some(tenant(7)));
    assert_eq!(
        role.grants().to_vec(),
        vec![
            key("money-loan:assigned-payments:collect"),
            key("tenant-dashboard:view"),
            key("tenant-users:read"),
        ]
    );
    let events = audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::RoleCreated);
    assert_eq!(events[0].tenant_id, Some(tenant(7)));
}

#[tokio::test]
async fn creation_requires_a_name_and_a_permission() {
    let (service, _) = build_service();

    let no_permissions = service
        .create_role(&operator(), role_input("Auditor", Space::System, None, &[]))
        .await;
    let blank_name = service
        .create_role(&operator(), role_input("  ", Space::System, None, &["loans:read"]))
        .await;
    let missing_tenant = service
        .create_role(
            &operator(),
            role_input("Collector", Space::Tenant, None, &["tenant-users:read"]),
        )
        .await;

    assert!(matches!(no_permissions, Err(AppError::Validation(_))));
    assert!(matches!(blank_name, Err(AppError::Validation(_))));
    assert!(matches!(missing_tenant, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn tenant_operators_cannot_create_system_or_foreign_roles() {
    let (service, _) = build_service();

    let system_role = service
        .create_role(
            &tenant_operator(7),
            role_input("Auditor", Space::System, None, &["loans:read"]),
        )
        .await;
    let foreign_role = service
        .create_role(
            &tenant_operator(7),
            role_input("Collector", Space::Tenant, Some(9), &["tenant-users:read"]),
        )
        .await;

    assert!(matches!(system_role, Err(AppError::BoundaryDenied(_))));
    assert!(matches!(foreign_role, Err(AppError::BoundaryDenied(_))));
}

#[tokio::test]
async fn system_operator_has_read_only_oversight_of_tenant_roles() {
    let (service, _) = build_service();
    let role = create(
        &service,
        &operator(),
        role_input("Collector", Space::Tenant, Some(7), &["tenant-users:read"]),
    )
    .await;

    let detail = service
        .get_role(&operator(), role.id())
        .await
        .unwrap_or_else(|_| unreachable!());
    let result = service
        .bulk_assign_permissions(&operator(), role.id(), vec![key("tenant-users:create")])
        .await;

    assert!(!detail.boundary.editable);
    assert_eq!(detail.boundary.rule, BoundaryRule::TenantOwnedRole);
    assert!(matches!(result, Err(AppError::BoundaryDenied(_))));
}

#[tokio::test]
async fn tenant_operator_cannot_reach_another_tenant() {
    let (service, _) = build_service();
    let role = create(
        &service,
        &tenant_operator(9),
        role_input("Collector", Space::Tenant, None, &["tenant-users:read"]),
    )
    .await;

    let read = service.get_role(&tenant_operator(7), role.id()).await;
    let write = service.delete_role(&tenant_operator(7), role.id()).await;
    let listing = service
        .list_roles(
            &tenant_operator(7),
            RoleListQuery {
                tenant_id: Some(tenant(9)),
                ..RoleListQuery::default()
            },
        )
        .await;

    assert!(matches!(read, Err(AppError::BoundaryDenied(_))));
    assert!(matches!(write, Err(AppError::BoundaryDenied(_))));
    assert!(matches!(listing, Err(AppError::BoundaryDenied(_))));
}

#[tokio::test]
async fn clearing_a_tenant_role_keeps_the_essential_set_and_replays_are_silent() {
    let (service, audit_repository) = build_service();
    let principal = tenant_operator(7);
    let role = create(
        &service,
        &principal,
        role_input(
            "Collector",
            Space::Tenant,
            None,
            &["money-loan:assigned-payments:collect"],
        ),
    )
    .await;

    let first = service
        .bulk_assign_permissions(&principal, role.id(), Vec::new())
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = service
        .bulk_assign_permissions(&principal, role.id(), Vec::new())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first.count, 2);
    assert_eq!(first.removed, vec![key("money-loan:assigned-payments:collect")]);
    assert_eq!(first.essential_restored.len(), 2);
    assert_eq!(second.role.grants(), first.role.grants());
    assert_eq!(second.role.version(), first.role.version());
    assert!(second.added.is_empty() && second.removed.is_empty());
    assert_eq!(audit_repository.events.lock().await.len(), 2);
}

#[tokio::test]
async fn revoking_an_essential_permission_is_a_no_op() {
    let (service, _) = build_service();
    let principal = tenant_operator(7);
    let role = create(
        &service,
        &principal,
        role_input("Viewer", Space::Tenant, None, &["tenant-users:read"]),
    )
    .await;

    let result = service
        .revoke_permission(&principal, role.id(), key("tenant-users:read"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(result.role.grants().contains(&key("tenant-users:read")));
    assert_eq!(result.role.version(), role.version());
}

#[tokio::test]
async fn assign_and_revoke_validate_against_the_catalog() {
    let (service, _) = build_service();
    let principal = operator();
    let role = create(
        &service,
        &principal,
        role_input("Auditor", Space::System, None, &["loans:read"]),
    )
    .await;

    let assigned = service
        .assign_permission(&principal, role.id(), key("loans:approve"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let unknown = service
        .revoke_permission(&principal, role.id(), key("loans:teleport"))
        .await;
    let revoked = service
        .revoke_permission(&principal, role.id(), key("loans:read"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(assigned.added, vec![key("loans:approve")]);
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
    assert_eq!(revoked.role.grants().to_vec(), vec![key("loans:approve")]);
}

#[tokio::test]
async fn bulk_assign_reports_every_unknown_key() {
    let (service, _) = build_service();
    let principal = operator();
    let role = create(
        &service,
        &principal,
        role_input("Auditor", Space::System, None, &["loans:read"]),
    )
    .await;

    let result = service
        .bulk_assign_permissions(
            &principal,
            role.id(),
            vec![key("loans:teleport"), key("payments:juggle")],
        )
        .await;

    let Err(AppError::NotFound(message)) = result else {
        unreachable!("expected not found");
    };
    assert!(message.contains("loans:teleport") && message.contains("payments:juggle"));
}

#[tokio::test]
async fn customer_roles_reject_tenant_keys() {
    let (service, _) = build_service();

    let result = service
        .create_role(
            &operator(),
            role_input(
                "Borrower",
                Space::Customer,
                None,
                &["customer-loans:read", "tenant-users:read"],
            ),
        )
        .await;

    assert!(matches!(result, Err(AppError::SpaceMismatch(_))));
}

#[tokio::test]
async fn update_needs_a_field_and_keeps_scope() {
    let (service, _) = build_service();
    let principal = tenant_operator(7);
    let role = create(
        &service,
        &principal,
        role_input("Viewer", Space::Tenant, None, &["tenant-users:read"]),
    )
    .await;

    let empty = service
        .update_role(&principal, role.id(), UpdateRoleInput::default())
        .await;
    let renamed = service
        .update_role(
            &principal,
            role.id(),
            UpdateRoleInput {
                name: Some("Branch viewer".to_owned()),
                description: Some("Read-only branch staff".to_owned()),
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(matches!(empty, Err(AppError::Validation(_))));
    assert_eq!(renamed.name().as_str(), "Branch viewer");
    assert_eq!(renamed.description(), Some("Read-only branch staff"));
    assert_eq!(renamed.space(), Space::Tenant);
    assert_eq!(renamed.tenant_id(), Some(tenant(7)));
    assert_eq!(renamed.grants(), role.grants());
}

#[tokio::test]
async fn inactive_roles_are_hidden_from_default_listings() {
    let (service, _) = build_service();
    let principal = operator();
    let active = create(
        &service,
        &principal,
        role_input("Auditor", Space::System, None, &["loans:read"]),
    )
    .await;
    let paused = create(
        &service,
        &principal,
        role_input("Approver", Space::System, None, &["loans:approve"]),
    )
    .await;

    let toggled = service
        .toggle_role_status(&principal, paused.id())
        .await
        .unwrap_or_else(|_| unreachable!());
    let default_listing = service
        .list_roles(&principal, RoleListQuery::default())
        .await
        .unwrap_or_else(|_| unreachable!());
    let full_listing = service
        .list_roles(
            &principal,
            RoleListQuery {
                space: SpaceFilter::Only(Space::System),
                include_inactive: true,
                ..RoleListQuery::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(toggled.status(), RoleStatus::Inactive);
    assert_eq!(
        default_listing
            .iter()
            .map(|summary| summary.role_id)
            .collect::<Vec<_>>(),
        vec![active.id()]
    );
    assert_eq!(
        full_listing
            .iter()
            .map(|summary| summary.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Approver", "Auditor"]
    );
    assert_eq!(full_listing[1].permission_count, 1);
}

#[tokio::test]
async fn deleted_roles_disappear() {
    let (service, audit_repository) = build_service();
    let principal = operator();
    let role = create(
        &service,
        &principal,
        role_input("Auditor", Space::System, None, &["loans:read"]),
    )
    .await;

    let deleted = service.delete_role(&principal, role.id()).await;
    let lookup = service.get_role(&principal, role.id()).await;
    let listing = service
        .list_roles(&principal, RoleListQuery::default())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(deleted.is_ok());
    assert!(matches!(lookup, Err(AppError::NotFound(_))));
    assert!(listing.is_empty());
    assert_eq!(
        audit_repository
            .events
            .lock()
            .await
            .last()
            .map(|event| event.action),
        Some(AuditAction::RoleDeleted)
    );
}

#[tokio::test]
async fn one_role_per_selected_tenant() {
    let (service, _) = build_service();

    let outcome = service
        .create_role_for_tenants(
            &operator(),
            role_input("Collector", Space::Tenant, None, &["tenant-users:read"]),
            &[tenant(7), tenant(9)],
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(outcome.created.len(), 2);
    assert!(outcome.failed.is_empty());
    assert_eq!(
        outcome
            .created
            .iter()
            .map(Role::tenant_id)
            .collect::<Vec<_>>(),
        vec![Some(tenant(7)), Some(tenant(9))]
    );
}

#[tokio::test]
async fn unknown_parent_role_is_rejected() {
    let (service, _) = build_service();
    let input = CreateRoleInput {
        parent_role_id: Some(RoleId::new()),
        ..role_input("Auditor", Space::System, None, &["loans:read"])
    };

    let result = service.create_role(&operator(), input).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn concurrent_replacements_on_one_role_do_not_interleave() {
    let (service, _) = build_service();
    let principal = operator();
    let role = create(
        &service,
        &principal,
        role_input("Auditor", Space::System, None, &["loans:read"]),
    )
    .await;

    let first_request = vec![key("loans:approve"), key("loans:create")];
    let second_request = vec![key("payments:read")];
    let (first, second) = tokio::join!(
        service.bulk_assign_permissions(&principal, role.id(), first_request.clone()),
        service.bulk_assign_permissions(&principal, role.id(), second_request.clone()),
    );

    assert!(first.is_ok() && second.is_ok());
    let stored = service
        .get_role(&principal, role.id())
        .await
        .unwrap_or_else(|_| unreachable!())
        .role;
    let first_set: Vec<PermissionKey> = {
        let mut keys = first_request;
        keys.sort();
        keys
    };
    assert!(stored.grants().to_vec() == first_set || stored.grants().to_vec() == second_request);
    assert_eq!(stored.version(), role.version() + 2);
}

#[tokio::test]
async fn effective_permissions_skip_inactive_roles() {
    let (service, _) = build_service();
    let principal = operator();
    let reader = create(
        &service,
        &principal,
        role_input("Reader", Space::System, None, &["loans:read"]),
    )
    .await;
    let approver = create(
        &service,
        &principal,
        role_input("Approver", Space::System, None, &["loans:approve"]),
    )
    .await;
    service
        .toggle_role_status(&principal, approver.id())
        .await
        .unwrap_or_else(|_| unreachable!());

    let effective = service
        .effective_permissions(&principal, &[reader.id(), approver.id()])
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(effective.allows_any(&[key("loans:approve"), key("loans:read")]));
    assert!(!effective.allows(&key("loans:approve")));
}

#[tokio::test]
async fn setting_the_current_status_again_writes_nothing() {
    let (service, audit_repository) = build_service();
    let principal = operator();
    let role = create(
        &service,
        &principal,
        role_input("Auditor", Space::System, None, &["loans:read"]),
    )
    .await;

    let paused = service
        .set_role_status(&principal, role.id(), RoleStatus::Inactive)
        .await
        .unwrap_or_else(|_| unreachable!());
    let again = service
        .set_role_status(&principal, role.id(), RoleStatus::Inactive)
        .await
        .unwrap_or_else(|_| unreachable!());
    let resumed = service
        .toggle_role_status(&principal, role.id())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(paused.status(), RoleStatus::Inactive);
    assert_eq!(again.version(), paused.version());
    assert_eq!(resumed.status(), RoleStatus::Active);
    let status_events = audit_repository
        .events
        .lock()
        .await
        .iter()
        .filter(|event| event.action == AuditAction::RoleStatusChanged)
        .count();
    assert_eq!(status_events, 2);
}

#[tokio::test]
async fn rejected_writes_leave_no_role_locks_behind() {
    let (service, _) = build_service();
    let role = create(
        &service,
        &tenant_operator(7),
        role_input("Teller", Space::Tenant, None, &["tenant-users:read"]),
    )
    .await;

    for _ in 0..1_000 {
        let result = service
            .bulk_assign_permissions(&operator(), RoleId::new(), vec![key("loans:read")])
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
    let oversight = service
        .set_role_status(&operator(), role.id(), RoleStatus::Inactive)
        .await;
    assert!(matches!(oversight, Err(AppError::BoundaryDenied(_))));
    assert_eq!(service.role_locks.len(), 0);

    let assigned = service
        .assign_permission(&tenant_operator(7), role.id(), key("tenant-users:create"))
        .await;
    assert!(assigned.is_ok());
    assert_eq!(service.role_locks.len(), 0);
}
