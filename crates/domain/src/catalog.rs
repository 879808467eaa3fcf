//! Static registry of grantable permissions.

use std::collections::HashMap;

use loanflow_core::{AppError, AppResult};

use crate::permission::{PermissionDescriptor, PermissionKey};
use crate::space::{Product, Space, SpaceFilter};

/// Registry of every permission that can ever be granted.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    descriptors: Vec<PermissionDescriptor>,
    index: HashMap<PermissionKey, usize>,
}

impl PermissionCatalog {
    /// Creates a catalog, rejecting duplicate `resource:action` pairs.
    pub fn new(descriptors: Vec<PermissionDescriptor>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            if index.insert(descriptor.key().clone(), position).is_some() {
                return Err(AppError::Validation(format!(
                    "permission '{}' is declared more than once",
                    descriptor.key()
                )));
            }
        }

        Ok(Self { descriptors, index })
    }

    /// Builds the platform's standard catalog.
    pub fn standard() -> AppResult<Self> {
        let mut descriptors = Vec::new();
        for group in STANDARD_RESOURCE_GROUPS {
            for action in group.actions {
                descriptors.push(PermissionDescriptor::new(
                    PermissionKey::new(group.resource, *action)?,
                    group.space,
                    group.product,
                    group.description,
                )?);
            }
        }

        Self::new(descriptors)
    }

    /// Lists catalog entries in declaration order.
    ///
    /// A product filter narrows tenant-space entries only; entries of other
    /// spaces pass through.
    #[must_use]
    pub fn list(
        &self,
        space_filter: SpaceFilter,
        product_filter: Option<Product>,
    ) -> Vec<&PermissionDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| space_filter.admits(descriptor.space()))
            .filter(|descriptor| match (product_filter, descriptor.effective_product()) {
                (Some(product), Some(entry_product)) => product == entry_product,
                _ => true,
            })
            .collect()
    }

    /// Returns the descriptor for a key.
    #[must_use]
    pub fn get(&self, key: &PermissionKey) -> Option<&PermissionDescriptor> {
        self.index
            .get(key)
            .and_then(|position| self.descriptors.get(*position))
    }

    /// Returns the descriptor for a key or a not-found error.
    pub fn resolve(&self, key: &PermissionKey) -> AppResult<&PermissionDescriptor> {
        self.get(key)
            .ok_or_else(|| AppError::NotFound(format!("unknown permission key '{key}'")))
    }

    /// Returns whether the key is registered.
    #[must_use]
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of registered permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates every descriptor.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionDescriptor> {
        self.descriptors.iter()
    }
}

struct ResourceGroup {
    resource: &'static str,
    space: Space,
    product: Option<Product>,
    description: &'static str,
    actions: &'static [&'static str],
}

const fn system(
    resource: &'static str,
    description: &'static str,
    actions: &'static [&'static str],
) -> ResourceGroup {
    ResourceGroup {
        resource,
        space: Space::System,
        product: None,
        description,
        actions,
    }
}

const fn tenant(
    resource: &'static str,
    product: Product,
    description: &'static str,
    actions: &'static [&'static str],
) -> ResourceGroup {
    ResourceGroup {
        resource,
        space: Space::Tenant,
        product: Some(product),
        description,
        actions,
    }
}

const fn customer(
    resource: &'static str,
    description: &'static str,
    actions: &'static [&'static str],
) -> ResourceGroup {
    ResourceGroup {
        resource,
        space: Space::Customer,
        product: None,
        description,
        actions,
    }
}

const CRUD: &[&str] = &["read", "create", "update", "delete"];

const STANDARD_RESOURCE_GROUPS: &[ResourceGroup] = &[
    system("dashboard", "System dashboard access", &["view"]),
    system(
        "tenants",
        "Manage tenant organizations",
        &["read", "create", "update", "delete", "manage-subscriptions"],
    ),
    system(
        "users",
        "System-wide user management",
        &["read", "create", "update", "delete", "export"],
    ),
    system("roles", "System role management", CRUD),
    system("modules", "System module management", CRUD),
    system("permissions", "Permission management", CRUD),
    system(
        "platforms",
        "Platform catalog and management",
        &["read", "create", "update", "delete", "manage-catalog"],
    ),
    system(
        "subscriptions",
        "Subscription management",
        &["read", "create", "update", "delete", "manage-plans"],
    ),
    system(
        "reports",
        "System reports and analytics",
        &["view", "export", "tenant-usage", "revenue"],
    ),
    system("analytics", "Analytics dashboard", &["view"]),
    system(
        "recycle-bin",
        "Deleted items recovery",
        &["view", "restore", "permanent-delete"],
    ),
    system(
        "loans",
        "System loan management",
        &["read", "create", "update", "delete", "approve", "disburse"],
    ),
    system("payments", "System payment management", CRUD),
    system("audit", "System audit logs", &["read", "export"]),
    system("settings", "System settings", &["read", "update"]),
    system(
        "system-logs",
        "System logging and monitoring",
        &["view", "export", "delete", "manage"],
    ),
    system(
        "audit-logs",
        "Audit trail and user actions",
        &["view", "export", "delete", "manage"],
    ),
    system("activity-dashboard", "System activity overview", &["view", "manage"]),
    system(
        "backup",
        "Database backup and restore",
        &["view", "create", "delete", "restore"],
    ),
    system(
        "security-policy",
        "Security settings and policies",
        &["view", "update", "manage"],
    ),
    tenant("tenant-dashboard", Product::Core, "Tenant dashboard access", &["view"]),
    tenant(
        "tenant-users",
        Product::Core,
        "Manage users within tenant",
        &["read", "create", "update", "delete", "assign-roles", "invite"],
    ),
    tenant("tenant-roles", Product::Core, "Manage tenant roles", CRUD),
    tenant(
        "tenant-platforms",
        Product::Core,
        "Tenant platform catalog",
        &["read", "configure", "manage-settings"],
    ),
    tenant(
        "tenant-billing",
        Product::Core,
        "Tenant billing and subscriptions",
        &[
            "read",
            "view-subscriptions",
            "view-invoices",
            "manage-renewals",
            "view-overview",
            "update",
        ],
    ),
    tenant(
        "tenant-reports",
        Product::Core,
        "Tenant reports and analytics",
        &[
            "view",
            "platform-usage",
            "user-activity",
            "billing-summary",
            "transactions",
            "export",
        ],
    ),
    tenant(
        "tenant-recycle-bin",
        Product::Core,
        "Tenant deleted items recovery",
        &["view", "restore", "view-history"],
    ),
    tenant(
        "tenant-settings",
        Product::Core,
        "Tenant configuration",
        &["read", "update"],
    ),
    tenant(
        "tenant-customers",
        Product::Core,
        "Manage tenant customer records",
        &["read", "create", "update", "delete", "export"],
    ),
    tenant(
        "money-loan:overview",
        Product::MoneyLoan,
        "Overview dashboard metrics",
        &[
            "view",
            "total-loans",
            "collection-rate",
            "overdue-percentage",
            "outstanding-amount",
            "default-rate",
        ],
    ),
    tenant(
        "money-loan",
        Product::MoneyLoan,
        "Base money loan module access",
        &["read", "create", "update", "approve", "payments"],
    ),
    tenant(
        "money-loan:customers",
        Product::MoneyLoan,
        "Customer management",
        &["read", "create", "update", "delete", "view-high-risk"],
    ),
    tenant(
        "money-loan:loans",
        Product::MoneyLoan,
        "Loan management",
        &[
            "read",
            "create",
            "update",
            "delete",
            "approve",
            "disburse",
            "view-overdue",
            "close",
            "use-calculator",
        ],
    ),
    tenant(
        "money-loan:payments",
        Product::MoneyLoan,
        "Payment processing",
        &[
            "read",
            "create",
            "view-today",
            "bulk-import",
            "refund",
            "view-failed",
            "configure-gateway",
        ],
    ),
    tenant(
        "money-loan:interest",
        Product::MoneyLoan,
        "Interest rate management",
        &[
            "read",
            "update",
            "manage-auto-rules",
            "manual-override",
            "use-calculator",
        ],
    ),
    tenant(
        "money-loan:collections",
        Product::MoneyLoan,
        "Collections management",
        &[
            "read",
            "manage-workflow",
            "manage-strategies",
            "legal-actions",
            "view-recovery",
        ],
    ),
    tenant(
        "money-loan:kyc",
        Product::MoneyLoan,
        "KYC verification",
        &[
            "read",
            "review",
            "approve",
            "view-audit-logs",
            "view-webhook-logs",
            "configure",
        ],
    ),
    tenant(
        "money-loan:reports",
        Product::MoneyLoan,
        "Reporting and analytics",
        &[
            "read",
            "generate-periodic",
            "tax-summary",
            "export",
            "custom-queries",
        ],
    ),
    tenant(
        "money-loan:settings",
        Product::MoneyLoan,
        "Product settings",
        &[
            "read",
            "manage-roles",
            "manage-loan-products",
            "manage-templates",
            "manage-branding",
            "manage-api-keys",
            "view-audit-log",
        ],
    ),
    tenant(
        "money-loan:audit",
        Product::MoneyLoan,
        "Audit trail",
        &["read", "view-data-changes", "export"],
    ),
    tenant(
        "money-loan:notifications",
        Product::MoneyLoan,
        "System notifications",
        &["read"],
    ),
    tenant(
        "money-loan:user-management",
        Product::MoneyLoan,
        "Staff management",
        &["manage"],
    ),
    tenant(
        "money-loan:integrations",
        Product::MoneyLoan,
        "External integrations",
        &["configure"],
    ),
    tenant(
        "money-loan:assigned-customers",
        Product::MoneyLoan,
        "View and manage assigned customers",
        &[
            "read",
            "view-details",
            "view-loan-history",
            "view-payment-history",
        ],
    ),
    tenant(
        "money-loan:assigned-applications",
        Product::MoneyLoan,
        "Approve or reject applications within limits",
        &["read", "approve", "reject", "request-review", "view-limits"],
    ),
    tenant(
        "money-loan:assigned-loans",
        Product::MoneyLoan,
        "Disburse approved loans",
        &[
            "read",
            "disburse",
            "view-pending-disbursement",
            "view-disbursement-limits",
            "request-disbursement-approval",
        ],
    ),
    tenant(
        "money-loan:assigned-payments",
        Product::MoneyLoan,
        "Collect payments from customers",
        &[
            "collect",
            "collect-cash",
            "collect-bank-transfer",
            "view-schedule",
            "view-overdue",
            "view-collection-summary",
        ],
    ),
    tenant(
        "money-loan:penalties",
        Product::MoneyLoan,
        "Waive penalties within limits",
        &[
            "view",
            "waive-partial",
            "waive-request",
            "view-waiver-history",
            "view-waiver-limits",
            "approve-waiver",
        ],
    ),
    tenant(
        "money-loan:route",
        Product::MoneyLoan,
        "GPS tracking and visit management",
        &[
            "view",
            "check-in",
            "record-visit",
            "upload-photo",
            "capture-signature",
            "view-visit-history",
            "optimize",
        ],
    ),
    tenant(
        "money-loan:collector-reports",
        Product::MoneyLoan,
        "Performance and collection reports",
        &[
            "view-daily",
            "view-weekly",
            "view-monthly",
            "view-targets",
            "export",
        ],
    ),
    tenant(
        "money-loan:collection-activities",
        Product::MoneyLoan,
        "Collection activity tracking",
        &["create", "view", "follow-up", "escalate"],
    ),
    tenant(
        "money-loan:collector-management",
        Product::MoneyLoan,
        "Manage collectors",
        &[
            "read",
            "assign-customers",
            "set-limits",
            "set-targets",
            "view-all-performance",
            "view-action-logs",
            "view-gps-tracking",
            "manage",
        ],
    ),
    tenant(
        "money-loan:collector-notifications",
        Product::MoneyLoan,
        "Collector notifications",
        &["view", "send-reminder"],
    ),
    tenant(
        "money-loan:collector",
        Product::MoneyLoan,
        "Extend grace periods for customers",
        &["grace-extension"],
    ),
    tenant(
        "bnpl",
        Product::Bnpl,
        "Buy now, pay later management",
        &["read", "create", "update", "manage"],
    ),
    tenant(
        "pawnshop",
        Product::Pawnshop,
        "Pawnshop operations",
        &["read", "create", "update", "manage"],
    ),
    customer("customer-dashboard", "Customer dashboard access", &["view"]),
    customer(
        "customer-profile",
        "Manage own customer profile",
        &["read", "update"],
    ),
    customer("customer-loans", "Customer loan activities", &["read", "apply"]),
    customer(
        "customer-payments",
        "Customer payment actions",
        &["read", "create"],
    ),
];
