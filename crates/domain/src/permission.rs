//! Permission keys and catalog descriptors.
//!
//! A key is written `resource:action`. Resources may contain colons themselves
//! (`money-loan:assigned-customers`), so the action is always the segment after
//! the final colon.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use loanflow_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::space::{Product, Space};

/// Atomic grantable unit, `resource:action`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey {
    resource: String,
    action: String,
}

impl PermissionKey {
    /// Creates a key from its resource and action parts.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> AppResult<Self> {
        let resource = resource.into();
        let action = action.into();

        if resource.trim().is_empty() {
            return Err(AppError::Validation(
                "permission resource must not be empty".to_owned(),
            ));
        }
        if action.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "permission '{resource}' is missing an action"
            )));
        }
        if action.contains(':') {
            return Err(AppError::Validation(format!(
                "permission action '{action}' must not contain ':'"
            )));
        }
        if resource.split(':').any(|segment| segment.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "permission resource '{resource}' contains an empty segment"
            )));
        }

        Ok(Self { resource, action })
    }

    /// Parses the wire format `resource:action`.
    pub fn parse(value: &str) -> AppResult<Self> {
        let Some((resource, action)) = value.trim().rsplit_once(':') else {
            return Err(AppError::Validation(format!(
                "permission key '{value}' must have the form resource:action"
            )));
        };

        Self::new(resource, action)
    }

    /// Returns the resource part, which may itself contain colons.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the action part.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for PermissionKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<PermissionKey> for String {
    fn from(value: PermissionKey) -> Self {
        value.to_string()
    }
}

/// Catalog entry describing one grantable permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDescriptor {
    key: PermissionKey,
    space: Space,
    product: Option<Product>,
    description: String,
}

impl PermissionDescriptor {
    /// Creates a descriptor. Products are only meaningful in tenant space.
    pub fn new(
        key: PermissionKey,
        space: Space,
        product: Option<Product>,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        if product.is_some() && space != Space::Tenant {
            return Err(AppError::Validation(format!(
                "permission '{key}' in {space} space cannot belong to a product"
            )));
        }

        Ok(Self {
            key,
            space,
            product,
            description: description.into(),
        })
    }

    /// Returns the permission key.
    #[must_use]
    pub fn key(&self) -> &PermissionKey {
        &self.key
    }

    /// Returns the permission space.
    #[must_use]
    pub fn space(&self) -> Space {
        self.space
    }

    /// Returns the declared product namespace.
    #[must_use]
    pub fn product(&self) -> Option<Product> {
        self.product
    }

    /// Returns the product used for filtering: tenant entries without one are `core`.
    #[must_use]
    pub fn effective_product(&self) -> Option<Product> {
        match self.space {
            Space::Tenant => Some(self.product.unwrap_or(Product::Core)),
            Space::System | Space::Customer => None,
        }
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}
