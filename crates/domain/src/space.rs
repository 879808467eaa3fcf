use std::fmt::{Display, Formatter};
use std::str::FromStr;

use loanflow_core::AppError;
use serde::{Deserialize, Serialize};

/// Top-level scope of a role or permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    /// Platform operators.
    System,
    /// One customer organization of the platform.
    Tenant,
    /// End customers of a tenant.
    Customer,
}

impl Space {
    /// Returns a stable storage value for this space.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Tenant => "tenant",
            Self::Customer => "customer",
        }
    }

    /// Returns all spaces.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::System, Self::Tenant, Self::Customer]
    }
}

impl Display for Space {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Space {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "system" => Ok(Self::System),
            "tenant" => Ok(Self::Tenant),
            "customer" => Ok(Self::Customer),
            _ => Err(AppError::Validation(format!(
                "unknown space '{value}', expected system, tenant or customer"
            ))),
        }
    }
}

/// Business line namespace inside tenant space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Product {
    /// Tenant administration shared by every product.
    Core,
    /// Money lending.
    MoneyLoan,
    /// Buy now, pay later.
    Bnpl,
    /// Pawnshop operations.
    Pawnshop,
}

impl Product {
    /// Returns a stable storage value for this product.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::MoneyLoan => "money-loan",
            Self::Bnpl => "bnpl",
            Self::Pawnshop => "pawnshop",
        }
    }

    /// Returns all products.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Core, Self::MoneyLoan, Self::Bnpl, Self::Pawnshop]
    }
}

impl Display for Product {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "core" => Ok(Self::Core),
            "money-loan" => Ok(Self::MoneyLoan),
            "bnpl" => Ok(Self::Bnpl),
            "pawnshop" => Ok(Self::Pawnshop),
            _ => Err(AppError::Validation(format!("unknown product '{value}'"))),
        }
    }
}

/// Space selector used when listing the permission catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpaceFilter {
    /// Every space.
    #[default]
    All,
    /// One space only.
    Only(Space),
}

impl SpaceFilter {
    /// Returns whether a permission in `space` passes this filter.
    #[must_use]
    pub fn admits(&self, space: Space) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => *selected == space,
        }
    }
}

impl From<Option<Space>> for SpaceFilter {
    fn from(value: Option<Space>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl FromStr for SpaceFilter {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" | "all" => Ok(Self::All),
            other => Space::from_str(other).map(Self::Only),
        }
    }
}
