use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use loanflow_core::AppError;
use loanflow_domain::PlanningPolicy;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,loanflow_api=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub allow_system_tenant_override: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let frontend_url = lookup("FRONTEND_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };
        let allow_system_tenant_override = match lookup("RBAC_ALLOW_SYSTEM_TENANT_OVERRIDE") {
            Some(value) => parse_flag("RBAC_ALLOW_SYSTEM_TENANT_OVERRIDE", value.as_str())?,
            None => true,
        };

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            allow_system_tenant_override,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    pub fn planning_policy(&self) -> PlanningPolicy {
        PlanningPolicy {
            allow_cross_space_for_system: self.allow_system_tenant_override,
        }
    }
}

pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "{name} must be true or false, got '{other}'"
        ))),
    }
}
