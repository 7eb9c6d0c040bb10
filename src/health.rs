//! Component health reported by `/health`
//!
//! Each [`HealthChecker`] covers one dependency; today that is only the
//! database connection. A check either passes or fails with a reason, and
//! the report is unhealthy as soon as one selected check fails.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

/// Name reported in every health response
pub const SERVICE_NAME: &str = "lab-analytics";

/// Value of `?check=` that selects every component
pub const CHECK_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of checking one component
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    /// Failure reason, absent when healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    /// Results keyed by component name; empty unless `?check=` was given
    #[schema(value_type = Object)]
    pub checks: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// Component name, matched against `?check=`
    fn name(&self) -> &str;

    /// Check the component, returning the failure reason
    async fn check(&self) -> Result<(), String>;
}

/// Fixed set of component checks, chosen at startup
pub struct HealthService {
    checkers: Vec<Arc<dyn HealthChecker>>,
}

impl HealthService {
    pub fn new(checkers: Vec<Arc<dyn HealthChecker>>) -> Self {
        Self { checkers }
    }

    pub fn checker_names(&self) -> Vec<&str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    /// Run the component named by `filter` (or all of them for `all`).
    /// Without a filter only service metadata is reported.
    pub async fn check_health(&self, filter: Option<&str>) -> HealthResponse {
        let mut checks = BTreeMap::new();

        let selected = self.checkers.iter().filter(|checker| match filter {
            Some(CHECK_ALL) => true,
            Some(name) => checker.name() == name,
            None => false,
        });

        for checker in selected {
            let start = Instant::now();
            let outcome = checker.check().await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let component = match outcome {
                Ok(()) => ComponentHealth {
                    status: HealthStatus::Healthy,
                    error: None,
                    duration_ms,
                },
                Err(reason) => ComponentHealth {
                    status: HealthStatus::Unhealthy,
                    error: Some(reason),
                    duration_ms,
                },
            };
            checks.insert(checker.name().to_string(), component);
        }

        let status = if checks
            .values()
            .any(|c| c.status == HealthStatus::Unhealthy)
        {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };

        HealthResponse {
            status,
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks,
        }
    }
}
