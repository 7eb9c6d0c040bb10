use crate::{health::HealthResponse, routes::ApiQuery, server::Server};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HealthCheckQuery {
    /// Component to check, or `all` to run every check
    #[serde(default)]
    pub check: Option<String>,
}

/// Create health check routes
///
/// `/healthz` answers load balancers without touching the database.
/// `/health` runs component checks on request.
pub fn create_health_routes() -> Router<Server> {
    Router::new()
        .route("/healthz", get(liveness))
        .route("/health", get(health_check))
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/healthz",
    summary = "Liveness check",
    responses(
        (status = 200, description = "Service is running", body = String, content_type = "text/plain")
    ),
    tag = "Health"
)]
pub async fn liveness() -> &'static str {
    "healthy"
}

/// Component health check
#[utoipa::path(
    get,
    path = "/health",
    summary = "Component health check",
    description = "Runs the requested component checks; without `check` only reports service metadata",
    params(HealthCheckQuery),
    responses(
        (status = 200, description = "Every selected component is healthy", body = HealthResponse),
        (status = 503, description = "At least one component is unhealthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<HealthCheckQuery>,
) -> (StatusCode, Json<HealthResponse>) {
    let health_response = server
        .health_service
        .check_health(params.check.as_deref())
        .await;

    let status = if health_response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health_response))
}
