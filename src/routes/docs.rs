use crate::{error::AppError, server::Server};
use axum::{Router, http::header, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lab Analytics API",
        version = "1.0.0",
        description = "Read-only sales analytics over customers, orders and products"
    ),
    paths(
        crate::routes::health::liveness,
        crate::routes::health::health_check,
        crate::routes::lab::get_top_spenders,
        crate::routes::lab::get_monthly_sales,
        crate::routes::lab::get_non_selling_products,
        crate::routes::lab::get_country_order_stats,
        crate::routes::lab::get_frequent_customers,
    ),
    components(
        schemas(
            crate::routes::ApiErrorResponse,
            crate::health::HealthResponse,
            crate::health::HealthStatus,
            crate::health::ComponentHealth,
            crate::analytics::CustomerSpendingSummary,
            crate::analytics::SalesReport,
            crate::analytics::MonthlySales,
            crate::analytics::StatusBreakdown,
            crate::analytics::NonSellingProduct,
            crate::analytics::CountryStats,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Analytics", description = "Sales analytics over customers, orders and products"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn create_docs_routes() -> Router<Server> {
    Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api-docs/openapi.yaml", get(openapi_yaml))
}

/// Serve OpenAPI specification as YAML
async fn openapi_yaml() -> Result<([(header::HeaderName, &'static str); 1], String), AppError> {
    let spec = ApiDoc::openapi();
    let yaml = serde_yaml_ng::to_string(&spec).map_err(|e| {
        AppError::Internal(format!("Failed to serialize OpenAPI spec to YAML: {e}"))
    })?;

    Ok(([(header::CONTENT_TYPE, "application/yaml")], yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[test]
    fn test_openapi_lists_lab_paths() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/lab/top-spenders",
            "/api/lab/monthly-sales",
            "/api/lab/non-selling-products",
            "/api/lab/country-stats",
            "/api/lab/frequent-customers",
            "/healthz",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn test_openapi_json() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_docs_routes().with_state(server);

        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("application/json"));
    }

    #[tokio::test]
    async fn test_openapi_yaml() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_docs_routes().with_state(server);

        let request = Request::builder()
            .uri("/api-docs/openapi.yaml")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("application/yaml"));
    }

    #[tokio::test]
    async fn test_swagger_ui() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_docs_routes().with_state(server);

        let request = Request::builder()
            .uri("/api-docs")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_redirection() || response.status() == StatusCode::OK);
    }
}
