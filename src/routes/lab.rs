use crate::{
    analytics::{
        self, CountryStats, CustomerSpendingSummary, DEFAULT_LIMIT, NonSellingProduct,
        SalesReport,
    },
    error::AppError,
    routes::{ApiErrorResponse, ApiQuery, ApiResponse},
    server::Server,
};
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::get,
};
use serde::Deserialize;
use std::str::FromStr;
use utoipa::IntoParams;

/// Frequent-customer threshold applied when `minOrders` is omitted.
/// The routine itself falls back to [`analytics::DEFAULT_MIN_ORDERS`].
pub const DEFAULT_FREQUENT_MIN_ORDERS: i64 = 2;

const MAX_YEAR: i32 = 9999;

/// Create lab analytics routes
pub fn create_lab_routes() -> Router<Server> {
    Router::new()
        .route("/lab/top-spenders", get(get_top_spenders))
        .route("/lab/monthly-sales", get(get_monthly_sales))
        .route("/lab/non-selling-products", get(get_non_selling_products))
        .route("/lab/country-stats", get(get_country_order_stats))
        .route("/lab/frequent-customers", get(get_frequent_customers))
}

/// Query parameters for top spenders
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopSpendersQuery {
    /// Number of customers to return (default: 10)
    #[param(value_type = Option<u64>)]
    pub limit: Option<String>,
}

/// Query parameters for the monthly sales report
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlySalesQuery {
    /// Year of the report
    #[param(value_type = i32)]
    pub year: Option<String>,
    /// Month of the report (1-12); the whole year with a monthly breakdown when omitted
    #[param(value_type = Option<u32>, minimum = 1, maximum = 12)]
    pub month: Option<String>,
}

/// Query parameters for frequent customers
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FrequentCustomersQuery {
    /// Customers must have strictly more orders than this (default: 2)
    #[serde(rename = "minOrders")]
    #[param(value_type = Option<i64>)]
    pub min_orders: Option<String>,
}

/// Parse an optional numeric query parameter. Absent or empty means "use the
/// default"; anything else must parse.
fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| {
            AppError::BadRequest(format!("Invalid value for '{}': {}", name, value))
        }),
    }
}

/// Get top customers by spending
#[utoipa::path(
    get,
    path = "/api/lab/top-spenders",
    summary = "Get top customers by spending",
    description = "Customers ranked by number of orders, with the total they spent",
    params(TopSpendersQuery),
    responses(
        (status = 200, description = "List of top spending customers", body = ApiResponse<Vec<CustomerSpendingSummary>>),
        (status = 400, description = "Invalid query parameters", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_top_spenders(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<TopSpendersQuery>,
) -> Result<Json<ApiResponse<Vec<CustomerSpendingSummary>>>, AppError> {
    let limit = parse_param::<u64>("limit", params.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);

    let customers = analytics::top_spenders(server.database.as_ref(), Some(limit)).await?;

    Ok(Json(ApiResponse::new(
        customers,
        "Top spending customers retrieved successfully",
    )))
}

/// Get monthly sales report
#[utoipa::path(
    get,
    path = "/api/lab/monthly-sales",
    summary = "Get monthly sales report",
    description = "Shipped and delivered orders for a month, or for a whole year with a monthly breakdown",
    params(MonthlySalesQuery),
    responses(
        (status = 200, description = "Sales report for the period", body = ApiResponse<SalesReport>),
        (status = 400, description = "Missing year or month out of range", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_monthly_sales(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<MonthlySalesQuery>,
) -> Result<Json<ApiResponse<SalesReport>>, AppError> {
    let year = parse_param::<i32>("year", params.year.as_deref())?
        .ok_or_else(|| AppError::BadRequest("Year is a required parameter".to_string()))?;
    if !(1..=MAX_YEAR).contains(&year) {
        return Err(AppError::BadRequest(format!(
            "Year must be between 1 and {}",
            MAX_YEAR
        )));
    }

    let month = match parse_param::<i64>("month", params.month.as_deref())? {
        Some(month) if (1..=12).contains(&month) => Some(month as u32),
        Some(_) => {
            return Err(AppError::BadRequest(
                "Month must be between 1 and 12".to_string(),
            ));
        }
        None => None,
    };

    let report = analytics::monthly_sales_report(server.database.as_ref(), year, month).await?;

    Ok(Json(ApiResponse::new(
        report,
        "Monthly sales report retrieved successfully",
    )))
}

/// Get products that have never been ordered
#[utoipa::path(
    get,
    path = "/api/lab/non-selling-products",
    summary = "Get non-selling products",
    description = "Products that do not appear in any order item",
    responses(
        (status = 200, description = "List of products never ordered", body = ApiResponse<Vec<NonSellingProduct>>),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_non_selling_products(
    State(server): State<Server>,
) -> Result<Json<ApiResponse<Vec<NonSellingProduct>>>, AppError> {
    let products = analytics::non_selling_products(server.database.as_ref()).await?;

    Ok(Json(ApiResponse::new(
        products,
        "Non-selling products retrieved successfully",
    )))
}

/// Get average order value by country
#[utoipa::path(
    get,
    path = "/api/lab/country-stats",
    summary = "Get country-wise order statistics",
    description = "Average order value and order count grouped by customer country",
    responses(
        (status = 200, description = "Country-wise order statistics", body = ApiResponse<Vec<CountryStats>>),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_country_order_stats(
    State(server): State<Server>,
) -> Result<Json<ApiResponse<Vec<CountryStats>>>, AppError> {
    let stats = analytics::country_order_stats(server.database.as_ref()).await?;

    Ok(Json(ApiResponse::new(
        stats,
        "Country-wise order statistics retrieved successfully",
    )))
}

/// Get frequent customers
#[utoipa::path(
    get,
    path = "/api/lab/frequent-customers",
    summary = "Get frequent customers",
    description = "Customers with more orders than the given minimum, with the total they spent",
    params(FrequentCustomersQuery),
    responses(
        (status = 200, description = "List of frequent customers", body = ApiResponse<Vec<CustomerSpendingSummary>>),
        (status = 400, description = "Invalid query parameters", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_frequent_customers(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<FrequentCustomersQuery>,
) -> Result<Json<ApiResponse<Vec<CustomerSpendingSummary>>>, AppError> {
    let min_orders = parse_param::<i64>("minOrders", params.min_orders.as_deref())?
        .unwrap_or(DEFAULT_FREQUENT_MIN_ORDERS);

    let customers = analytics::frequent_buyers(server.database.as_ref(), Some(min_orders)).await?;

    Ok(Json(ApiResponse::new(
        customers,
        "Frequent customers retrieved successfully",
    )))
}
