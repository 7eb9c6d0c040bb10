//! Aggregation routines behind the lab endpoints
//!
//! Every routine performs a bounded read through the injected
//! [`DatabaseManager`] and reduces the records in memory. Spend and revenue
//! figures are always Σ(quantity × unit price) with a missing quantity or
//! price contributing zero, accumulated as [`Decimal`] and emitted as JSON
//! numbers.

use crate::database::{DatabaseError, DatabaseManager, DatabaseResult, OrderQuery};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use utoipa::ToSchema;

pub mod country_stats;
pub mod frequent_buyers;
pub mod monthly_sales;
pub mod non_selling;
pub mod top_spenders;

pub use country_stats::{CountryStats, country_order_stats};
pub use frequent_buyers::{DEFAULT_MIN_ORDERS, frequent_buyers};
pub use monthly_sales::{
    MonthlySales, ReportPeriod, SalesReport, StatusBreakdown, monthly_sales_report,
};
pub use non_selling::{NonSellingProduct, non_selling_products};
pub use top_spenders::{DEFAULT_LIMIT, top_spenders};

/// Analytics error types
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Customer fields with their order count and total spend
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CustomerSpendingSummary {
    /// Customer ID
    pub customer_id: i32,
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: String,
    /// Customer country
    pub country: Option<String>,
    /// Number of orders placed by customer
    #[serde(rename = "orderCount")]
    pub order_count: i64,
    /// Total amount spent by customer
    #[serde(rename = "totalSpent")]
    pub total_spent: f64,
}

/// Convert an accumulated amount into the number emitted over the wire
pub(crate) fn to_amount(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Total spend per customer over all of their orders
pub(crate) async fn spend_by_customer(
    database: &dyn DatabaseManager,
    customer_ids: Vec<i32>,
) -> DatabaseResult<HashMap<i32, Decimal>> {
    let query = OrderQuery {
        customer_ids: Some(customer_ids),
        ..Default::default()
    };

    let mut totals: HashMap<i32, Decimal> = HashMap::new();
    for (order, items) in database.orders().find_with_items(&query).await? {
        let Some(customer_id) = order.customer_id else {
            continue;
        };
        let order_total: Decimal = items.iter().map(|item| item.line_total()).sum();
        *totals.entry(customer_id).or_default() += order_total;
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_amount() {
        assert_eq!(to_amount(Decimal::ZERO), 0.0);
        assert!((to_amount(Decimal::new(1999, 2)) - 19.99).abs() < 1e-12);
    }

    #[test]
    fn test_customer_summary_serializes_camel_case_totals() {
        let summary = CustomerSpendingSummary {
            customer_id: 7,
            name: "Eve".to_string(),
            email: "eve@example.com".to_string(),
            country: None,
            order_count: 3,
            total_spent: 12.5,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["customer_id"], 7);
        assert_eq!(json["orderCount"], 3);
        assert_eq!(json["totalSpent"], 12.5);
        assert!(json["country"].is_null());
    }
}
