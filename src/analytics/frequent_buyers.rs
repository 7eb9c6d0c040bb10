use super::{AnalyticsResult, CustomerSpendingSummary, spend_by_customer, to_amount};
use crate::database::DatabaseManager;
use tracing::debug;

/// Threshold used when the caller gives none. The HTTP endpoint applies its
/// own default of 2 before calling in.
pub const DEFAULT_MIN_ORDERS: i64 = 1;

/// Customers with strictly more than `min_orders` orders, in customer id order.
pub async fn frequent_buyers(
    database: &dyn DatabaseManager,
    min_orders: Option<i64>,
) -> AnalyticsResult<Vec<CustomerSpendingSummary>> {
    let min_orders = min_orders.unwrap_or(DEFAULT_MIN_ORDERS);

    let frequent: Vec<_> = database
        .customers()
        .find_all_with_order_count()
        .await?
        .into_iter()
        .filter(|customer| customer.order_count > min_orders)
        .collect();

    let ids = frequent.iter().map(|c| c.customer_id).collect();
    let totals = spend_by_customer(database, ids).await?;

    debug!(min_orders, customers = frequent.len(), "Computed frequent buyers");

    Ok(frequent
        .into_iter()
        .map(|customer| CustomerSpendingSummary {
            total_spent: to_amount(
                totals
                    .get(&customer.customer_id)
                    .copied()
                    .unwrap_or_default(),
            ),
            customer_id: customer.customer_id,
            name: customer.name,
            email: customer.email,
            country: customer.country,
            order_count: customer.order_count,
        })
        .collect())
}
