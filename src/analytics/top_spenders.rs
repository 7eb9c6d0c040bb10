use super::{AnalyticsResult, CustomerSpendingSummary, spend_by_customer, to_amount};
use crate::database::DatabaseManager;
use tracing::debug;

/// Number of customers returned when no limit is given
pub const DEFAULT_LIMIT: u64 = 10;

/// Customers with the most orders, at most `limit` of them, with their total spend.
///
/// The ranking is by order count, not by spend; the spend is reported
/// alongside.
pub async fn top_spenders(
    database: &dyn DatabaseManager,
    limit: Option<u64>,
) -> AnalyticsResult<Vec<CustomerSpendingSummary>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Ok(Vec::new());
    }

    let ranked = database.customers().find_ranked_by_order_count(limit).await?;
    let ids = ranked.iter().map(|c| c.customer_id).collect();
    let totals = spend_by_customer(database, ids).await?;

    debug!(limit, customers = ranked.len(), "Computed top spenders");

    Ok(ranked
        .into_iter()
        .map(|customer| {
            let total_spent = totals
                .get(&customer.customer_id)
                .copied()
                .unwrap_or_default();
            CustomerSpendingSummary {
                customer_id: customer.customer_id,
                name: customer.name,
                email: customer.email,
                country: customer.country,
                order_count: customer.order_count,
                total_spent: to_amount(total_spent),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::{CustomerRecord, OrderItemRecord, OrderRecord, ProductRecord};
    use crate::test_utils::test_database;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_default_limit_is_ten() {
        let database = test_database().await;
        for i in 0..12 {
            database
                .customers()
                .insert(&CustomerRecord::new(
                    format!("Customer {i}"),
                    format!("c{i}@example.com"),
                ))
                .await
                .unwrap();
        }

        let ranked = top_spenders(database.as_ref(), None).await.unwrap();
        assert_eq!(ranked.len(), DEFAULT_LIMIT as usize);

        let all = top_spenders(database.as_ref(), Some(u64::MAX)).await.unwrap();
        assert_eq!(all.len(), 12);

        assert!(top_spenders(database.as_ref(), Some(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ranked_by_order_count_not_spend() {
        let database = test_database().await;
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let product = database
            .products()
            .insert(&ProductRecord::new("Widget", "Tools", Decimal::new(500, 2)))
            .await
            .unwrap();

        let big = database
            .customers()
            .insert(&CustomerRecord::new("Big", "big@example.com"))
            .await
            .unwrap();
        let busy = database
            .customers()
            .insert(&CustomerRecord::new("Busy", "busy@example.com"))
            .await
            .unwrap();

        let orders = database.orders();
        let order = orders
            .insert(&OrderRecord::new(big, date, "delivered"))
            .await
            .unwrap();
        let item = OrderItemRecord::new(order, product, Some(1), Some(Decimal::new(100000, 2)));
        orders.insert_item(&item).await.unwrap();
        for _ in 0..2 {
            let order = orders
                .insert(&OrderRecord::new(busy, date, "delivered"))
                .await
                .unwrap();
            let item = OrderItemRecord::new(order, product, Some(1), Some(Decimal::new(500, 2)));
            orders.insert_item(&item).await.unwrap();
        }

        let ranked = top_spenders(database.as_ref(), None).await.unwrap();
        assert_eq!(ranked[0].customer_id, busy);
        assert_eq!(ranked[0].order_count, 2);
        assert!((ranked[0].total_spent - 10.0).abs() < 1e-9);
        assert_eq!(ranked[1].customer_id, big);
        assert!((ranked[1].total_spent - 1000.0).abs() < 1e-9);
    }
}
