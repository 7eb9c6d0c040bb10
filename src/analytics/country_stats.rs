use super::{AnalyticsResult, to_amount};
use crate::database::{DatabaseManager, OrderDetails, OrderQuery};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Country label for orders whose customer has no country on record
const UNKNOWN_COUNTRY: &str = "Unknown";

/// Average order value for one country
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryStats {
    /// Country name
    pub country: String,
    /// Average order value
    pub average_order_value: f64,
    /// Total number of orders
    pub total_orders: u64,
}

/// Average order value and order count per customer country.
pub async fn country_order_stats(
    database: &dyn DatabaseManager,
) -> AnalyticsResult<Vec<CountryStats>> {
    let orders = database
        .orders()
        .find_with_details(&OrderQuery::default())
        .await?;

    Ok(group_by_country(&orders))
}

fn group_by_country(orders: &[OrderDetails]) -> Vec<CountryStats> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Decimal, u64)> = Vec::new();

    for details in orders {
        let country = details
            .customer
            .as_ref()
            .and_then(|customer| customer.country.as_deref())
            .filter(|country| !country.is_empty())
            .unwrap_or(UNKNOWN_COUNTRY);

        let index = *positions.entry(country).or_insert_with(|| {
            groups.push((country, Decimal::ZERO, 0));
            groups.len() - 1
        });
        let group = &mut groups[index];
        group.1 += details.total();
        group.2 += 1;
    }

    groups
        .into_iter()
        .map(|(country, total_value, order_count)| CountryStats {
            country: country.to_string(),
            average_order_value: to_amount(total_value / Decimal::from(order_count)),
            total_orders: order_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::{CustomerRecord, OrderItemRecord, OrderRecord};

    fn details(id: i32, country: Option<&str>, cents: &[i64]) -> OrderDetails {
        let customer = country.map(|c| CustomerRecord {
            customer_id: id,
            name: format!("Customer {id}"),
            email: format!("c{id}@example.com"),
            country: if c.is_empty() { None } else { Some(c.to_string()) },
        });
        OrderDetails {
            order: OrderRecord {
                order_id: id,
                customer_id: customer.as_ref().map(|c| c.customer_id),
                order_date: None,
                status: Some("pending".to_string()),
            },
            items: cents
                .iter()
                .map(|c| OrderItemRecord {
                    order_item_id: 0,
                    order_id: id,
                    product_id: None,
                    quantity: Some(1),
                    unit_price: Some(Decimal::new(*c, 2)),
                })
                .collect(),
            customer,
        }
    }

    #[test]
    fn test_group_by_country_first_occurrence_order() {
        let orders = vec![
            details(1, Some("FR"), &[1000]),
            details(2, Some("BR"), &[500, 500]),
            details(3, Some("FR"), &[3000]),
            details(4, None, &[700]),
            details(5, Some(""), &[]),
        ];

        let stats = group_by_country(&orders);
        assert_eq!(
            stats.iter().map(|s| s.country.as_str()).collect::<Vec<_>>(),
            vec!["FR", "BR", "Unknown"]
        );
        assert_eq!(stats[0].total_orders, 2);
        assert_eq!(stats[0].average_order_value, 20.0);
        assert_eq!(stats[1].average_order_value, 10.0);
        assert_eq!(stats[2].total_orders, 2);
        assert_eq!(stats[2].average_order_value, 3.5);

        for row in &stats {
            assert!(row.total_orders > 0);
        }
    }

    #[test]
    fn test_group_by_country_serializes_camel_case() {
        let stats = group_by_country(&[details(1, Some("JP"), &[250])]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"country": "JP", "averageOrderValue": 2.5, "totalOrders": 1}])
        );
    }
}
