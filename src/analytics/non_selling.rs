use super::{AnalyticsResult, to_amount};
use crate::database::DatabaseManager;
use serde::Serialize;
use utoipa::ToSchema;

/// A product that has never been ordered
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(as = Product)]
pub struct NonSellingProduct {
    /// Product ID
    pub product_id: i32,
    /// Product name
    pub name: String,
    /// Product category
    pub category: Option<String>,
    /// Product price
    pub price: Option<f64>,
}

/// Products without a single order item, in product id order.
pub async fn non_selling_products(
    database: &dyn DatabaseManager,
) -> AnalyticsResult<Vec<NonSellingProduct>> {
    let products = database.products().find_never_ordered().await?;

    Ok(products
        .into_iter()
        .map(|product| NonSellingProduct {
            product_id: product.product_id,
            name: product.name,
            category: product.category,
            price: product.price.map(to_amount),
        })
        .collect())
}
