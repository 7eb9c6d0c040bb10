//! Small demo dataset used by `init database --seed-demo` and by tests
//!
//! The rows cover several countries (and a customer without one), orders in
//! several months and statuses, items with a missing quantity or price, a
//! customer with no orders and a product nobody ordered.

use crate::database::entities::{
    CustomerRecord, Customers, OrderItemRecord, OrderItems, OrderRecord, Orders, ProductRecord,
    Products,
};
use crate::database::{DatabaseError, DatabaseManager, DatabaseResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use tracing::info;

/// (name, email, country)
const CUSTOMERS: &[(&str, &str, Option<&str>)] = &[
    ("Alice Johnson", "alice@example.com", Some("USA")),
    ("Bruno Silva", "bruno@example.com", Some("Brazil")),
    ("Chen Wei", "chen@example.com", Some("China")),
    ("Dana Smith", "dana@example.com", Some("USA")),
    ("Erik Larsen", "erik@example.com", None),
    ("Fatima Khan", "fatima@example.com", Some("Pakistan")),
];

/// (name, category, price in cents)
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("Laptop", "Electronics", 120000),
    ("Headphones", "Electronics", 15000),
    ("Coffee Mug", "Kitchen", 1250),
    ("Desk Lamp", "Home", 4500),
    ("Typewriter", "Vintage", 30000),
];

/// Order line: (product index, quantity, unit price in cents)
type Line = (usize, Option<i32>, Option<i64>);

/// (customer index, (y, m, d), status, lines)
const ORDERS: &[(usize, (i32, u32, u32), &str, &[Line])] = &[
    (0, (2024, 1, 15), "delivered", &[(0, Some(1), Some(120000))]),
    (0, (2024, 2, 10), "shipped", &[(1, Some(2), Some(15000))]),
    (0, (2024, 2, 20), "pending", &[(2, Some(4), Some(1250))]),
    (
        1,
        (2024, 1, 20),
        "delivered",
        &[(2, Some(2), Some(1250)), (3, Some(1), Some(4500))],
    ),
    (1, (2024, 3, 5), "cancelled", &[(1, Some(1), Some(15000))]),
    (
        2,
        (2024, 2, 14),
        "shipped",
        &[(3, Some(2), Some(4500)), (3, None, Some(4500))],
    ),
    (3, (2024, 3, 1), "delivered", &[(0, Some(1), Some(110000))]),
    (
        4,
        (2023, 12, 30),
        "delivered",
        &[(2, Some(1), None), (1, Some(1), Some(15000))],
    ),
    (0, (2024, 3, 15), "delivered", &[(2, Some(2), Some(1250))]),
];

/// Number of rows written by [`seed_demo_data`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    pub order_items: usize,
}

/// Insert the demo dataset. Skipped when customers already exist unless
/// `force` is set, in which case every table is cleared first.
pub async fn seed_demo_data(
    database: &dyn DatabaseManager,
    force: bool,
) -> DatabaseResult<SeedSummary> {
    if force {
        info!("Force seeding enabled - clearing existing data");
        clear_all(database).await?;
    } else if database.customers().count().await? > 0 {
        return Ok(SeedSummary::default());
    }

    let mut summary = SeedSummary::default();

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, email, country) in CUSTOMERS {
        let mut customer = CustomerRecord::new(*name, *email);
        if let Some(country) = country {
            customer = customer.with_country(*country);
        }
        customer_ids.push(database.customers().insert(&customer).await?);
        summary.customers += 1;
    }

    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, category, cents) in PRODUCTS {
        let product = ProductRecord::new(*name, *category, Decimal::new(*cents, 2));
        product_ids.push(database.products().insert(&product).await?);
        summary.products += 1;
    }

    let orders = database.orders();
    for (customer, (y, m, d), status, lines) in ORDERS {
        let date = NaiveDate::from_ymd_opt(*y, *m, *d)
            .ok_or_else(|| DatabaseError::Database(format!("invalid seed date {y}-{m}-{d}")))?;
        let order_id = orders
            .insert(&OrderRecord::new(customer_ids[*customer], date, *status))
            .await?;
        summary.orders += 1;

        for (product, quantity, cents) in lines.iter() {
            let item = OrderItemRecord::new(
                order_id,
                product_ids[*product],
                *quantity,
                (*cents).map(|c| Decimal::new(c, 2)),
            );
            orders.insert_item(&item).await?;
            summary.order_items += 1;
        }
    }

    Ok(summary)
}

async fn clear_all(database: &dyn DatabaseManager) -> DatabaseResult<()> {
    let connection = database.connection();
    let db_err = |e: sea_orm::DbErr| DatabaseError::Database(e.to_string());

    OrderItems::delete_many()
        .exec(connection)
        .await
        .map_err(db_err)?;
    Orders::delete_many().exec(connection).await.map_err(db_err)?;
    Products::delete_many()
        .exec(connection)
        .await
        .map_err(db_err)?;
    Customers::delete_many()
        .exec(connection)
        .await
        .map_err(db_err)?;
    Ok(())
}
