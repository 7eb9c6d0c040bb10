use crate::database::entities::{
    CustomerRecord, OrderItemRecord, OrderRecord, customers, order_items, orders,
};
use crate::database::{DatabaseError, DatabaseResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use std::collections::HashMap;

/// Upper bound on customer ids bound into a single `IN (...)` filter.
/// SQLite rejects statements with more than 32766 bound variables.
pub const MAX_IDS_PER_QUERY: usize = 1000;

/// Order query parameters
#[derive(Debug, Default, Clone)]
pub struct OrderQuery {
    /// Inclusive lower bound on `order_date`
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `order_date`
    pub end_date: Option<NaiveDate>,
    /// Keep only orders whose status is one of these (exact match)
    pub statuses: Option<Vec<String>>,
    /// Keep only orders placed by these customers
    pub customer_ids: Option<Vec<i32>>,
}

/// An order together with its line items and (optional) customer
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: OrderRecord,
    pub items: Vec<OrderItemRecord>,
    pub customer: Option<CustomerRecord>,
}

impl OrderDetails {
    /// Sum of quantity × unit price over the order's items
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItemRecord::line_total).sum()
    }
}

/// Orders DAO for database operations
pub struct OrdersDao {
    db: DatabaseConnection,
}

impl OrdersDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store an order and return the assigned id
    pub async fn insert(&self, order: &OrderRecord) -> DatabaseResult<i32> {
        let active_model = orders::ActiveModel {
            order_id: ActiveValue::NotSet,
            customer_id: Set(order.customer_id),
            order_date: Set(order.order_date),
            status: Set(order.status.clone()),
        };

        let inserted = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted.order_id)
    }

    /// Store an order item and return the assigned id
    pub async fn insert_item(&self, item: &OrderItemRecord) -> DatabaseResult<i32> {
        let active_model = order_items::ActiveModel {
            order_item_id: ActiveValue::NotSet,
            order_id: Set(item.order_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
        };

        let inserted = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted.order_item_id)
    }

    /// Get orders matching the query with their items, in order id order
    pub async fn find_with_items(
        &self,
        query: &OrderQuery,
    ) -> DatabaseResult<Vec<(OrderRecord, Vec<OrderItemRecord>)>> {
        let mut rows = Vec::new();
        for select in Self::selects(query) {
            let batch = select
                .order_by_asc(orders::Column::OrderId)
                .find_with_related(order_items::Entity)
                .all(&self.db)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
            rows.extend(batch);
        }

        if query.customer_ids.is_some() {
            rows.sort_by_key(|(order, _)| order.order_id);
        }
        Ok(rows)
    }

    /// Get orders matching the query with their items and customer, in order id order
    pub async fn find_with_details(&self, query: &OrderQuery) -> DatabaseResult<Vec<OrderDetails>> {
        let rows = self.find_with_items(query).await?;

        let mut customers_by_order: HashMap<i32, CustomerRecord> = HashMap::new();
        for select in Self::selects(query) {
            let batch = select
                .find_also_related(customers::Entity)
                .all(&self.db)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
            customers_by_order.extend(
                batch
                    .into_iter()
                    .filter_map(|(order, customer)| customer.map(|c| (order.order_id, c))),
            );
        }

        Ok(rows
            .into_iter()
            .map(|(order, items)| {
                let customer = customers_by_order.remove(&order.order_id);
                OrderDetails {
                    order,
                    items,
                    customer,
                }
            })
            .collect())
    }

    /// One select per batch of customer ids, or a single select without an id filter
    fn selects(query: &OrderQuery) -> Vec<Select<orders::Entity>> {
        let mut select = orders::Entity::find();

        if let Some(start_date) = query.start_date {
            select = select.filter(orders::Column::OrderDate.gte(start_date));
        }
        if let Some(end_date) = query.end_date {
            select = select.filter(orders::Column::OrderDate.lte(end_date));
        }
        if let Some(ref statuses) = query.statuses {
            select = select.filter(orders::Column::Status.is_in(statuses.iter().cloned()));
        }

        match query.customer_ids {
            None => vec![select],
            Some(ref customer_ids) => customer_ids
                .chunks(MAX_IDS_PER_QUERY)
                .map(|chunk| {
                    select
                        .clone()
                        .filter(orders::Column::CustomerId.is_in(chunk.iter().copied()))
                })
                .collect(),
        }
    }
}
