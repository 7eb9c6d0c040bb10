use crate::database::entities::{CustomerRecord, customers, orders};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    sea_query::{Expr, SimpleExpr},
};

/// Customer row joined with the number of orders they placed
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CustomerOrderCount {
    pub customer_id: i32,
    pub name: String,
    pub email: String,
    pub country: Option<String>,
    pub order_count: i64,
}

/// Customers DAO for database operations
pub struct CustomersDao {
    db: DatabaseConnection,
}

impl CustomersDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a customer and return the assigned id
    pub async fn insert(&self, customer: &CustomerRecord) -> DatabaseResult<i32> {
        let active_model = customers::ActiveModel {
            customer_id: ActiveValue::NotSet,
            name: Set(customer.name.clone()),
            email: Set(customer.email.clone()),
            country: Set(customer.country.clone()),
        };

        let inserted = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted.customer_id)
    }

    /// Count stored customers
    pub async fn count(&self) -> DatabaseResult<u64> {
        customers::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Customers ranked by order count (descending), at most `limit` rows
    pub async fn find_ranked_by_order_count(
        &self,
        limit: u64,
    ) -> DatabaseResult<Vec<CustomerOrderCount>> {
        // LIMIT is bound as a signed 64-bit integer
        let limit = limit.min(i64::MAX as u64);

        Self::with_order_count()
            .order_by_desc(order_count_expr())
            .order_by_asc(customers::Column::CustomerId)
            .limit(Some(limit))
            .into_model::<CustomerOrderCount>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Every customer with their order count, in id order
    pub async fn find_all_with_order_count(&self) -> DatabaseResult<Vec<CustomerOrderCount>> {
        Self::with_order_count()
            .order_by_asc(customers::Column::CustomerId)
            .into_model::<CustomerOrderCount>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    fn with_order_count() -> Select<customers::Entity> {
        customers::Entity::find()
            .column_as(order_count_expr(), "order_count")
            .join(JoinType::LeftJoin, customers::Relation::Orders.def())
            .group_by(customers::Column::CustomerId)
    }
}

fn order_count_expr() -> SimpleExpr {
    Expr::col((orders::Entity, orders::Column::OrderId)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::OrderRecord;
    use crate::test_utils::test_database;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_ranked_by_order_count_includes_customers_without_orders() {
        let database = test_database().await;
        let customers = database.customers();
        let orders = database.orders();

        let alice = customers
            .insert(&CustomerRecord::new("Alice", "alice@example.com").with_country("US"))
            .await
            .unwrap();
        let bob = customers
            .insert(&CustomerRecord::new("Bob", "bob@example.com"))
            .await
            .unwrap();
        let carol = customers
            .insert(&CustomerRecord::new("Carol", "carol@example.com"))
            .await
            .unwrap();

        for _ in 0..2 {
            orders
                .insert(&OrderRecord::new(carol, date(2024, 1, 5), "shipped"))
                .await
                .unwrap();
        }
        orders
            .insert(&OrderRecord::new(alice, date(2024, 1, 6), "pending"))
            .await
            .unwrap();

        let ranked = customers.find_ranked_by_order_count(10).await.unwrap();
        let ids: Vec<i32> = ranked.iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, vec![carol, alice, bob]);
        assert_eq!(ranked[0].order_count, 2);
        assert_eq!(ranked[2].order_count, 0);

        let limited = customers.find_ranked_by_order_count(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].customer_id, carol);

        assert!(customers.find_ranked_by_order_count(0).await.unwrap().is_empty());

        let unbounded = customers.find_ranked_by_order_count(u64::MAX).await.unwrap();
        assert_eq!(unbounded.len(), 3);
    }

    #[tokio::test]
    async fn test_find_all_with_order_count_in_id_order() {
        let database = test_database().await;
        let customers = database.customers();

        let first = customers
            .insert(&CustomerRecord::new("First", "first@example.com"))
            .await
            .unwrap();
        let second = customers
            .insert(&CustomerRecord::new("Second", "second@example.com"))
            .await
            .unwrap();

        let all = customers.find_all_with_order_count().await.unwrap();
        assert_eq!(
            all.iter().map(|c| c.customer_id).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert!(all.iter().all(|c| c.order_count == 0));
        assert_eq!(customers.count().await.unwrap(), 2);
    }
}
