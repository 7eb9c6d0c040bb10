use crate::database::entities::{ProductRecord, order_items, products};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

/// Products DAO for database operations
pub struct ProductsDao {
    db: DatabaseConnection,
}

impl ProductsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a product and return the assigned id
    pub async fn insert(&self, product: &ProductRecord) -> DatabaseResult<i32> {
        let active_model = products::ActiveModel {
            product_id: ActiveValue::NotSet,
            name: Set(product.name.clone()),
            category: Set(product.category.clone()),
            price: Set(product.price),
        };

        let inserted = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted.product_id)
    }

    /// Products that appear in no order item
    pub async fn find_never_ordered(&self) -> DatabaseResult<Vec<ProductRecord>> {
        products::Entity::find()
            .join(JoinType::LeftJoin, products::Relation::OrderItems.def())
            .filter(order_items::Column::OrderItemId.is_null())
            .order_by_asc(products::Column::ProductId)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }
}
