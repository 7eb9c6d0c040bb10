use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub order_item_id: i32,
    pub order_id: i32,
    #[sea_orm(nullable)]
    pub product_id: Option<i32>,
    #[sea_orm(nullable)]
    pub quantity: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub unit_price: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::OrderId"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::ProductId"
    )]
    Product,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn new(
        order_id: i32,
        product_id: i32,
        quantity: Option<i32>,
        unit_price: Option<Decimal>,
    ) -> Self {
        Self {
            order_item_id: 0,
            order_id,
            product_id: Some(product_id),
            quantity,
            unit_price,
        }
    }

    /// Line total with a missing quantity or price contributing zero
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity.unwrap_or(0)) * self.unit_price.unwrap_or(Decimal::ZERO)
    }
}
