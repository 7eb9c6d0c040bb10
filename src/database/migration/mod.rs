use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250301_000001_create_customers_table;
mod m20250301_000002_create_products_table;
mod m20250301_000003_create_orders_table;
mod m20250301_000004_create_order_items_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_customers_table::Migration),
            Box::new(m20250301_000002_create_products_table::Migration),
            Box::new(m20250301_000003_create_orders_table::Migration),
            Box::new(m20250301_000004_create_order_items_table::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Customers {
    Table,
    CustomerId,
    Name,
    Email,
    Country,
}

#[derive(Iden)]
pub enum Products {
    Table,
    ProductId,
    Name,
    Category,
    Price,
}

#[derive(Iden)]
pub enum Orders {
    Table,
    OrderId,
    CustomerId,
    OrderDate,
    Status,
}

#[derive(Iden)]
pub enum OrderItems {
    Table,
    OrderItemId,
    OrderId,
    ProductId,
    Quantity,
    UnitPrice,
}
