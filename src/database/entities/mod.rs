pub mod customers;
pub mod order_items;
pub mod orders;
pub mod products;

pub use customers::Entity as Customers;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;

// Type aliases
pub type CustomerRecord = customers::Model;
pub type OrderRecord = orders::Model;
pub type OrderItemRecord = order_items::Model;
pub type ProductRecord = products::Model;
