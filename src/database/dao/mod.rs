pub mod customers;
pub mod orders;
pub mod products;

pub use customers::{CustomerOrderCount, CustomersDao};
pub use orders::{OrderDetails, OrderQuery, OrdersDao};
pub use products::ProductsDao;
