pub mod categories;
pub mod orders;
pub mod products;

pub use categories::Entity as Categories;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
