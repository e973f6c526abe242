mod catalog;
mod handlers;

pub use catalog::{ProductCatalog, Producto};
pub use handlers::{router, ProductsState};
