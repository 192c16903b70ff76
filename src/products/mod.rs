//! Products Module
//! Mission: Validated product records and their protected CRUD endpoints

pub mod api;
pub mod entity;
pub mod store;

pub use api::{product_router, ProductState};
pub use entity::{Product, ProductError};
pub use store::{ListQuery, ProductStore, SortOrder, SqliteProductStore};
