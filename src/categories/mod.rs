pub mod model;
pub mod services;
pub mod store;

pub use model::{Category, NewCategory};
pub use store::{CategoryStore, PgCategoryStore};
