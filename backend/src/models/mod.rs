pub mod catalog;
pub mod time;

pub use catalog::{catalog, find_by_name, object_types, CatalogEntry};
pub use time::*;
