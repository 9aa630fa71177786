//! Product catalog.
//!
//! Read-only product data as served by the storefront backend, plus the index
//! used to look products up by id, category or free text. Pure data and
//! validation; fetching lives in `storefront-client`.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, CatalogQuery};
pub use product::{MAX_RATING, Product, ProductId};
