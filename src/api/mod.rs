//! Backend access
//!
//! - backend: origin resolution and media URL normalization
//! - catalog: the catalog document client

pub mod backend;
pub mod catalog;

pub use backend::Backend;
pub use catalog::{CatalogClient, CatalogError};
