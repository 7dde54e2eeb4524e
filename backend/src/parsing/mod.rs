//! Input file parsers.

pub mod catalog;

pub use catalog::{load_catalog, parse_catalog, CatalogDefaults, CatalogError};
