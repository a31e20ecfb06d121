//! Reply selection.

mod catalog;

pub use catalog::{ResponseCatalog, ResponseSelector, FALLBACK_REPLY};
