//! Intelligence extraction and merging.
//!
//! - `IntelCategory` - kinds of identifiers and how they compare
//! - `Intel` - per-category ordered, de-duplicated values
//! - `IntelExtractor` - stateless text to `Intel` extraction
//! - `IntelMerger` - capped union used to accumulate intel across turns

mod category;
mod collection;
mod extractor;
mod merge;

pub use category::IntelCategory;
pub use collection::Intel;
pub use extractor::{is_trusted_link, IntelExtractor};
pub use merge::{IntelMerger, DEFAULT_INTEL_CAP};
