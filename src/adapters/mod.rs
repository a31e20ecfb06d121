//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engagement engine to external systems:
//! - `memory` - in-process session store
//! - `callback` - report delivery to the external collector
//! - `http` - axum transport for inbound messages

pub mod callback;
pub mod http;
pub mod memory;

pub use callback::{HttpReportSink, HttpReportSinkConfig, RecordingReportSink};
pub use memory::InMemorySessionStore;
