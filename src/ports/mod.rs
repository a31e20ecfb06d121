//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engagement engine and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - registry of active sessions with per-session leases
//! - `ReportSink` - delivery of final reports to the collector

mod report_sink;
mod session_store;

pub use report_sink::{DeliveryError, ReportSink};
pub use session_store::{SessionLease, SessionSlot, SessionStore, SessionStoreError};
