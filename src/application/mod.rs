//! Application layer - Commands, Handlers, and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! - `handlers` - per-turn engagement command handling
//! - `reporting` - supervised report delivery
//! - `pacing` - cancellable reply pacing

pub mod handlers;
pub mod pacing;
pub mod reporting;

pub use handlers::{
    EngageError, EngageMessageCommand, EngageMessageHandler, EngageMessageResult, HistoryMessage,
};
pub use pacing::{PaceOutcome, Pacer};
pub use reporting::{
    DeliveryHandle, DeliveryOutcome, DeliveryStatus, DispatcherConfig, ReportDispatcher,
};
