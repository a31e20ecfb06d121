//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

mod engage;

pub use engage::{
    EngageError, EngageMessageCommand, EngageMessageHandler, EngageMessageResult, HistoryMessage,
};
