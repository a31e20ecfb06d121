//! Engagement module - session state, intents, and the conversation policy.
//!
//! # Module Organization
//!
//! - `state` - `EngagementState` lifecycle and its transitions
//! - `intent` - what each reply is trying to achieve
//! - `context` - counters and intel the policy reads
//! - `session` - the `SessionData` aggregate
//! - `policy` - next state and next intent

mod context;
mod intent;
mod policy;
mod session;
mod state;

pub use context::{AskCounts, QuestionCounters, SessionContext};
pub use intent::Intent;
pub use policy::{
    AskCaps, ConversationPolicy, EngagementMode, PolicyConfig, ASK_LADDER, DEFAULT_ASK_CAP,
    DEFAULT_MAX_TURNS, DEFAULT_RAPPORT_TURNS, FILLER_ROTATION,
};
pub use session::SessionData;
pub use state::EngagementState;
