//! Engagement state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of an engagement session.
///
/// - `Init`: no scam confirmed yet, replies stay neutral-curious
/// - `Engaging`: scam confirmed, building rapport before asking for details
/// - `IntelExtract`: actively soliciting identifiers
/// - `Complete`: turn budget reached or core intel gathered, report pending
///
/// Scam detection is sticky, so the state only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementState {
    #[default]
    Init,
    Engaging,
    IntelExtract,
    Complete,
}

impl EngagementState {
    /// Wire and log name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Engaging => "ENGAGING",
            Self::IntelExtract => "INTEL_EXTRACT",
            Self::Complete => "COMPLETE",
        }
    }

    /// Returns true once the session should be reported and retired.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl StateMachine for EngagementState {
    fn valid_transitions(&self) -> Vec<Self> {
        use EngagementState::*;
        match self {
            Init => vec![Init, Engaging, IntelExtract, Complete],
            Engaging => vec![Engaging, IntelExtract, Complete],
            IntelExtract => vec![IntelExtract, Complete],
            Complete => vec![],
        }
    }
}

impl fmt::Display for EngagementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
