//! Conversation policy.
//!
//! Pure functions from session context to the next state and reply intent.
//! The ask ladder is a declarative table walked in order; the first category
//! that is still empty and not yet asked up to its cap wins.

use serde::{Deserialize, Serialize};

use super::{AskCounts, EngagementState, Intent, SessionContext};
use crate::domain::intel::{Intel, IntelCategory};

/// Default turn budget before a session completes.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Default number of rapport turns in staged mode.
pub const DEFAULT_RAPPORT_TURNS: u32 = 3;

/// Default number of times each category may be asked for.
pub const DEFAULT_ASK_CAP: u32 = 1;

/// Categories in the order they are asked for.
pub const ASK_LADDER: [IntelCategory; 10] = [
    IntelCategory::Upi,
    IntelCategory::Phone,
    IntelCategory::BankAccount,
    IntelCategory::Email,
    IntelCategory::PhishingLink,
    IntelCategory::CaseId,
    IntelCategory::IfscCode,
    IntelCategory::CardNumber,
    IntelCategory::PolicyNumber,
    IntelCategory::OrderNumber,
];

/// Investigative fillers rotated by turn once the ladder is exhausted.
pub const FILLER_ROTATION: [Intent; 4] = [
    Intent::AskIdentity,
    Intent::ConfirmDetails,
    Intent::DeepProbe,
    Intent::Stall,
];

/// How a confirmed scam is engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementMode {
    /// Go straight to extraction once a scam is confirmed.
    #[default]
    Direct,
    /// Build rapport first, then extract until the core categories are filled.
    Staged,
}

/// Per-category ask limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AskCaps {
    caps: [u32; IntelCategory::COUNT],
}

impl AskCaps {
    /// Same cap for every category.
    pub fn uniform(cap: u32) -> Self {
        Self {
            caps: [cap; IntelCategory::COUNT],
        }
    }

    /// Overrides the cap for one category.
    pub fn with(mut self, category: IntelCategory, cap: u32) -> Self {
        self.caps[category.index()] = cap;
        self
    }

    pub fn get(&self, category: IntelCategory) -> u32 {
        self.caps[category.index()]
    }
}

impl Default for AskCaps {
    fn default() -> Self {
        Self::uniform(DEFAULT_ASK_CAP)
    }
}

/// Tunables for [`ConversationPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    pub max_turns: u32,
    pub mode: EngagementMode,
    pub rapport_turns: u32,
    pub ask_caps: AskCaps,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            mode: EngagementMode::default(),
            rapport_turns: DEFAULT_RAPPORT_TURNS,
            ask_caps: AskCaps::default(),
        }
    }
}

/// Decides the next state and intent for a session.
#[derive(Debug, Clone, Default)]
pub struct ConversationPolicy {
    config: PolicyConfig,
}

impl ConversationPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// State for the session after the current turn.
    pub fn next_state(&self, context: &SessionContext) -> EngagementState {
        if context.turn_count >= self.config.max_turns {
            return EngagementState::Complete;
        }
        if !context.scam_detected {
            return EngagementState::Init;
        }
        match self.config.mode {
            EngagementMode::Direct => EngagementState::IntelExtract,
            EngagementMode::Staged => {
                if context.turn_count < self.config.rapport_turns {
                    EngagementState::Engaging
                } else if IntelCategory::CORE
                    .iter()
                    .any(|c| context.intel.is_missing(*c))
                {
                    EngagementState::IntelExtract
                } else {
                    EngagementState::Complete
                }
            }
        }
    }

    /// Intent for the reply in `state`.
    pub fn next_intent(
        &self,
        state: EngagementState,
        intel: &Intel,
        turn_count: u32,
        ask_counts: &AskCounts,
    ) -> Intent {
        match state {
            EngagementState::Complete => Intent::Stall,
            EngagementState::Init => Intent::ConfirmDetails,
            EngagementState::Engaging => {
                if turn_count % 2 == 0 {
                    Intent::ConfirmDetails
                } else {
                    Intent::Stall
                }
            }
            EngagementState::IntelExtract => self
                .next_ask(intel, ask_counts)
                .map(Intent::ask_for)
                .unwrap_or_else(|| {
                    FILLER_ROTATION[(turn_count as usize) % FILLER_ROTATION.len()]
                }),
        }
    }

    /// First ladder category still empty and under its ask cap.
    pub fn next_ask(&self, intel: &Intel, ask_counts: &AskCounts) -> Option<IntelCategory> {
        ASK_LADDER.iter().copied().find(|category| {
            intel.is_missing(*category) && ask_counts.get(*category) < self.config.ask_caps.get(*category)
        })
    }

    /// Next state and intent for a context, in one call.
    pub fn decide(&self, context: &SessionContext) -> (EngagementState, Intent) {
        let state = self.next_state(context);
        let intent = self.next_intent(
            state,
            &context.intel,
            context.turn_count,
            &context.ask_counts,
        );
        (state, intent)
    }
}
