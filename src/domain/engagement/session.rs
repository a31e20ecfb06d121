//! Engagement session aggregate.

use crate::domain::detection::ScamIndicators;
use crate::domain::foundation::{SessionId, StateMachine, Timestamp, ValidationError};
use crate::domain::intel::{Intel, IntelMerger};

use super::{EngagementState, SessionContext};

/// All state held for one conversation with a suspected scammer.
///
/// # Invariants
///
/// - `session_id` is non-empty (enforced by [`SessionId`])
/// - `keywords_seen` holds no exact duplicates
/// - `context.current_state` only changes through valid transitions
/// - `context.turn_count` equals the number of inbound messages recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    session_id: SessionId,
    context: SessionContext,
    message_history: Vec<String>,
    keywords_seen: Vec<String>,
    created_at: Timestamp,
    last_updated_at: Timestamp,
}

impl SessionData {
    /// Creates a fresh session in the `Init` state.
    pub fn new(session_id: SessionId, now: Timestamp) -> Self {
        Self {
            session_id,
            context: SessionContext::new(),
            message_history: Vec::new(),
            keywords_seen: Vec::new(),
            created_at: now,
            last_updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn message_history(&self) -> &[String] {
        &self.message_history
    }

    pub fn keywords_seen(&self) -> &[String] {
        &self.keywords_seen
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn last_updated_at(&self) -> &Timestamp {
        &self.last_updated_at
    }

    pub fn turn_count(&self) -> u32 {
        self.context.turn_count
    }

    pub fn state(&self) -> EngagementState {
        self.context.current_state
    }

    pub fn intel(&self) -> &Intel {
        &self.context.intel
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends an inbound message and counts the turn.
    pub fn record_message(&mut self, text: impl Into<String>) {
        self.message_history.push(text.into());
        self.context.turn_count += 1;
    }

    /// Folds one message's indicators into the session.
    ///
    /// Detection is sticky: once any message is judged a scam the session
    /// stays flagged. Matched phrases become keywords and red flags.
    pub fn observe(&mut self, indicators: &ScamIndicators, is_scam: bool) {
        if is_scam {
            self.context.scam_detected = true;
        }
        for phrase in &indicators.matched_phrases {
            self.add_keyword(phrase);
            self.context.add_red_flag(phrase);
        }
    }

    /// Records a suspicious keyword unless already present verbatim.
    pub fn add_keyword(&mut self, keyword: &str) {
        if !keyword.is_empty() && !self.keywords_seen.iter().any(|k| k == keyword) {
            self.keywords_seen.push(keyword.to_string());
        }
    }

    /// Merges newly extracted intel into the running collection.
    pub fn absorb_intel(&mut self, merger: &IntelMerger, extracted: &Intel) {
        self.context.intel = merger.merge(&self.context.intel, extracted);
    }

    /// Moves to `next`, rejecting backward or post-completion transitions.
    pub fn advance_state(&mut self, next: EngagementState) -> Result<(), ValidationError> {
        self.context.current_state = self.context.current_state.transition_to(next)?;
        Ok(())
    }

    /// Mutable access for intent bookkeeping.
    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    /// Marks the session as modified at `now`.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_updated_at = now;
    }
}
