//! EngageMessageHandler - Command handler for one inbound scammer message.
//!
//! Runs a single conversational turn: lease the session, score and extract
//! the message (and any supplied history), advance the engagement state,
//! choose a reply, then either persist the session or retire it and dispatch
//! its final report. The lease is released before the reply is paced.

use std::sync::Arc;

use thiserror::Error;

use crate::application::pacing::Pacer;
use crate::application::reporting::{DeliveryHandle, ReportDispatcher};
use crate::domain::detection::ScamScorer;
use crate::domain::engagement::{ConversationPolicy, EngagementState, Intent, SessionData};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp, ValidationError};
use crate::domain::intel::{IntelExtractor, IntelMerger};
use crate::domain::reporting::{FinalReport, ReportKind};
use crate::domain::responses::ResponseSelector;
use crate::ports::{SessionLease, SessionStore, SessionStoreError};

/// Senders whose history entries are replayed through scoring and extraction.
const REPLAYED_SENDERS: [&str; 2] = ["scammer", "user"];

/// A prior message supplied alongside the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub sender: String,
    pub text: String,
}

impl HistoryMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }

    fn is_replayed(&self) -> bool {
        REPLAYED_SENDERS
            .iter()
            .any(|sender| self.sender.eq_ignore_ascii_case(sender))
    }
}

/// Command to process one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngageMessageCommand {
    pub session_id: String,
    pub text: String,
    pub history: Vec<HistoryMessage>,
}

impl EngageMessageCommand {
    pub fn new(session_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            text: text.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryMessage>) -> Self {
        self.history = history;
        self
    }

    /// Checks required fields and returns the parsed session id.
    pub fn validate(&self) -> Result<SessionId, ValidationError> {
        if self.session_id.trim().is_empty() {
            return Err(ValidationError::empty_field("sessionId"));
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::empty_field("message.text"));
        }
        SessionId::new(self.session_id.clone())
    }
}

/// Result of a processed turn.
#[derive(Debug)]
pub struct EngageMessageResult {
    pub reply: String,
    pub state: EngagementState,
    pub intent: Intent,
    pub turn: u32,
    pub scam_detected: bool,
    /// Final report delivery, present when this turn completed the session.
    pub final_delivery: Option<DeliveryHandle>,
    /// Interim report delivery, present on the configured snapshot turn.
    pub interim_delivery: Option<DeliveryHandle>,
}

/// Errors from processing a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngageError {
    #[error("{}", client_message(.0))]
    Validation(ValidationError),

    #[error("session store unavailable: {0}")]
    Store(#[from] SessionStoreError),

    #[error("invalid engagement state transition: {0}")]
    StateTransition(ValidationError),
}

impl EngageError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngageError::Validation(_))
    }
}

impl From<EngageError> for DomainError {
    fn from(err: EngageError) -> Self {
        let message = err.to_string();
        match err {
            EngageError::Validation(v) => {
                let code = DomainError::from(v.clone()).code;
                DomainError::new(code, message).with_detail("field", v.field())
            }
            EngageError::Store(SessionStoreError::Closed) => {
                DomainError::new(ErrorCode::StoreClosed, message)
            }
            EngageError::Store(SessionStoreError::Retired(id)) => {
                DomainError::new(ErrorCode::SessionRetired, message)
                    .with_detail("session_id", id.as_str())
            }
            EngageError::StateTransition(_) => {
                DomainError::new(ErrorCode::InvalidStateTransition, message)
            }
        }
    }
}

fn client_message(error: &ValidationError) -> String {
    match error {
        ValidationError::EmptyField { field } => format!("{} is required", field),
        other => other.to_string(),
    }
}

/// Handler for inbound messages.
pub struct EngageMessageHandler {
    store: Arc<dyn SessionStore>,
    dispatcher: Arc<ReportDispatcher>,
    scorer: ScamScorer,
    extractor: IntelExtractor,
    merger: IntelMerger,
    policy: ConversationPolicy,
    selector: ResponseSelector,
    pacer: Pacer,
    interim_report_turn: Option<u32>,
}

impl EngageMessageHandler {
    pub fn new(store: Arc<dyn SessionStore>, dispatcher: Arc<ReportDispatcher>) -> Self {
        Self {
            store,
            dispatcher,
            scorer: ScamScorer::new(),
            extractor: IntelExtractor::new(),
            merger: IntelMerger::default(),
            policy: ConversationPolicy::default(),
            selector: ResponseSelector::default(),
            pacer: Pacer::disabled(),
            interim_report_turn: None,
        }
    }

    pub fn with_policy(mut self, policy: ConversationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_merger(mut self, merger: IntelMerger) -> Self {
        self.merger = merger;
        self
    }

    pub fn with_selector(mut self, selector: ResponseSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Sends a snapshot report when a session reaches `turn` without completing.
    pub fn with_interim_report_turn(mut self, turn: Option<u32>) -> Self {
        self.interim_report_turn = turn.filter(|t| *t > 0);
        self
    }

    pub async fn handle(
        &self,
        cmd: EngageMessageCommand,
    ) -> Result<EngageMessageResult, EngageError> {
        // 1. Validate before any session exists
        let session_id = cmd.validate().map_err(EngageError::Validation)?;

        // 2. Lease the session (get-or-create)
        let mut lease = self.open_lease(&session_id).await?;
        if lease.was_created() {
            tracing::info!(session_id = %session_id, "new engagement session");
        }

        // 3. Record, score and extract the new message
        lease.record_message(cmd.text.as_str());
        self.absorb(&mut lease, &cmd.text);

        // 4. Replay supplied history for anything missed
        for message in cmd.history.iter().filter(|m| m.is_replayed()) {
            self.absorb(&mut lease, &message.text);
        }

        // 5. Decide next state and intent
        let (state, intent) = self.policy.decide(lease.context());
        lease
            .advance_state(state)
            .map_err(EngageError::StateTransition)?;
        lease.context_mut().record_intent(intent);

        let reply = self.selector.select_reply(intent);
        let turn = lease.turn_count();
        let scam_detected = lease.context().scam_detected;

        tracing::info!(
            session_id = %session_id,
            turn,
            state = state.as_str(),
            intent = intent.as_str(),
            scam_detected,
            intel_items = lease.intel().total_items(),
            "turn processed"
        );

        // 6. Retire and report, or persist
        let mut final_delivery = None;
        let mut interim_delivery = None;
        if state.is_complete() {
            let snapshot = self.store.retire(lease).await?;
            final_delivery = Some(self.dispatch(&snapshot, ReportKind::Final));
            tracing::info!(session_id = %session_id, turn, "engagement complete");
        } else {
            if self.interim_report_turn == Some(turn) {
                interim_delivery = Some(self.dispatch(&lease, ReportKind::Interim));
            }
            self.store.commit(lease).await?;
        }

        // 7. Pace the reply with the lease released
        self.pacer.pace().await;

        Ok(EngageMessageResult {
            reply,
            state,
            intent,
            turn,
            scam_detected,
            final_delivery,
            interim_delivery,
        })
    }

    /// Checks out `id`, first finishing a completed session whose retirement
    /// was interrupted.
    async fn open_lease(&self, id: &SessionId) -> Result<SessionLease, EngageError> {
        let lease = self.store.checkout(id).await?;
        if !lease.state().is_complete() {
            return Ok(lease);
        }
        tracing::warn!(session_id = %id, "completed session still registered, retiring it");
        let snapshot = self.store.retire(lease).await?;
        self.dispatch(&snapshot, ReportKind::Final);
        Ok(self.store.checkout(id).await?)
    }

    fn absorb(&self, session: &mut SessionData, text: &str) {
        let indicators = self.scorer.score(text);
        let is_scam = self.scorer.is_scam(&indicators);
        if is_scam && !session.context().scam_detected {
            let rule = self
                .scorer
                .matching_rule(&indicators)
                .map(|r| r.name)
                .unwrap_or_default();
            tracing::info!(
                session_id = %session.session_id(),
                score = indicators.score,
                rule,
                "scam detected"
            );
        }
        session.observe(&indicators, is_scam);

        let extracted = self.extractor.extract(text);
        session.absorb_intel(&self.merger, &extracted);
    }

    fn dispatch(&self, session: &SessionData, kind: ReportKind) -> DeliveryHandle {
        let report = FinalReport::build(session, Timestamp::now());
        self.dispatcher.dispatch(report, kind)
    }
}
