//! Per-session conversation context.

use serde::Serialize;

use super::{EngagementState, Intent};
use crate::domain::intel::{Intel, IntelCategory};

/// How many times each category has been asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AskCounts {
    counts: [u32; IntelCategory::COUNT],
}

impl AskCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: IntelCategory) -> u32 {
        self.counts[category.index()]
    }

    pub fn increment(&mut self, category: IntelCategory) {
        let count = &mut self.counts[category.index()];
        *count = count.saturating_add(1);
    }

    /// Total asks across categories.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Counters tracking the questions put to the scammer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuestionCounters {
    pub questions_asked: u32,
    pub investigative_questions: u32,
    pub information_elicitations: u32,
}

/// Mutable context the policy and report read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub scam_detected: bool,
    pub turn_count: u32,
    pub intel: Intel,
    pub current_state: EngagementState,
    pub ask_counts: AskCounts,
    pub questions: QuestionCounters,
    red_flags: Vec<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates ask and question counters for the intent chosen this turn.
    ///
    /// Ask-X and deep-probe intents count as elicitation attempts; identity
    /// and confirmation questions count as investigative only. Stalls and
    /// neutral acknowledgements count nothing.
    pub fn record_intent(&mut self, intent: Intent) {
        if let Some(category) = intent.solicits() {
            self.ask_counts.increment(category);
            self.count_question(true);
            return;
        }
        match intent {
            Intent::AskIdentity | Intent::ConfirmDetails => self.count_question(false),
            Intent::DeepProbe => self.count_question(true),
            _ => {}
        }
    }

    fn count_question(&mut self, elicits: bool) {
        self.questions.questions_asked += 1;
        self.questions.investigative_questions += 1;
        if elicits {
            self.questions.information_elicitations += 1;
        }
    }

    /// Records a matched scam phrase, ignoring case-insensitive repeats.
    ///
    /// Returns true if the phrase was new.
    pub fn add_red_flag(&mut self, phrase: &str) -> bool {
        let known = self
            .red_flags
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(phrase));
        if known || phrase.is_empty() {
            return false;
        }
        self.red_flags.push(phrase.to_string());
        true
    }

    /// Distinct red-flag phrases in first-seen order.
    pub fn red_flags(&self) -> &[String] {
        &self.red_flags
    }
}
