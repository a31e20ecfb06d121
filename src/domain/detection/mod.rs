//! Scam detection.
//!
//! Scores single messages against a weighted phrase battery and classifies
//! the resulting indicators with an ordered rule table.

mod indicators;
mod scorer;

pub use indicators::{ScamIndicators, ScamSignal};
pub use scorer::{DetectionRule, PhraseMatcher, ScamScorer, DETECTION_RULES};
