//! Final engagement report sent to the external collector.

use serde::{Deserialize, Serialize};

use super::classification::{
    classify_scam_type, detect_red_flag_groups, ConfidenceLevel, ScamType,
};
use crate::domain::engagement::SessionData;
use crate::domain::foundation::Timestamp;
use crate::domain::intel::{Intel, IntelCategory};

/// Whether a report closes the session or is a mid-session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Interim,
    Final,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Interim => "interim",
            ReportKind::Final => "final",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub engagement_duration_seconds: u64,
    pub total_messages_exchanged: u32,
}

/// Extracted identifiers grouped the way the collector expects.
///
/// Secondary categories are omitted from the JSON when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedIntelligence {
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phishing_links: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub email_addresses: Vec<String>,
    #[serde(rename = "caseIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub case_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ifsc_codes: Vec<String>,
    pub suspicious_keywords: Vec<String>,
}

impl ExtractedIntelligence {
    pub fn from_intel(intel: &Intel, keywords: &[String]) -> Self {
        let mut suspicious_keywords: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            if !suspicious_keywords.contains(keyword) {
                suspicious_keywords.push(keyword.clone());
            }
        }
        Self {
            bank_accounts: intel.to_vec(IntelCategory::BankAccount),
            upi_ids: intel.to_vec(IntelCategory::Upi),
            phishing_links: intel.to_vec(IntelCategory::PhishingLink),
            phone_numbers: intel.to_vec(IntelCategory::Phone),
            email_addresses: intel.to_vec(IntelCategory::Email),
            case_ids: intel.to_vec(IntelCategory::CaseId),
            policy_numbers: intel.to_vec(IntelCategory::PolicyNumber),
            order_numbers: intel.to_vec(IntelCategory::OrderNumber),
            card_numbers: intel.to_vec(IntelCategory::CardNumber),
            ifsc_codes: intel.to_vec(IntelCategory::IfscCode),
            suspicious_keywords,
        }
    }
}

/// Summary of one engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub session_id: String,
    pub scam_detected: bool,
    pub total_messages_exchanged: u32,
    pub engagement_duration_seconds: u64,
    pub engagement_metrics: EngagementMetrics,
    pub extracted_intelligence: ExtractedIntelligence,
    pub agent_notes: String,
    pub scam_type: ScamType,
    pub confidence_level: ConfidenceLevel,
}

/// Intel categories in the order they are listed in agent notes.
const NOTES_ORDER: [IntelCategory; 10] = [
    IntelCategory::Phone,
    IntelCategory::Upi,
    IntelCategory::BankAccount,
    IntelCategory::Email,
    IntelCategory::PhishingLink,
    IntelCategory::CaseId,
    IntelCategory::IfscCode,
    IntelCategory::CardNumber,
    IntelCategory::PolicyNumber,
    IntelCategory::OrderNumber,
];

impl FinalReport {
    /// Builds the report for a session as of `now`.
    pub fn build(session: &SessionData, now: Timestamp) -> Self {
        let context = session.context();
        let intel = session.intel();
        let has_links = !intel.is_missing(IntelCategory::PhishingLink);
        let corpus = corpus(session);

        let total_messages_exchanged = context.turn_count.saturating_mul(2);
        let engagement_duration_seconds = now.secs_since(session.created_at());
        let scam_type = classify_scam_type(&corpus, has_links, context.scam_detected);
        let confidence_level = ConfidenceLevel::assess(
            context.scam_detected,
            context.red_flags().len(),
            intel.total_items(),
        );

        Self {
            session_id: session.session_id().to_string(),
            scam_detected: context.scam_detected,
            total_messages_exchanged,
            engagement_duration_seconds,
            engagement_metrics: EngagementMetrics {
                engagement_duration_seconds,
                total_messages_exchanged,
            },
            extracted_intelligence: ExtractedIntelligence::from_intel(
                intel,
                session.keywords_seen(),
            ),
            agent_notes: agent_notes(session, &corpus, has_links, scam_type),
            scam_type,
            confidence_level,
        }
    }
}

/// Lowercased history and keywords, the text every scan runs over.
fn corpus(session: &SessionData) -> String {
    format!(
        "{} {}",
        session.message_history().join(" "),
        session.keywords_seen().join(" ")
    )
    .to_lowercase()
}

fn agent_notes(session: &SessionData, corpus: &str, has_links: bool, scam_type: ScamType) -> String {
    let context = session.context();
    let mut parts: Vec<String> = Vec::new();

    if context.scam_detected {
        parts.push("Scam confirmed by detection rules.".to_string());
        let groups = detect_red_flag_groups(corpus, has_links);
        if !groups.is_empty() {
            parts.push(format!(
                "RED FLAGS ({}): {}",
                groups.len(),
                groups.join("; ")
            ));
        }
    } else {
        parts.push("No conclusive scam indicators in the conversation.".to_string());
    }

    let intel = session.intel();
    let captured: Vec<String> = NOTES_ORDER
        .iter()
        .filter(|c| !intel.is_missing(**c))
        .map(|c| format!("{}: {}", c.label(), intel.get(*c).join(", ")))
        .collect();
    if captured.is_empty() {
        parts.push("INTEL: none disclosed despite repeated questioning.".to_string());
    } else {
        parts.push(format!("INTEL: {}", captured.join(" | ")));
    }

    if !session.keywords_seen().is_empty() {
        parts.push(format!("TACTICS: {}", session.keywords_seen().join(", ")));
    }

    parts.push(format!(
        "STATS: {} turns, {} questions, {} investigative, {} elicitation attempts",
        context.turn_count,
        context.questions.questions_asked,
        context.questions.investigative_questions,
        context.questions.information_elicitations,
    ));

    if scam_type != ScamType::Unknown {
        parts.push(format!(
            "THREAT CLASS: {} ({})",
            scam_type,
            scam_type.description()
        ));
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::ScamScorer;
    use crate::domain::engagement::{ConversationPolicy, SessionData};
    use crate::domain::foundation::SessionId;
    use crate::domain::intel::{IntelExtractor, IntelMerger};

    fn run_session(messages: &[&str]) -> SessionData {
        let scorer = ScamScorer::new();
        let extractor = IntelExtractor::new();
        let merger = IntelMerger::default();
        let policy = ConversationPolicy::default();
        let mut session = SessionData::new(SessionId::new("report-1").unwrap(), Timestamp::now());

        for text in messages {
            session.record_message(*text);
            let indicators = scorer.score(text);
            session.observe(&indicators, scorer.is_scam(&indicators));
            session.absorb_intel(&merger, &extractor.extract(text));
            let (state, intent) = policy.decide(session.context());
            session.advance_state(state).unwrap();
            session.context_mut().record_intent(intent);
        }
        session
    }

    #[test]
    fn counts_and_duration() {
        let session = run_session(&["hello", "how are you"]);
        let later = session.created_at().plus_secs(42);
        let report = FinalReport::build(&session, later);

        assert_eq!(report.total_messages_exchanged, 4);
        assert_eq!(report.engagement_duration_seconds, 42);
        assert_eq!(report.engagement_metrics.engagement_duration_seconds, 42);
        assert_eq!(report.engagement_metrics.total_messages_exchanged, 4);
    }

    #[test]
    fn duration_is_never_negative() {
        let session = run_session(&["hello"]);
        let earlier = Timestamp::from_datetime(
            *session.created_at().as_datetime() - chrono::Duration::seconds(30),
        );
        assert_eq!(FinalReport::build(&session, earlier).engagement_duration_seconds, 0);
    }

    #[test]
    fn json_uses_collector_field_names() {
        let session = run_session(&[
            "URGENT: your account will be blocked. Send OTP now to unblock.",
            "Pay to refund.desk@ybl and call 9876543210",
        ]);
        let json = serde_json::to_value(FinalReport::build(&session, Timestamp::now())).unwrap();

        assert_eq!(json["sessionId"], "report-1");
        assert_eq!(json["scamDetected"], true);
        assert_eq!(json["totalMessagesExchanged"], 4);
        assert!(json["engagementMetrics"]["engagementDurationSeconds"].is_u64());
        assert_eq!(json["extractedIntelligence"]["upiIds"][0], "refund.desk@ybl");
        assert_eq!(json["extractedIntelligence"]["phoneNumbers"][0], "+919876543210");
        assert!(json["extractedIntelligence"]["suspiciousKeywords"].is_array());
        assert_eq!(json["confidenceLevel"], "high");
        assert_eq!(json["scamType"], "lottery_fraud");
    }

    #[test]
    fn empty_secondary_categories_are_omitted() {
        let session = run_session(&["hello"]);
        let json = serde_json::to_value(FinalReport::build(&session, Timestamp::now())).unwrap();
        let intel = json["extractedIntelligence"].as_object().unwrap();

        for present in ["bankAccounts", "upiIds", "phishingLinks", "phoneNumbers", "emailAddresses"] {
            assert!(intel.contains_key(present), "{}", present);
        }
        for omitted in ["caseIDs", "policyNumbers", "orderNumbers", "cardNumbers", "ifscCodes"] {
            assert!(!intel.contains_key(omitted), "{}", omitted);
        }
    }

    #[test]
    fn populated_secondary_category_is_serialized() {
        let session = run_session(&["complaint id CMP445566 registered"]);
        let json = serde_json::to_value(FinalReport::build(&session, Timestamp::now())).unwrap();
        assert_eq!(json["extractedIntelligence"]["caseIDs"][0], "CMP445566");
    }

    #[test]
    fn full_session_without_intel_is_not_high_confidence() {
        let mut messages = vec!["An arrest warrant has been issued in your name"];
        messages.extend(std::iter::repeat("Answer me").take(9));
        let session = run_session(&messages);
        assert_eq!(session.turn_count(), 10);
        assert!(session.intel().is_empty());

        let report = FinalReport::build(&session, Timestamp::now());
        assert!(report.scam_detected);
        assert_ne!(report.confidence_level, ConfidenceLevel::High);
        assert_eq!(report.scam_type, ScamType::GovtThreatFraud);
    }

    #[test]
    fn undetected_session_is_low_and_unknown() {
        let session = run_session(&["hello", "nice weather"]);
        let report = FinalReport::build(&session, Timestamp::now());
        assert!(!report.scam_detected);
        assert_eq!(report.confidence_level, ConfidenceLevel::Low);
        assert_eq!(report.scam_type, ScamType::Unknown);
        assert!(report.agent_notes.contains("No conclusive scam indicators"));
        assert!(!report.agent_notes.contains("THREAT CLASS"));
    }

    #[test]
    fn agent_notes_summarise_flags_intel_and_stats() {
        let session = run_session(&[
            "URGENT: your account will be blocked. Send OTP now to unblock.",
            "Pay to refund.desk@ybl and call 9876543210",
        ]);
        let notes = FinalReport::build(&session, Timestamp::now()).agent_notes;

        assert!(notes.starts_with("Scam confirmed"));
        assert!(notes.contains("URGENCY PRESSURE"));
        assert!(notes.contains("CREDENTIAL HARVESTING"));
        assert!(notes.contains("INTEL: Phone: +919876543210 | UPI: refund.desk@ybl"));
        assert!(notes.contains("STATS: 2 turns"));
        assert!(notes.contains("THREAT CLASS: lottery_fraud"));
    }

    #[test]
    fn duplicate_keywords_collapse_in_report() {
        let intel = Intel::new();
        let keywords = vec!["OTP".to_string(), "OTP".to_string(), "urgent".to_string()];
        let extracted = ExtractedIntelligence::from_intel(&intel, &keywords);
        assert_eq!(extracted.suspicious_keywords, vec!["OTP", "urgent"]);
    }
}
