//! Engagement reporting.
//!
//! Builds the summary delivered to the external collector when a session
//! completes, plus the classification helpers behind it.

mod classification;
mod report;

pub use classification::{
    classify_scam_type, detect_red_flag_groups, ConfidenceLevel, RedFlagGroup, ScamType,
    RED_FLAG_GROUPS,
};
pub use report::{EngagementMetrics, ExtractedIntelligence, FinalReport, ReportKind};
