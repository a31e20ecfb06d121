//! Callback Adapters
//!
//! Implementations of the ReportSink port.
//!
//! ## Available Adapters
//!
//! - **HttpReportSink** - posts JSON reports to the collector over HTTP
//! - **RecordingReportSink** - keeps reports in memory (testing/development)

mod http_report_sink;
mod recording_report_sink;

pub use http_report_sink::{HttpReportSink, HttpReportSinkConfig};
pub use recording_report_sink::RecordingReportSink;
