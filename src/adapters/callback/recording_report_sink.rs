//! Recording Report Sink
//!
//! Keeps delivered reports in memory. Failures can be scripted so that the
//! dispatcher's retry path can be exercised without a network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::reporting::FinalReport;
use crate::ports::{DeliveryError, ReportSink};

#[derive(Debug, Default)]
struct Recorded {
    delivered: Vec<FinalReport>,
    attempts: usize,
    scripted_failures: VecDeque<DeliveryError>,
}

/// In-memory report sink for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct RecordingReportSink {
    inner: Arc<RwLock<Recorded>>,
}

impl RecordingReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose next attempts fail with `failures`, in order.
    pub fn failing_with(failures: impl IntoIterator<Item = DeliveryError>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Recorded {
                scripted_failures: failures.into_iter().collect(),
                ..Recorded::default()
            })),
        }
    }

    /// Reports accepted so far.
    pub async fn delivered(&self) -> Vec<FinalReport> {
        self.inner.read().await.delivered.clone()
    }

    pub async fn delivered_count(&self) -> usize {
        self.inner.read().await.delivered.len()
    }

    /// Delivery attempts, successful or not.
    pub async fn attempts(&self) -> usize {
        self.inner.read().await.attempts
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.delivered.clear();
        inner.attempts = 0;
        inner.scripted_failures.clear();
    }
}

#[async_trait]
impl ReportSink for RecordingReportSink {
    async fn deliver(&self, report: &FinalReport) -> Result<(), DeliveryError> {
        let mut inner = self.inner.write().await;
        inner.attempts += 1;
        if let Some(error) = inner.scripted_failures.pop_front() {
            return Err(error);
        }
        inner.delivered.push(report.clone());
        Ok(())
    }
}
