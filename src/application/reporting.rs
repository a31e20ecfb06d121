//! ReportDispatcher - supervised background delivery of engagement reports.
//!
//! Each dispatched report gets its own task that delivers through the
//! `ReportSink` with bounded retry and exponential backoff. Outcomes are
//! published on a broadcast channel; the conversational turn never waits.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `max_attempts` | 3 | Attempts per report, including the first |
//! | `initial_backoff` | 1s | Wait before the first retry, doubled each time |
//!
//! ## Graceful Shutdown
//!
//! `shutdown(grace)` cancels pending retries and waits up to `grace` for
//! attempts already on the wire.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time;

use crate::domain::foundation::DeliveryId;
use crate::domain::reporting::{FinalReport, ReportKind};
use crate::ports::ReportSink;

const OUTCOME_CHANNEL_CAPACITY: usize = 64;

/// Retry policy for report delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl DispatcherConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Wait after the given failed attempt (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

/// How a delivery ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered { attempts: u32 },
    Failed { attempts: u32, error: String },
    Cancelled { attempts: u32 },
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryStatus::Delivered { attempts }
            | DeliveryStatus::Failed { attempts, .. }
            | DeliveryStatus::Cancelled { attempts } => *attempts,
        }
    }
}

/// Published once per dispatched report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub delivery_id: DeliveryId,
    pub session_id: String,
    pub kind: ReportKind,
    pub status: DeliveryStatus,
}

/// Handle to one background delivery.
#[derive(Debug)]
pub struct DeliveryHandle {
    id: DeliveryId,
    task: JoinHandle<DeliveryOutcome>,
}

impl DeliveryHandle {
    pub fn id(&self) -> DeliveryId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the delivery to end. `None` if the task panicked or was aborted.
    pub async fn join(self) -> Option<DeliveryOutcome> {
        self.task.await.ok()
    }
}

/// Decrements the in-flight count when a delivery task ends, however it ends.
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl InFlightGuard {
    fn enter(counter: &Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self(counter.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Spawns and supervises report deliveries.
pub struct ReportDispatcher {
    sink: Arc<dyn ReportSink>,
    config: DispatcherConfig,
    outcomes: broadcast::Sender<DeliveryOutcome>,
    shutdown: watch::Sender<bool>,
    in_flight: Arc<watch::Sender<usize>>,
}

impl ReportDispatcher {
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self::with_config(sink, DispatcherConfig::default())
    }

    pub fn with_config(sink: Arc<dyn ReportSink>, config: DispatcherConfig) -> Self {
        let (outcomes, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        let (shutdown, _) = watch::channel(false);
        let (in_flight, _) = watch::channel(0usize);
        Self {
            sink,
            config,
            outcomes,
            shutdown,
            in_flight: Arc::new(in_flight),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Receiver for outcomes of deliveries dispatched after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DeliveryOutcome> {
        self.outcomes.subscribe()
    }

    /// Deliveries still running.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Starts delivering `report` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, report: FinalReport, kind: ReportKind) -> DeliveryHandle {
        let id = DeliveryId::new();
        let guard = InFlightGuard::enter(&self.in_flight);
        let sink = self.sink.clone();
        let config = self.config.clone();
        let outcomes = self.outcomes.clone();
        let shutdown = self.shutdown.subscribe();

        tracing::info!(
            delivery_id = %id,
            session_id = %report.session_id,
            kind = kind.as_str(),
            "dispatching report"
        );

        let task = tokio::spawn(async move {
            let _guard = guard;
            let status = deliver_with_retry(sink.as_ref(), &report, &config, shutdown).await;
            let outcome = DeliveryOutcome {
                delivery_id: id,
                session_id: report.session_id.clone(),
                kind,
                status,
            };
            // No subscribers is fine.
            let _ = outcomes.send(outcome.clone());
            outcome
        });

        DeliveryHandle { id, task }
    }

    /// Cancels pending retries and waits up to `grace` for running deliveries.
    ///
    /// Returns how many deliveries were still running when the grace period
    /// ran out.
    pub async fn shutdown(&self, grace: Duration) -> usize {
        self.shutdown.send_replace(true);

        let mut in_flight = self.in_flight.subscribe();
        let drained = time::timeout(grace, in_flight.wait_for(|n| *n == 0)).await;
        let remaining = self.in_flight();
        match drained {
            Ok(_) => tracing::info!("report dispatcher drained"),
            Err(_) => tracing::warn!(
                remaining,
                grace_ms = grace.as_millis() as u64,
                "report deliveries still running after grace period"
            ),
        }
        remaining
    }
}

async fn deliver_with_retry(
    sink: &dyn ReportSink,
    report: &FinalReport,
    config: &DispatcherConfig,
    mut shutdown: watch::Receiver<bool>,
) -> DeliveryStatus {
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match sink.deliver(report).await {
            Ok(()) => {
                tracing::info!(
                    session_id = %report.session_id,
                    attempt,
                    "report delivered"
                );
                return DeliveryStatus::Delivered { attempts: attempt };
            }
            Err(e) if !e.is_retryable() || attempt >= max_attempts => {
                tracing::warn!(
                    session_id = %report.session_id,
                    attempt,
                    error = %e,
                    "report delivery failed"
                );
                return DeliveryStatus::Failed {
                    attempts: attempt,
                    error: e.to_string(),
                };
            }
            Err(e) => {
                let backoff = config.backoff_after(attempt);
                tracing::warn!(
                    session_id = %report.session_id,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "report delivery failed, retrying"
                );
                tokio::select! {
                    _ = time::sleep(backoff) => {}
                    _ = shutdown.wait_for(|stopping| *stopping) => {
                        tracing::warn!(
                            session_id = %report.session_id,
                            attempt,
                            "report delivery cancelled by shutdown"
                        );
                        return DeliveryStatus::Cancelled { attempts: attempt };
                    }
                }
            }
        }
    }
}
