//! Turn pacing.
//!
//! Replies are held back for a fixed delay so the conversation reads at a
//! human rhythm. The delay ends early when the process begins shutting down,
//! and dropping the request future cancels it outright.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

/// How a pacing delay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceOutcome {
    Elapsed,
    Interrupted,
}

/// Cancellable per-turn delay.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Pacer {
    pub fn new(delay: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            delay,
            shutdown: Some(shutdown),
        }
    }

    /// Pacer that never waits.
    pub fn disabled() -> Self {
        Self {
            delay: Duration::ZERO,
            shutdown: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pace(&self) -> PaceOutcome {
        if self.delay.is_zero() {
            return PaceOutcome::Elapsed;
        }

        let Some(shutdown) = &self.shutdown else {
            time::sleep(self.delay).await;
            return PaceOutcome::Elapsed;
        };

        let mut shutdown = shutdown.clone();
        tokio::select! {
            _ = time::sleep(self.delay) => PaceOutcome::Elapsed,
            _ = shutdown.wait_for(|stopping| *stopping) => PaceOutcome::Interrupted,
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_pacer_returns_immediately() {
        let outcome = time::timeout(Duration::from_millis(50), Pacer::disabled().pace()).await;
        assert_eq!(outcome, Ok(PaceOutcome::Elapsed));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_full_delay() {
        let (_tx, rx) = watch::channel(false);
        let pacer = Pacer::new(Duration::from_secs(12), rx);

        let started = time::Instant::now();
        assert_eq!(pacer.pace().await, PaceOutcome::Elapsed);
        assert!(started.elapsed() >= Duration::from_secs(12));
    }

    #[tokio::test]
    async fn shutdown_interrupts_the_delay() {
        let (tx, rx) = watch::channel(false);
        let pacer = Pacer::new(Duration::from_secs(60), rx);

        let pacing = tokio::spawn(async move { pacer.pace().await });
        tx.send_replace(true);

        let outcome = time::timeout(Duration::from_secs(1), pacing).await;
        assert_eq!(outcome.unwrap().unwrap(), PaceOutcome::Interrupted);
    }

    #[tokio::test]
    async fn already_shutting_down_skips_the_delay() {
        let (tx, rx) = watch::channel(false);
        tx.send_replace(true);
        let pacer = Pacer::new(Duration::from_secs(60), rx);

        let outcome = time::timeout(Duration::from_secs(1), pacer.pace()).await;
        assert_eq!(outcome, Ok(PaceOutcome::Interrupted));
    }
}
