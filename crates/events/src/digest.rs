//! Digest notification scheduler.
//!
//! [`DigestScheduler`] runs as a background task, periodically checking
//! for alerts whose digest window has elapsed. A due alert is first
//! *claimed* via a compare-and-set on `last_digest_at`, so overlapping
//! ticks or a second process never double-send a cycle; the claim
//! winner then runs the matcher, drains the pending-match queue, and
//! dispatches one digest over the alert's configured channels.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pharmhub_core::alert::digest_due;
use pharmhub_db::models::job_alert::JobAlert;
use pharmhub_db::repositories::{JobAlertRepo, JobRepo, UserRepo};
use pharmhub_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::delivery::Notifier;

/// How often the scheduler polls for due digests.
const DIGEST_CHECK_INTERVAL: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// DigestScheduler
// ---------------------------------------------------------------------------

/// Background service that processes digest notifications on a periodic basis.
pub struct DigestScheduler {
    pool: DbPool,
    notifier: Arc<Notifier>,
}

impl DigestScheduler {
    /// Create a new scheduler with the given database pool and notifier.
    pub fn new(pool: DbPool, notifier: Arc<Notifier>) -> Self {
        Self { pool, notifier }
    }

    /// Run the digest scheduler loop.
    ///
    /// Checks every five minutes for alerts due for digest delivery. The
    /// loop exits gracefully when the provided [`CancellationToken`] is
    /// cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(DIGEST_CHECK_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Digest scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_digests().await {
                        tracing::error!(error = %e, "Failed to process digests");
                    }
                }
            }
        }
    }

    /// Find all alerts due for a digest and process each one.
    async fn process_digests(&self) -> Result<(), sqlx::Error> {
        let candidates = JobAlertRepo::list_digest_candidates(&self.pool).await?;
        let now = Utc::now();
        let mut sent = 0usize;

        for alert in &candidates {
            let Some(window_start) = digest_due(
                &alert.frequency,
                &alert.digest_time,
                alert.digest_day,
                alert.last_digest_at,
                now,
            ) else {
                continue;
            };

            // Claim the cycle; losing the claim means another tick (or
            // process) already owns this window.
            if !JobAlertRepo::claim_digest(&self.pool, alert.id, window_start).await? {
                continue;
            }

            match self.send_digest(alert).await {
                Ok(true) => sent += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        alert_id = alert.id,
                        error = %e,
                        "Failed to send digest for alert"
                    );
                }
            }
        }

        if sent > 0 {
            tracing::info!(count = sent, "Processed digest deliveries");
        }

        Ok(())
    }

    /// Run the matcher and deliver one digest for a claimed alert.
    ///
    /// Returns `Ok(true)` if a digest was dispatched, `Ok(false)` if the
    /// alert had nothing pending. Delivery failures are logged inside
    /// the notifier and still drain the queue — best effort, no retry.
    async fn send_digest(&self, alert: &JobAlert) -> Result<bool, sqlx::Error> {
        // Pick up anything posted since the previous digest that the
        // event-driven path may have missed.
        let matched =
            JobRepo::find_matching(&self.pool, &alert.criteria(), alert.last_digest_at).await?;
        let mut newly_enqueued = 0i64;
        for job in &matched {
            if JobAlertRepo::enqueue_match(&self.pool, alert.id, job.id).await? {
                newly_enqueued += 1;
            }
        }
        if newly_enqueued > 0 {
            JobAlertRepo::record_matches(&self.pool, alert.id, newly_enqueued).await?;
        }

        let jobs = JobAlertRepo::pending_jobs(&self.pool, alert.id).await?;
        if jobs.is_empty() {
            return Ok(false);
        }

        let Some(owner) = UserRepo::find_by_id(&self.pool, alert.owner_id).await? else {
            tracing::warn!(alert_id = alert.id, "Alert owner no longer exists");
            return Ok(false);
        };

        let outcome = self.notifier.dispatch_alert(&owner, alert, &jobs).await;

        let drained = JobAlertRepo::drain_queue(&self.pool, alert.id).await?;
        JobAlertRepo::record_notification_sent(&self.pool, alert.id).await?;

        tracing::info!(
            alert_id = alert.id,
            job_count = drained,
            email_sent = outcome.email_sent,
            sms_sent = outcome.sms_sent,
            "Digest delivered"
        );

        Ok(true)
    }
}
