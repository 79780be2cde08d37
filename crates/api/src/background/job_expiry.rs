//! Hourly sweep that expires lapsed job postings.
//!
//! Open jobs past their `expires_at` transition to `expired` and drop
//! out of listings and the matcher; featured flags past their window
//! are cleared at the same time.

use std::time::Duration;

use pharmhub_db::repositories::JobRepo;
use pharmhub_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the job-expiry sweep loop.
///
/// The loop exits gracefully when the provided [`CancellationToken`] is
/// cancelled.
pub async fn run(pool: DbPool, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Job expiry sweep cancelled");
                break;
            }
            _ = interval.tick() => {
                match JobRepo::mark_expired(&pool).await {
                    Ok(0) => {}
                    Ok(count) => tracing::info!(count, "Expired lapsed job postings"),
                    Err(e) => tracing::error!(error = %e, "Job expiry sweep failed"),
                }
                match JobRepo::unfeature_lapsed(&pool).await {
                    Ok(0) => {}
                    Ok(count) => tracing::info!(count, "Cleared lapsed featured flags"),
                    Err(e) => tracing::error!(error = %e, "Featured flag sweep failed"),
                }
            }
        }
    }
}
