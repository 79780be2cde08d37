//! Repository for the `job_alerts` and `job_alert_matches` tables.
//!
//! Besides CRUD this holds the reverse matcher (job → alerts), the
//! pending-match queue, and the digest claim used for duplicate-send
//! protection.

use pharmhub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::job::Job;
use crate::models::job_alert::{CreateJobAlert, JobAlert, UpdateJobAlert};

/// Column list for `job_alerts` queries.
const COLUMNS: &str = "id, owner_id, name, description, positions, locations, \
    employment_types, salary_min, salary_max, notification_method, frequency, \
    digest_time, digest_day, is_active, total_matches, total_notifications_sent, \
    last_job_matched_at, last_digest_at, created_at, updated_at";

/// Column list for `jobs` rows returned through the match queue join.
const JOB_COLUMNS: &str = "j.id, j.pharmacy_id, j.title, j.position, j.description, \
    j.location_city, j.location_province, j.salary_min, j.salary_max, j.salary_currency, \
    j.employment_type, j.is_featured, j.featured_until, j.expires_at, j.status, \
    j.created_at, j.updated_at";

/// Provides CRUD, matching, and digest-queue operations for job alerts.
pub struct JobAlertRepo;

impl JobAlertRepo {
    /// Insert a new alert for a user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateJobAlert,
    ) -> Result<JobAlert, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_alerts \
                (owner_id, name, description, positions, locations, employment_types, \
                 salary_min, salary_max, notification_method, frequency, digest_time, \
                 digest_day, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'email'), \
                 COALESCE($10, 'daily'), COALESCE($11, '08:00'), COALESCE($12, 0), \
                 COALESCE($13, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobAlert>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.positions)
            .bind(&input.locations)
            .bind(&input.employment_types)
            .bind(input.salary_min)
            .bind(input.salary_max)
            .bind(&input.notification_method)
            .bind(&input.frequency)
            .bind(&input.digest_time)
            .bind(input.digest_day)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// List a user's alerts, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<JobAlert>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM job_alerts WHERE owner_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, JobAlert>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find an alert by ID, scoped to its owner.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<JobAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_alerts WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, JobAlert>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Update an alert. Only non-`None` fields are applied, scoped to
    /// the owner. Returns `None` if no matching row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateJobAlert,
    ) -> Result<Option<JobAlert>, sqlx::Error> {
        let query = format!(
            "UPDATE job_alerts SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                positions = COALESCE($5, positions),
                locations = COALESCE($6, locations),
                employment_types = COALESCE($7, employment_types),
                salary_min = COALESCE($8, salary_min),
                salary_max = COALESCE($9, salary_max),
                notification_method = COALESCE($10, notification_method),
                frequency = COALESCE($11, frequency),
                digest_time = COALESCE($12, digest_time),
                digest_day = COALESCE($13, digest_day),
                is_active = COALESCE($14, is_active),
                updated_at = now()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobAlert>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.positions)
            .bind(&input.locations)
            .bind(&input.employment_types)
            .bind(input.salary_min)
            .bind(input.salary_max)
            .bind(&input.notification_method)
            .bind(&input.frequency)
            .bind(&input.digest_time)
            .bind(input.digest_day)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete an alert, scoped to its owner. The match queue goes with
    /// it via ON DELETE CASCADE. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_alerts WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Matching
    // -----------------------------------------------------------------------

    /// Reverse matcher: active alerts whose criteria match the given job.
    ///
    /// Mirrors [`JobRepo::find_matching`](crate::repositories::JobRepo::find_matching)
    /// dimension by dimension, evaluated from the job's side.
    pub async fn find_matching_alerts(
        pool: &PgPool,
        job: &Job,
    ) -> Result<Vec<JobAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_alerts \
             WHERE is_active = true \
               AND (cardinality(positions) = 0 \
                    OR LOWER($1) IN (SELECT LOWER(x) FROM unnest(positions) AS x)) \
               AND (cardinality(locations) = 0 \
                    OR LOWER($2) IN (SELECT LOWER(x) FROM unnest(locations) AS x) \
                    OR LOWER($3) IN (SELECT LOWER(x) FROM unnest(locations) AS x)) \
               AND (cardinality(employment_types) = 0 OR $4 = ANY(employment_types)) \
               AND (salary_min IS NULL OR $6::bigint IS NULL OR $6 >= salary_min) \
               AND (salary_max IS NULL OR $5::bigint IS NULL OR $5 <= salary_max)"
        );
        sqlx::query_as::<_, JobAlert>(&query)
            .bind(&job.position)
            .bind(&job.location_city)
            .bind(&job.location_province)
            .bind(&job.employment_type)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Pending-match queue
    // -----------------------------------------------------------------------

    /// Add a job to an alert's pending queue.
    ///
    /// Returns `true` if a new row was inserted; re-matching the same
    /// job is a no-op thanks to the unique (alert_id, job_id) pair.
    pub async fn enqueue_match(
        pool: &PgPool,
        alert_id: DbId,
        job_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO job_alert_matches (alert_id, job_id) VALUES ($1, $2) \
             ON CONFLICT (alert_id, job_id) DO NOTHING",
        )
        .bind(alert_id)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the match counters after the matcher enqueued `new_matches` jobs.
    pub async fn record_matches(
        pool: &PgPool,
        alert_id: DbId,
        new_matches: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE job_alerts SET \
                total_matches = total_matches + $2, \
                last_job_matched_at = now(), \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(alert_id)
        .bind(new_matches)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Jobs waiting in the alert's pending queue, newest match first.
    pub async fn pending_jobs(pool: &PgPool, alert_id: DbId) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM job_alert_matches m \
             JOIN jobs j ON j.id = m.job_id \
             WHERE m.alert_id = $1 AND m.notified_at IS NULL \
             ORDER BY m.matched_at DESC"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(alert_id)
            .fetch_all(pool)
            .await
    }

    /// Drain the pending queue: stamp `notified_at` on every pending row.
    ///
    /// Returns the number of rows drained.
    pub async fn drain_queue(pool: &PgPool, alert_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE job_alert_matches SET notified_at = now() \
             WHERE alert_id = $1 AND notified_at IS NULL",
        )
        .bind(alert_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Bump `total_notifications_sent` after a dispatch.
    pub async fn record_notification_sent(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE job_alerts SET \
                total_notifications_sent = total_notifications_sent + 1, \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(alert_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Digest scheduling
    // -----------------------------------------------------------------------

    /// Active alerts on a daily or weekly schedule, for the digest pass.
    pub async fn list_digest_candidates(pool: &PgPool) -> Result<Vec<JobAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_alerts \
             WHERE is_active = true AND frequency IN ('daily', 'weekly') \
             ORDER BY id"
        );
        sqlx::query_as::<_, JobAlert>(&query).fetch_all(pool).await
    }

    /// Claim the current digest cycle for an alert.
    ///
    /// Compare-and-set on `last_digest_at`: succeeds only when no send
    /// has been stamped at or after `window_start`, so overlapping
    /// ticks (or a second process) can never double-send a cycle.
    pub async fn claim_digest(
        pool: &PgPool,
        alert_id: DbId,
        window_start: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE job_alerts SET last_digest_at = now(), updated_at = now() \
             WHERE id = $1 AND (last_digest_at IS NULL OR last_digest_at < $2)",
        )
        .bind(alert_id)
        .bind(window_start)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
