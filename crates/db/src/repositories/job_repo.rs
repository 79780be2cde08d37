//! Repository for the `jobs` table, including the forward matcher
//! (alert criteria → job filter).

use pharmhub_core::alert::AlertCriteria;
use pharmhub_core::jobs::{STATUS_EXPIRED, STATUS_OPEN};
use pharmhub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::job::{CreateJob, Job, UpdateJob};

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, pharmacy_id, title, position, description, location_city, \
    location_province, salary_min, salary_max, salary_currency, employment_type, \
    is_featured, featured_until, expires_at, status, created_at, updated_at";

/// Provides CRUD operations and alert matching for job postings.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new job posting for a pharmacy, returning the created row.
    pub async fn create(
        pool: &PgPool,
        pharmacy_id: DbId,
        input: &CreateJob,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs \
                (pharmacy_id, title, position, description, location_city, location_province, \
                 salary_min, salary_max, salary_currency, employment_type, is_featured, \
                 featured_until, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'USD'), $10, \
                 COALESCE($11, false), $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(pharmacy_id)
            .bind(&input.title)
            .bind(&input.position)
            .bind(&input.description)
            .bind(&input.location_city)
            .bind(&input.location_province)
            .bind(input.salary_min)
            .bind(input.salary_max)
            .bind(&input.salary_currency)
            .bind(&input.employment_type)
            .bind(input.is_featured)
            .bind(input.featured_until)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a job by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List open jobs with optional filters, featured first, newest first.
    pub async fn list(
        pool: &PgPool,
        position: Option<&str>,
        province: Option<&str>,
        employment_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE status = $1 \
               AND (expires_at IS NULL OR expires_at > now()) \
               AND ($2::text IS NULL OR LOWER(position) = LOWER($2)) \
               AND ($3::text IS NULL OR LOWER(location_province) = LOWER($3)) \
               AND ($4::text IS NULL OR employment_type = $4) \
             ORDER BY is_featured DESC, created_at DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(STATUS_OPEN)
            .bind(position)
            .bind(province)
            .bind(employment_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a job. Only non-`None` fields are applied, and only the
    /// posting pharmacy can update its own rows.
    ///
    /// Returns `None` if no matching row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        pharmacy_id: DbId,
        input: &UpdateJob,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET
                title = COALESCE($3, title),
                position = COALESCE($4, position),
                description = COALESCE($5, description),
                location_city = COALESCE($6, location_city),
                location_province = COALESCE($7, location_province),
                salary_min = COALESCE($8, salary_min),
                salary_max = COALESCE($9, salary_max),
                salary_currency = COALESCE($10, salary_currency),
                employment_type = COALESCE($11, employment_type),
                is_featured = COALESCE($12, is_featured),
                featured_until = COALESCE($13, featured_until),
                expires_at = COALESCE($14, expires_at),
                status = COALESCE($15, status),
                updated_at = now()
             WHERE id = $1 AND pharmacy_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(pharmacy_id)
            .bind(&input.title)
            .bind(&input.position)
            .bind(&input.description)
            .bind(&input.location_city)
            .bind(&input.location_province)
            .bind(input.salary_min)
            .bind(input.salary_max)
            .bind(&input.salary_currency)
            .bind(&input.employment_type)
            .bind(input.is_featured)
            .bind(input.featured_until)
            .bind(input.expires_at)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a job posting. Only the posting pharmacy can delete its rows.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, pharmacy_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND pharmacy_id = $2")
            .bind(id)
            .bind(pharmacy_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Forward matcher: open, unexpired jobs satisfying every provided
    /// criteria dimension, newest first.
    ///
    /// Within a dimension the listed values are OR-matched
    /// (case-insensitive for positions and locations); an empty list or
    /// missing salary bound constrains nothing. The salary check is a
    /// range overlap against the job's advertised bounds. When `since`
    /// is set, only jobs created after it are considered.
    pub async fn find_matching(
        pool: &PgPool,
        criteria: &AlertCriteria,
        since: Option<Timestamp>,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE status = $1 \
               AND (expires_at IS NULL OR expires_at > now()) \
               AND (cardinality($2::text[]) = 0 \
                    OR LOWER(position) IN (SELECT LOWER(x) FROM unnest($2::text[]) AS x)) \
               AND (cardinality($3::text[]) = 0 \
                    OR LOWER(location_city) IN (SELECT LOWER(x) FROM unnest($3::text[]) AS x) \
                    OR LOWER(location_province) IN (SELECT LOWER(x) FROM unnest($3::text[]) AS x)) \
               AND (cardinality($4::text[]) = 0 OR employment_type = ANY($4::text[])) \
               AND ($5::bigint IS NULL OR salary_max IS NULL OR salary_max >= $5) \
               AND ($6::bigint IS NULL OR salary_min IS NULL OR salary_min <= $6) \
               AND ($7::timestamptz IS NULL OR created_at > $7) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(STATUS_OPEN)
            .bind(&criteria.positions)
            .bind(&criteria.locations)
            .bind(&criteria.employment_types)
            .bind(criteria.salary_min)
            .bind(criteria.salary_max)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Mark open jobs past their `expires_at` as expired.
    ///
    /// Returns the number of rows transitioned.
    pub async fn mark_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status = $1, updated_at = now() \
             WHERE status = $2 AND expires_at IS NOT NULL AND expires_at <= now()",
        )
        .bind(STATUS_EXPIRED)
        .bind(STATUS_OPEN)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear the featured flag on jobs whose featured window has lapsed.
    pub async fn unfeature_lapsed(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET is_featured = false, updated_at = now() \
             WHERE is_featured = true AND featured_until IS NOT NULL AND featured_until <= now()",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
