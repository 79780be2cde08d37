//! Job alert domain rules: criteria validation, salary-range overlap,
//! and digest scheduling windows.
//!
//! The matcher itself runs as SQL in the repository layer; this module
//! holds the pure pieces of the contract so they are testable without a
//! database, plus the well-known string constants for notification
//! frequency and delivery method.

use chrono::{Datelike, Duration, FixedOffset, NaiveTime, TimeZone, Utc};

use crate::error::CoreError;
use crate::jobs::is_valid_employment_type;
use crate::types::Timestamp;

/// Deliver each match as soon as it is found.
pub const FREQUENCY_INSTANT: &str = "instant";

/// Batch matches into one digest per day.
pub const FREQUENCY_DAILY: &str = "daily";

/// Batch matches into one digest per week.
pub const FREQUENCY_WEEKLY: &str = "weekly";

/// All accepted notification frequencies.
pub const FREQUENCIES: [&str; 3] = [FREQUENCY_INSTANT, FREQUENCY_DAILY, FREQUENCY_WEEKLY];

/// Deliver via email only.
pub const METHOD_EMAIL: &str = "email";

/// Deliver via SMS only.
pub const METHOD_SMS: &str = "sms";

/// Deliver via both email and SMS.
pub const METHOD_BOTH: &str = "both";

/// All accepted notification methods.
pub const METHODS: [&str; 3] = [METHOD_EMAIL, METHOD_SMS, METHOD_BOTH];

/// Digest times are interpreted in Central Africa Time (UTC+2), the
/// single timezone ZimPharmHub's users live in.
const CAT_OFFSET_SECS: i32 = 2 * 3600;

/// Returns `true` if `value` is a recognised notification frequency.
pub fn is_valid_frequency(value: &str) -> bool {
    FREQUENCIES.contains(&value)
}

/// Returns `true` if `value` is a recognised notification method.
pub fn is_valid_method(value: &str) -> bool {
    METHODS.contains(&value)
}

/// Returns `true` if the method includes email delivery.
pub fn method_includes_email(method: &str) -> bool {
    method == METHOD_EMAIL || method == METHOD_BOTH
}

/// Returns `true` if the method includes SMS delivery.
pub fn method_includes_sms(method: &str) -> bool {
    method == METHOD_SMS || method == METHOD_BOTH
}

// ---------------------------------------------------------------------------
// AlertCriteria
// ---------------------------------------------------------------------------

/// A job alert's search criteria.
///
/// Within a dimension the listed values are OR-matched; dimensions are
/// AND-combined. An empty list or `None` bound constrains nothing.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AlertCriteria {
    /// Position titles to match (e.g. `"Pharmacist"`, `"Dispensary Assistant"`).
    pub positions: Vec<String>,
    /// Cities or provinces to match.
    pub locations: Vec<String>,
    /// Employment types to match (see [`crate::jobs::EMPLOYMENT_TYPES`]).
    pub employment_types: Vec<String>,
    /// Lower bound of the desired salary range (inclusive).
    pub salary_min: Option<i64>,
    /// Upper bound of the desired salary range (inclusive).
    pub salary_max: Option<i64>,
}

impl AlertCriteria {
    /// Check the criteria are internally consistent.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "salary_min ({min}) must not exceed salary_max ({max})"
                )));
            }
        }
        for et in &self.employment_types {
            if !is_valid_employment_type(et) {
                return Err(CoreError::Validation(format!(
                    "Unknown employment type: {et}"
                )));
            }
        }
        Ok(())
    }

    /// Returns `true` when no dimension constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.positions.is_empty()
            && self.locations.is_empty()
            && self.employment_types.is_empty()
            && self.salary_min.is_none()
            && self.salary_max.is_none()
    }
}

/// Salary-range overlap check between an alert's desired range and a
/// job's advertised range. A missing bound on either side is unbounded.
///
/// A job advertising 500–1000 overlaps an alert asking 600–900, but not
/// one capped at 400.
pub fn salary_overlaps(
    alert_min: Option<i64>,
    alert_max: Option<i64>,
    job_min: Option<i64>,
    job_max: Option<i64>,
) -> bool {
    let above_floor = match (alert_min, job_max) {
        (Some(amin), Some(jmax)) => jmax >= amin,
        _ => true,
    };
    let below_ceiling = match (alert_max, job_min) {
        (Some(amax), Some(jmin)) => jmin <= amax,
        _ => true,
    };
    above_floor && below_ceiling
}

// ---------------------------------------------------------------------------
// Digest windows
// ---------------------------------------------------------------------------

/// Compute the start of the current digest window: the most recent
/// scheduled instant (digest time, and digest day for weekly alerts)
/// not later than `now`.
///
/// `digest_day` is 0 = Monday … 6 = Sunday. Returns `None` for the
/// `instant` frequency or an unparseable `digest_time`.
pub fn digest_window_start(
    frequency: &str,
    digest_time: &str,
    digest_day: i16,
    now: Timestamp,
) -> Option<Timestamp> {
    let tz = FixedOffset::east_opt(CAT_OFFSET_SECS)?;
    let time = NaiveTime::parse_from_str(digest_time, "%H:%M").ok()?;
    let local_now = now.with_timezone(&tz);

    match frequency {
        FREQUENCY_DAILY => {
            let candidate = local_now.date_naive().and_time(time);
            let mut instant = tz.from_local_datetime(&candidate).single()?;
            if instant > local_now {
                instant -= Duration::days(1);
            }
            Some(instant.with_timezone(&Utc))
        }
        FREQUENCY_WEEKLY => {
            let target = i64::from(digest_day).rem_euclid(7);
            let weekday = i64::from(local_now.weekday().num_days_from_monday());
            let days_back = (weekday - target).rem_euclid(7);
            let date = local_now.date_naive() - Duration::days(days_back);
            let mut instant = tz.from_local_datetime(&date.and_time(time)).single()?;
            if instant > local_now {
                instant -= Duration::days(7);
            }
            Some(instant.with_timezone(&Utc))
        }
        _ => None,
    }
}

/// Decide whether an alert is due for a digest.
///
/// Returns the window start when due; the caller uses it as the
/// compare-and-set boundary so one send per window can ever succeed.
pub fn digest_due(
    frequency: &str,
    digest_time: &str,
    digest_day: i16,
    last_digest_at: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    let window_start = digest_window_start(frequency, digest_time, digest_day, now)?;
    match last_digest_at {
        Some(last) if last >= window_start => None,
        _ => Some(window_start),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn salary_overlap_inside_range() {
        // Job 500–1000 vs alert 600–900: overlap.
        assert!(salary_overlaps(Some(600), Some(900), Some(500), Some(1000)));
    }

    #[test]
    fn salary_overlap_rejects_below_range() {
        // Job 500–1000 vs alert capped at 400: no overlap.
        assert!(!salary_overlaps(None, Some(400), Some(500), Some(1000)));
    }

    #[test]
    fn salary_overlap_rejects_above_range() {
        assert!(!salary_overlaps(Some(1200), None, Some(500), Some(1000)));
    }

    #[test]
    fn salary_overlap_unbounded_sides() {
        assert!(salary_overlaps(None, None, Some(500), Some(1000)));
        assert!(salary_overlaps(Some(600), Some(900), None, None));
        assert!(salary_overlaps(Some(600), None, None, Some(700)));
    }

    #[test]
    fn salary_overlap_touching_bounds() {
        // Inclusive bounds: touching counts as overlap.
        assert!(salary_overlaps(Some(1000), Some(2000), Some(500), Some(1000)));
        assert!(salary_overlaps(Some(100), Some(500), Some(500), Some(1000)));
    }

    #[test]
    fn criteria_validate_rejects_inverted_salary() {
        let criteria = AlertCriteria {
            salary_min: Some(900),
            salary_max: Some(600),
            ..Default::default()
        };
        assert!(criteria.validate().is_err());
    }

    #[test]
    fn criteria_validate_rejects_unknown_employment_type() {
        let criteria = AlertCriteria {
            employment_types: vec!["gig".to_string()],
            ..Default::default()
        };
        assert!(criteria.validate().is_err());
    }

    #[test]
    fn criteria_validate_accepts_empty() {
        let criteria = AlertCriteria::default();
        assert!(criteria.validate().is_ok());
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn daily_window_before_todays_time_is_yesterday() {
        // 2026-03-10 05:00 UTC = 07:00 CAT; digest at 08:00 CAT has not
        // happened today, so the window starts yesterday 08:00 CAT.
        let now = utc(2026, 3, 10, 5, 0);
        let start = digest_window_start(FREQUENCY_DAILY, "08:00", 0, now).unwrap();
        assert_eq!(start, utc(2026, 3, 9, 6, 0)); // 08:00 CAT = 06:00 UTC
    }

    #[test]
    fn daily_window_after_todays_time_is_today() {
        let now = utc(2026, 3, 10, 9, 0); // 11:00 CAT
        let start = digest_window_start(FREQUENCY_DAILY, "08:00", 0, now).unwrap();
        assert_eq!(start, utc(2026, 3, 10, 6, 0));
    }

    #[test]
    fn weekly_window_lands_on_digest_day() {
        // 2026-03-12 is a Thursday; digest_day 0 = Monday.
        let now = utc(2026, 3, 12, 12, 0);
        let start = digest_window_start(FREQUENCY_WEEKLY, "08:00", 0, now).unwrap();
        assert_eq!(start, utc(2026, 3, 9, 6, 0)); // Monday 08:00 CAT
    }

    #[test]
    fn instant_frequency_has_no_window() {
        let now = utc(2026, 3, 10, 9, 0);
        assert!(digest_window_start(FREQUENCY_INSTANT, "08:00", 0, now).is_none());
    }

    #[test]
    fn digest_due_only_once_per_window() {
        let now = utc(2026, 3, 10, 9, 0);
        let window = digest_due(FREQUENCY_DAILY, "08:00", 0, None, now).unwrap();

        // A send stamped at (or after) the window start suppresses repeats.
        assert!(digest_due(FREQUENCY_DAILY, "08:00", 0, Some(window), now).is_none());
        assert!(digest_due(FREQUENCY_DAILY, "08:00", 0, Some(now), now).is_none());

        // A send from the previous window does not.
        let stale = window - Duration::hours(1);
        assert_eq!(
            digest_due(FREQUENCY_DAILY, "08:00", 0, Some(stale), now),
            Some(window)
        );
    }

    #[test]
    fn unparseable_digest_time_is_not_due() {
        let now = utc(2026, 3, 10, 9, 0);
        assert!(digest_due(FREQUENCY_DAILY, "8am", 0, None, now).is_none());
    }

    #[test]
    fn method_helpers() {
        assert!(method_includes_email(METHOD_EMAIL));
        assert!(method_includes_email(METHOD_BOTH));
        assert!(!method_includes_email(METHOD_SMS));
        assert!(method_includes_sms(METHOD_SMS));
        assert!(method_includes_sms(METHOD_BOTH));
        assert!(!method_includes_sms(METHOD_EMAIL));
    }
}
