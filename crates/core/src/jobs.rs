//! Well-known job posting constants.
//!
//! These must match the values stored in the `jobs.employment_type` and
//! `jobs.status` columns and accepted by the alert matcher.

/// Permanent full-time position.
pub const EMPLOYMENT_FULL_TIME: &str = "full_time";

/// Permanent part-time position.
pub const EMPLOYMENT_PART_TIME: &str = "part_time";

/// Fixed-term contract.
pub const EMPLOYMENT_CONTRACT: &str = "contract";

/// Short-term locum cover.
pub const EMPLOYMENT_LOCUM: &str = "locum";

/// Internship / pre-registration placement.
pub const EMPLOYMENT_INTERNSHIP: &str = "internship";

/// All accepted employment types, for validation.
pub const EMPLOYMENT_TYPES: [&str; 5] = [
    EMPLOYMENT_FULL_TIME,
    EMPLOYMENT_PART_TIME,
    EMPLOYMENT_CONTRACT,
    EMPLOYMENT_LOCUM,
    EMPLOYMENT_INTERNSHIP,
];

/// Returns `true` if `value` is a recognised employment type.
pub fn is_valid_employment_type(value: &str) -> bool {
    EMPLOYMENT_TYPES.contains(&value)
}

// ---------------------------------------------------------------------------
// Job statuses
// ---------------------------------------------------------------------------

/// Accepting applications; visible to the matcher.
pub const STATUS_OPEN: &str = "open";

/// Closed by the posting pharmacy.
pub const STATUS_CLOSED: &str = "closed";

/// Past its `expires_at`; set by the expiry sweep.
pub const STATUS_EXPIRED: &str = "expired";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_employment_types_validate() {
        for t in EMPLOYMENT_TYPES {
            assert!(is_valid_employment_type(t));
        }
    }

    #[test]
    fn unknown_employment_type_rejected() {
        assert!(!is_valid_employment_type("freelance"));
        assert!(!is_valid_employment_type(""));
        assert!(!is_valid_employment_type("Full_Time"));
    }
}
