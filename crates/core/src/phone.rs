//! Zimbabwean mobile number normalization for SMS delivery.
//!
//! Accepts the formats users actually type (`077…`, `2637…`, `+2637…`,
//! with optional spaces or hyphens) and normalizes to E.164
//! (`+2637XXXXXXXX`). Anything that does not resolve to a Zimbabwean
//! mobile number is rejected.

use std::sync::OnceLock;

use regex::Regex;

/// E.164 shape of a Zimbabwean mobile number after normalization.
fn msisdn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+2637\d{8}$").expect("static regex must compile"))
}

/// Normalize a phone number to E.164, or `None` if it is not a valid
/// Zimbabwean mobile number.
pub fn normalize_msisdn(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    let normalized = if let Some(rest) = digits.strip_prefix("+263") {
        format!("+263{rest}")
    } else if let Some(rest) = digits.strip_prefix("263") {
        format!("+263{rest}")
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+263{rest}")
    } else {
        return None;
    };

    msisdn_pattern().is_match(&normalized).then_some(normalized)
}
