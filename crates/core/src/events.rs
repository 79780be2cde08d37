//! Well-known event-type and notification-type name constants.
//!
//! Event types are the dot-separated names published on the event bus;
//! notification types are the values stored in the
//! `notifications.notification_type` column and echoed to clients so
//! the notification center can pick an icon per kind.

/// A pharmacy published a new job posting.
pub const EVENT_JOB_POSTED: &str = "job.posted";

/// A job alert matched one or more new jobs.
pub const EVENT_ALERT_MATCHED: &str = "job_alert.matched";

/// A direct chat message was sent.
pub const EVENT_MESSAGE_RECEIVED: &str = "message.received";

/// Someone viewed a professional's profile.
pub const EVENT_PROFILE_VIEWED: &str = "profile.viewed";

// ---------------------------------------------------------------------------
// Notification types
// ---------------------------------------------------------------------------

/// A saved alert matched new jobs.
pub const NOTIFY_JOB_MATCH: &str = "job_match";

/// A new chat message arrived.
pub const NOTIFY_MESSAGE: &str = "message";

/// The user's profile was viewed.
pub const NOTIFY_PROFILE_VIEW: &str = "profile_view";
