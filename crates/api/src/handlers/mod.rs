//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod job_alerts;
pub mod jobs;
pub mod realtime;
