//! Shared domain types and logic for the ZimPharmHub backend.
//!
//! This crate is dependency-light on purpose: it holds the pieces every
//! other crate agrees on — ID/timestamp aliases, the error taxonomy,
//! alert matching and digest-window rules, and well-known string
//! constants for jobs and events.

pub mod alert;
pub mod error;
pub mod events;
pub mod jobs;
pub mod phone;
pub mod types;
