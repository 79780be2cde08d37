//! ZimPharmHub event bus and notification delivery infrastructure.
//!
//! This crate provides the building blocks of the alert matching and
//! digest delivery flow:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] — the canonical domain event envelope.
//! - [`delivery`] — external delivery channels (email, SMS).
//! - [`DigestScheduler`] — periodic digest notification processor.

pub mod bus;
pub mod delivery;
pub mod digest;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::sms::{SmsConfig, SmsDelivery};
pub use delivery::Notifier;
pub use digest::DigestScheduler;
