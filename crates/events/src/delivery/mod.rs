//! External delivery channels for alert notifications.
//!
//! [`Notifier`] bundles the optional email and SMS channels and decides,
//! per alert, which to use. Delivery is best effort: failures are logged
//! and never propagate into the matching pass, and there is no retry.

use pharmhub_core::alert::{method_includes_email, method_includes_sms};
use pharmhub_core::phone::normalize_msisdn;
use pharmhub_db::models::job::Job;
use pharmhub_db::models::job_alert::JobAlert;
use pharmhub_db::models::user::User;

pub mod email;
pub mod sms;

use email::EmailDelivery;
use sms::SmsDelivery;

/// What a dispatch attempt actually delivered.
#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchOutcome {
    pub email_sent: bool,
    pub sms_sent: bool,
}

impl DispatchOutcome {
    /// `true` if at least one channel delivered.
    pub fn any(&self) -> bool {
        self.email_sent || self.sms_sent
    }
}

/// Formats and dispatches alert notifications over the configured channels.
pub struct Notifier {
    email: Option<EmailDelivery>,
    sms: Option<SmsDelivery>,
}

impl Notifier {
    pub fn new(email: Option<EmailDelivery>, sms: Option<SmsDelivery>) -> Self {
        Self { email, sms }
    }

    /// Build from environment configuration. Channels without
    /// configuration are absent and skipped at dispatch time.
    pub fn from_env() -> Self {
        let email = email::EmailConfig::from_env().map(EmailDelivery::new);
        let sms = sms::SmsConfig::from_env().map(SmsDelivery::new);
        Self::new(email, sms)
    }

    /// `true` when SMTP delivery is configured.
    pub fn email_configured(&self) -> bool {
        self.email.is_some()
    }

    /// Send one alert dispatch (instant match or digest) to the alert's
    /// owner over the channels its `notification_method` selects.
    ///
    /// Failures are logged and reflected in the returned
    /// [`DispatchOutcome`]; they are never fatal.
    pub async fn dispatch_alert(
        &self,
        owner: &User,
        alert: &JobAlert,
        jobs: &[Job],
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        if method_includes_email(&alert.notification_method) {
            if let Some(mailer) = &self.email {
                let subject = digest_subject(alert, jobs.len());
                let body = digest_body(alert, jobs);
                match mailer.send(&owner.email, &subject, &body).await {
                    Ok(()) => outcome.email_sent = true,
                    Err(e) => {
                        tracing::error!(
                            alert_id = alert.id,
                            to = %owner.email,
                            error = %e,
                            "Alert email delivery failed"
                        );
                    }
                }
            } else {
                tracing::debug!(alert_id = alert.id, "Email not configured, skipping");
            }
        }

        if method_includes_sms(&alert.notification_method) {
            match (&self.sms, owner.phone.as_deref().and_then(normalize_msisdn)) {
                (Some(sms), Some(msisdn)) => {
                    let text = sms_text(alert, jobs.len());
                    match sms.send(&msisdn, &text).await {
                        Ok(()) => outcome.sms_sent = true,
                        Err(e) => {
                            tracing::error!(
                                alert_id = alert.id,
                                error = %e,
                                "Alert SMS delivery failed"
                            );
                        }
                    }
                }
                (None, _) => {
                    tracing::debug!(alert_id = alert.id, "SMS not configured, skipping");
                }
                (_, None) => {
                    tracing::warn!(
                        alert_id = alert.id,
                        user_id = owner.id,
                        "No valid mobile number on file, skipping SMS"
                    );
                }
            }
        }

        outcome
    }
}

/// Subject line for an alert dispatch email.
fn digest_subject(alert: &JobAlert, count: usize) -> String {
    let noun = if count == 1 { "job" } else { "jobs" };
    format!("[ZimPharmHub] {count} new {noun} for \"{}\"", alert.name)
}

/// Plain-text body listing the matched jobs.
fn digest_body(alert: &JobAlert, jobs: &[Job]) -> String {
    let mut body = format!(
        "Your job alert \"{}\" matched {} new posting(s):\n\n",
        alert.name,
        jobs.len()
    );

    for job in jobs {
        body.push_str(&format!(
            "- {} ({}) — {}, {}",
            job.title, job.position, job.location_city, job.location_province
        ));
        match (job.salary_min, job.salary_max) {
            (Some(min), Some(max)) => {
                body.push_str(&format!(" — {min}–{max} {}", job.salary_currency));
            }
            (Some(min), None) => body.push_str(&format!(" — from {min} {}", job.salary_currency)),
            (None, Some(max)) => body.push_str(&format!(" — up to {max} {}", job.salary_currency)),
            (None, None) => {}
        }
        body.push('\n');
    }

    body.push_str("\nManage this alert from your ZimPharmHub dashboard.\n");
    body
}

/// Short text for the SMS channel.
fn sms_text(alert: &JobAlert, count: usize) -> String {
    format!(
        "ZimPharmHub: {count} new job(s) match your alert \"{}\". Log in to view.",
        alert.name
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
