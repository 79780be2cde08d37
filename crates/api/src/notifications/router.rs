//! Event-to-notification routing engine.
//!
//! [`NotificationRouter`] subscribes to the platform event bus and turns
//! each event into user-facing notifications: an in-app row, a WebSocket
//! push, and — for instant-frequency job alerts — an immediate email/SMS
//! dispatch.

use std::sync::Arc;

use axum::extract::ws::Message;
use pharmhub_core::alert::FREQUENCY_INSTANT;
use pharmhub_core::events::{
    EVENT_JOB_POSTED, EVENT_MESSAGE_RECEIVED, EVENT_PROFILE_VIEWED, NOTIFY_JOB_MATCH,
    NOTIFY_MESSAGE, NOTIFY_PROFILE_VIEW,
};
use pharmhub_core::types::DbId;
use pharmhub_db::models::job::Job;
use pharmhub_db::models::job_alert::JobAlert;
use pharmhub_db::models::notification::CreateNotification;
use pharmhub_db::repositories::{JobAlertRepo, JobRepo, NotificationRepo, UserRepo};
use pharmhub_db::DbPool;
use pharmhub_events::{Notifier, PlatformEvent};
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Routes platform events to user notifications.
///
/// Consumes events from the broadcast channel and, for each event,
/// determines the target users and delivers notifications through the
/// appropriate channels.
pub struct NotificationRouter {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
    notifier: Arc<Notifier>,
}

impl NotificationRouter {
    /// Create a new router.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>, notifier: Arc<Notifier>) -> Self {
        Self {
            pool,
            ws_manager,
            notifier,
        }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](pharmhub_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Route a single event to all affected users.
    async fn route_event(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        match event.event_type.as_str() {
            EVENT_JOB_POSTED => self.handle_job_posted(event).await,
            EVENT_MESSAGE_RECEIVED => self.handle_message_received(event).await,
            EVENT_PROFILE_VIEWED => self.handle_profile_viewed(event).await,
            other => {
                tracing::debug!(event_type = other, "No routing rule for event");
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // job.posted
    // -----------------------------------------------------------------------

    /// Reverse-match a freshly posted job against all active alerts.
    ///
    /// Every matching alert gets a queue entry, counters, an in-app
    /// notification, and a WebSocket push; instant-frequency alerts are
    /// dispatched by email/SMS on the spot.
    async fn handle_job_posted(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        let Some(job_id) = event.source_entity_id else {
            tracing::warn!("job.posted event without a job id");
            return Ok(());
        };
        let Some(job) = JobRepo::find_by_id(&self.pool, job_id).await? else {
            tracing::warn!(job_id, "job.posted for a job that no longer exists");
            return Ok(());
        };

        let alerts = JobAlertRepo::find_matching_alerts(&self.pool, &job).await?;
        let alert_count = alerts.len();

        for alert in &alerts {
            if let Err(e) = self.notify_alert_match(alert, &job).await {
                tracing::error!(
                    alert_id = alert.id,
                    job_id = job.id,
                    error = %e,
                    "Failed to process alert match"
                );
            }
        }

        if alert_count > 0 {
            tracing::info!(job_id = job.id, alert_count, "Job matched alerts");
        }
        Ok(())
    }

    /// Record one alert/job match and notify the alert owner.
    async fn notify_alert_match(&self, alert: &JobAlert, job: &Job) -> Result<(), sqlx::Error> {
        // The unique (alert_id, job_id) pair makes re-delivery a no-op.
        if !JobAlertRepo::enqueue_match(&self.pool, alert.id, job.id).await? {
            return Ok(());
        }
        JobAlertRepo::record_matches(&self.pool, alert.id, 1).await?;

        let notification = NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id: alert.owner_id,
                notification_type: NOTIFY_JOB_MATCH.to_string(),
                title: format!("New job match for \"{}\"", alert.name),
                content: format!(
                    "{} ({}) in {}, {}",
                    job.title, job.position, job.location_city, job.location_province
                ),
                action_url: Some(format!("/jobs/{}", job.id)),
            },
        )
        .await?;

        self.push_notification(alert.owner_id, "notification", &notification)
            .await;

        if alert.frequency == FREQUENCY_INSTANT {
            self.dispatch_instant(alert).await?;
        }

        Ok(())
    }

    /// Immediately drain and dispatch an instant-frequency alert.
    async fn dispatch_instant(&self, alert: &JobAlert) -> Result<(), sqlx::Error> {
        let jobs = JobAlertRepo::pending_jobs(&self.pool, alert.id).await?;
        if jobs.is_empty() {
            return Ok(());
        }
        let Some(owner) = UserRepo::find_by_id(&self.pool, alert.owner_id).await? else {
            return Ok(());
        };

        let outcome = self.notifier.dispatch_alert(&owner, alert, &jobs).await;

        JobAlertRepo::drain_queue(&self.pool, alert.id).await?;
        JobAlertRepo::record_notification_sent(&self.pool, alert.id).await?;

        tracing::info!(
            alert_id = alert.id,
            job_count = jobs.len(),
            email_sent = outcome.email_sent,
            sms_sent = outcome.sms_sent,
            "Instant alert dispatched"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // message.received
    // -----------------------------------------------------------------------

    /// Notify a chat recipient: in-app row plus `message_received` push.
    async fn handle_message_received(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        let Some(recipient_id) = event
            .payload
            .get("recipient_id")
            .and_then(serde_json::Value::as_i64)
        else {
            tracing::warn!("message.received event without a recipient_id");
            return Ok(());
        };

        let sender_name = event
            .payload
            .get("sender_username")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Someone");
        let preview = event
            .payload
            .get("preview")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();

        let notification = NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id: recipient_id,
                notification_type: NOTIFY_MESSAGE.to_string(),
                title: format!("New message from {sender_name}"),
                content: preview.to_string(),
                action_url: event
                    .actor_user_id
                    .map(|sender| format!("/chat/{sender}")),
            },
        )
        .await?;

        // The chat UI needs the full message to append in place.
        let push = serde_json::json!({
            "type": "message_received",
            "message": event.payload.get("message"),
            "notification": notification,
        });
        self.ws_manager
            .send_to_user(recipient_id, Message::Text(push.to_string().into()))
            .await;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // profile.viewed
    // -----------------------------------------------------------------------

    /// Notify a professional that their profile was viewed.
    async fn handle_profile_viewed(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        let Some(viewed_user_id) = event
            .payload
            .get("viewed_user_id")
            .and_then(serde_json::Value::as_i64)
        else {
            tracing::warn!("profile.viewed event without a viewed_user_id");
            return Ok(());
        };

        let viewer_name = event
            .payload
            .get("viewer_username")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("An employer");

        let notification = NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id: viewed_user_id,
                notification_type: NOTIFY_PROFILE_VIEW.to_string(),
                title: "Your profile was viewed".to_string(),
                content: format!("{viewer_name} viewed your profile"),
                action_url: None,
            },
        )
        .await?;

        self.push_notification(viewed_user_id, "profile_viewed", &notification)
            .await;
        Ok(())
    }

    /// Push a notification row to a user's live connections.
    async fn push_notification(
        &self,
        user_id: DbId,
        event_name: &str,
        notification: &pharmhub_db::models::notification::Notification,
    ) {
        let push = serde_json::json!({
            "type": event_name,
            "notification": notification,
        });
        self.ws_manager
            .send_to_user(user_id, Message::Text(push.to_string().into()))
            .await;
    }
}
