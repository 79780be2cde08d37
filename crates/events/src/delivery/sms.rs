//! SMS delivery via an HTTP gateway.
//!
//! [`SmsDelivery`] posts a JSON payload to a configurable gateway
//! endpoint (any bulk-SMS provider with a token-authenticated HTTP API).
//! Like the email channel this is best effort: a failed send is
//! reported to the caller, logged, and never retried.

use std::time::Duration;

/// HTTP request timeout for a single send attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for SMS delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("SMS gateway returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// SmsConfig
// ---------------------------------------------------------------------------

/// Default sender id shown on recipients' handsets.
const DEFAULT_SENDER_ID: &str = "ZimPharmHub";

/// Configuration for the SMS gateway.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Gateway endpoint receiving the send request.
    pub gateway_url: String,
    /// Optional bearer token for the gateway.
    pub api_token: Option<String>,
    /// Sender id (alphanumeric originator).
    pub sender_id: String,
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMS_GATEWAY_URL` is not set, signalling that
    /// SMS delivery is not configured and should be skipped.
    ///
    /// | Variable          | Required | Default       |
    /// |-------------------|----------|---------------|
    /// | `SMS_GATEWAY_URL` | yes      | —             |
    /// | `SMS_API_TOKEN`   | no       | —             |
    /// | `SMS_SENDER_ID`   | no       | `ZimPharmHub` |
    pub fn from_env() -> Option<Self> {
        let gateway_url = std::env::var("SMS_GATEWAY_URL").ok()?;
        Some(Self {
            gateway_url,
            api_token: std::env::var("SMS_API_TOKEN").ok(),
            sender_id: std::env::var("SMS_SENDER_ID")
                .unwrap_or_else(|_| DEFAULT_SENDER_ID.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// SmsDelivery
// ---------------------------------------------------------------------------

/// Sends alert SMS messages through the configured HTTP gateway.
pub struct SmsDelivery {
    config: SmsConfig,
    client: reqwest::Client,
}

impl SmsDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new(config: SmsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Send a single SMS to an E.164 number.
    pub async fn send(&self, msisdn: &str, text: &str) -> Result<(), SmsError> {
        let payload = serde_json::json!({
            "to": msisdn,
            "from": self.config.sender_id,
            "message": text,
        });

        let mut request = self.client.post(&self.config.gateway_url).json(&payload);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SmsError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(to = msisdn, "Alert SMS sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
