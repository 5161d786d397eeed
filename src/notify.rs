//! Outbound notification delivery.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Sink rejected message: {status}")]
    Rejected { status: StatusCode },
}

/// Capability interface for notification transports.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one formatted message. Only an `Ok` return lets the caller
    /// mark the flight as notified.
    async fn deliver(&self, message: &str) -> Result<(), DeliverError>;
}

/// Configuration for the CallMeBot WhatsApp gateway.
#[derive(Debug, Clone)]
pub struct CallMeBotConfig {
    /// Destination phone number, international format.
    pub phone: String,
    /// Per-phone API key issued by the gateway.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl CallMeBotConfig {
    pub fn new(phone: String, api_key: String) -> Self {
        Self {
            phone,
            api_key,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// WhatsApp delivery via the CallMeBot HTTP gateway.
pub struct CallMeBotSink {
    client: Client,
    config: CallMeBotConfig,
    base_url: String,
}

impl CallMeBotSink {
    /// Create a new sink.
    pub fn new(config: CallMeBotConfig) -> Result<Self, DeliverError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            base_url: "https://api.callmebot.com/whatsapp.php".to_string(),
        })
    }
}

#[async_trait]
impl NotificationSink for CallMeBotSink {
    async fn deliver(&self, message: &str) -> Result<(), DeliverError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("phone", self.config.phone.as_str()),
                ("text", message),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("CallMeBot responded {}", status);

        if status.is_success() {
            Ok(())
        } else {
            Err(DeliverError::Rejected { status })
        }
    }
}
