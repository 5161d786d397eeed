//! Flights-lookup REST provider.
//!
//! Schedule-rich provider queried per flight designator: one request
//! returns the status label, the route endpoints and the four schedule
//! timestamps the notifier renders. Payload shape follows the
//! aviationstack `/flights` listing.

use crate::source::{FlightSource, RawFlight, SourceError};
use crate::types::FlightId;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the lookup client.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Account API key, passed as a query parameter.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl LookupConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One flight record from the lookup API.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupFlight {
    #[serde(rename = "flight_status")]
    pub status: Option<String>,
    pub departure: Option<LookupEndpoint>,
    pub arrival: Option<LookupEndpoint>,
}

/// Departure or arrival block of a lookup record.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupEndpoint {
    /// Airport IATA code.
    pub iata: Option<String>,
    pub scheduled: Option<String>,
    pub estimated: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Vec<LookupFlight>,
}

/// Client for the flights-lookup API.
pub struct LookupSource {
    client: Client,
    config: LookupConfig,
    base_url: String,
}

impl LookupSource {
    /// Create a new lookup client.
    pub fn new(config: LookupConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            base_url: "https://api.aviationstack.com/v1".to_string(),
        })
    }
}

#[async_trait]
impl FlightSource for LookupSource {
    async fn fetch(&self, id: &FlightId) -> Result<Option<RawFlight>, SourceError> {
        let url = format!("{}/flights", self.base_url);

        tracing::debug!("Looking up flight {}", id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_key", self.config.api_key.as_str()),
                ("flight_iata", id.as_str()),
            ])
            .send()
            .await?;

        let body: LookupResponse = match response.status() {
            StatusCode::OK => response.json().await?,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(SourceError::Auth),
            status => return Err(SourceError::ServerError { status }),
        };

        // The listing may carry several legs; the first entry is the
        // current or next departure.
        Ok(body.data.into_iter().next().map(RawFlight::Lookup))
    }
}
