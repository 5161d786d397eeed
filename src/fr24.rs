//! Flightradar24 zone-feed provider.
//!
//! The feed returns one JSON object per region whose values mix flight
//! records with scalar metadata keys (`full_count`, `version`), so the
//! payload is walked as untyped JSON and non-object values are skipped.
//! Zone records carry little beyond the flight designator and a status
//! label; schedule times come from the lookup provider instead.

use crate::source::{FlightSource, RawFlight, SourceError};
use crate::types::FlightId;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

const FEED_PATH: &str = "/zones/fcgi/feed.js";

/// Geographic bounds for the zone query, serialized `south,north,west,east`.
#[derive(Debug, Clone, Copy)]
pub struct ZoneBounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl ZoneBounds {
    /// Brazil, Mexico and the eastern Pacific.
    pub const AMERICAS: Self = Self {
        south: -60.0,
        north: 60.0,
        west: -140.0,
        east: -30.0,
    };

    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    fn to_query_string(&self) -> String {
        format!("{},{},{},{}", self.south, self.north, self.west, self.east)
    }
}

/// Configuration for the zone-feed client.
#[derive(Debug, Clone)]
pub struct Fr24Config {
    /// Region to query; flights outside it are invisible to this provider.
    pub bounds: ZoneBounds,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for Fr24Config {
    fn default() -> Self {
        Self {
            bounds: ZoneBounds::AMERICAS,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Fr24Config {
    pub fn with_bounds(mut self, bounds: ZoneBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One flight record from the zone feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneFlight {
    /// Flight designator as the feed reports it.
    pub flight: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Client for the Flightradar24 zone feed.
pub struct Fr24Source {
    client: Client,
    config: Fr24Config,
    base_url: String,
}

impl Fr24Source {
    /// Create a new zone-feed client.
    pub fn new(config: Fr24Config) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent("Mozilla/5.0")
            .timeout(config.timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            config,
            base_url: "https://data-cloud.flightradar24.com".to_string(),
        })
    }

    async fn fetch_feed(&self) -> Result<Map<String, Value>, SourceError> {
        let url = format!(
            "{}{}?bounds={}",
            self.base_url,
            FEED_PATH,
            self.config.bounds.to_query_string()
        );

        tracing::debug!("Fetching zone feed: {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SourceError::Auth),
            status => Err(SourceError::ServerError { status }),
        }
    }
}

#[async_trait]
impl FlightSource for Fr24Source {
    async fn fetch(&self, id: &FlightId) -> Result<Option<RawFlight>, SourceError> {
        let feed = self.fetch_feed().await?;
        Ok(find_flight(&feed, id).map(RawFlight::Zone))
    }
}

/// Scan a zone feed for the first record matching the designator.
///
/// The feed pads designators with callsign prefixes, so a containment
/// match is used rather than equality.
fn find_flight(feed: &Map<String, Value>, id: &FlightId) -> Option<ZoneFlight> {
    feed.values()
        .filter(|value| value.is_object())
        .filter_map(|value| serde_json::from_value::<ZoneFlight>(value.clone()).ok())
        .find(|flight| flight.flight.contains(id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_feed() -> Map<String, Value> {
        let json = serde_json::json!({
            "full_count": 18432,
            "version": 4,
            "2f9a1c": {"flight": "LA3339", "status": "active"},
            "2f9a1d": {"flight": "AM694", "status": "scheduled"},
            "2f9a1e": {"flight": "CD456"}
        });
        match json {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_bounds_query_string() {
        // Format: south,north,west,east
        assert_eq!(ZoneBounds::AMERICAS.to_query_string(), "-60,60,-140,-30");
        let bounds = ZoneBounds::new(40.0, 45.0, -75.0, -70.0);
        assert_eq!(bounds.to_query_string(), "40,45,-75,-70");
    }

    #[test]
    fn test_find_flight_skips_metadata_values() {
        let flight = find_flight(&sample_feed(), &FlightId::from("LA3339")).unwrap();
        assert_eq!(flight.flight, "LA3339");
        assert_eq!(flight.status.as_deref(), Some("active"));
    }

    #[test]
    fn test_find_flight_matches_by_containment() {
        let mut feed = sample_feed();
        feed.insert(
            "2f9a1f".to_string(),
            serde_json::json!({"flight": "XLA8112X", "status": "landed"}),
        );
        let flight = find_flight(&feed, &FlightId::from("LA8112")).unwrap();
        assert_eq!(flight.status.as_deref(), Some("landed"));
    }

    #[test]
    fn test_find_flight_missing_status() {
        let flight = find_flight(&sample_feed(), &FlightId::from("CD456")).unwrap();
        assert!(flight.status.is_none());
    }

    #[test]
    fn test_find_flight_absent() {
        assert!(find_flight(&sample_feed(), &FlightId::from("ZZ999")).is_none());
    }
}
