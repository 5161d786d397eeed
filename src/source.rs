//! Provider adapter contract for upstream flight data.
//!
//! To add a provider, implement [`FlightSource`] and give the normalizer a
//! mapping for its raw record shape. The rest of the pipeline only ever
//! sees the canonical [`crate::types::FlightSnapshot`].

use crate::fr24::ZoneFlight;
use crate::lookup::LookupFlight;
use crate::types::FlightId;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned error status: {status}")]
    ServerError { status: StatusCode },
    #[error("Authentication rejected")]
    Auth,
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// One raw provider record, prior to normalization.
#[derive(Debug, Clone)]
pub enum RawFlight {
    /// Flightradar24 zone-feed record.
    Zone(ZoneFlight),
    /// Flights-lookup API record.
    Lookup(LookupFlight),
}

/// Capability interface for flight-data providers.
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Fetch the current record for one flight.
    ///
    /// `Ok(None)` means the provider has no record for this identifier
    /// right now; a flight that is not yet (or no longer) airborne is
    /// indistinguishable from one the provider does not know.
    async fn fetch(&self, id: &FlightId) -> Result<Option<RawFlight>, SourceError>;
}
