//! Canonical normalization of provider records.
//!
//! Each provider shape maps into the single [`FlightSnapshot`] the
//! detector and formatter operate on. Field-level problems never
//! propagate: a missing or unparsable value becomes an absent field.

use crate::fr24::ZoneFlight;
use crate::lookup::LookupFlight;
use crate::source::RawFlight;
use crate::types::FlightSnapshot;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Map a raw provider record into the canonical snapshot.
pub fn normalize(raw: &RawFlight) -> FlightSnapshot {
    match raw {
        RawFlight::Zone(flight) => from_zone(flight),
        RawFlight::Lookup(flight) => from_lookup(flight),
    }
}

fn from_zone(flight: &ZoneFlight) -> FlightSnapshot {
    FlightSnapshot {
        status: non_empty(flight.status.as_deref()),
        ..Default::default()
    }
}

fn from_lookup(flight: &LookupFlight) -> FlightSnapshot {
    let departure = flight.departure.as_ref();
    let arrival = flight.arrival.as_ref();

    FlightSnapshot {
        status: non_empty(flight.status.as_deref()),
        origin: departure.and_then(|e| non_empty(e.iata.as_deref())),
        destination: arrival.and_then(|e| non_empty(e.iata.as_deref())),
        scheduled_departure: departure.and_then(|e| endpoint_time(e.scheduled.as_deref())),
        actual_departure: departure.and_then(|e| endpoint_time(e.actual.as_deref())),
        scheduled_arrival: arrival.and_then(|e| endpoint_time(e.scheduled.as_deref())),
        estimated_arrival: arrival.and_then(|e| endpoint_time(e.estimated.as_deref())),
    }
}

fn endpoint_time(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_timestamp)
}

/// Parse a provider timestamp into an unambiguous instant.
///
/// RFC 3339 with offset first; some plans omit the offset, which is
/// documented as UTC. Anything else is treated as absent.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    tracing::debug!("Unparsable timestamp dropped: {:?}", raw);
    None
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupEndpoint;
    use chrono::TimeZone;

    fn endpoint(scheduled: &str, estimated: &str, actual: Option<&str>) -> LookupEndpoint {
        LookupEndpoint {
            iata: Some("GRU".to_string()),
            scheduled: Some(scheduled.to_string()),
            estimated: Some(estimated.to_string()),
            actual: actual.map(str::to_string),
        }
    }

    #[test]
    fn test_zone_record_carries_status_only() {
        let snapshot = normalize(&RawFlight::Zone(ZoneFlight {
            flight: "LA3339".to_string(),
            status: Some("active".to_string()),
        }));
        assert_eq!(snapshot.status.as_deref(), Some("active"));
        assert!(snapshot.origin.is_none());
        assert!(snapshot.actual_departure.is_none());
    }

    #[test]
    fn test_zone_empty_status_is_absent() {
        let snapshot = normalize(&RawFlight::Zone(ZoneFlight {
            flight: "LA3339".to_string(),
            status: Some("  ".to_string()),
        }));
        assert!(snapshot.status.is_none());
    }

    #[test]
    fn test_lookup_full_mapping() {
        let raw = RawFlight::Lookup(LookupFlight {
            status: Some("active".to_string()),
            departure: Some(endpoint(
                "2026-05-01T10:00:00+00:00",
                "2026-05-01T10:00:00+00:00",
                Some("2026-05-01T10:25:00+00:00"),
            )),
            arrival: Some(LookupEndpoint {
                iata: Some("SCL".to_string()),
                scheduled: Some("2026-05-01T14:00:00+00:00".to_string()),
                estimated: Some("2026-05-01T14:10:00+00:00".to_string()),
                actual: None,
            }),
        });

        let snapshot = normalize(&raw);
        assert_eq!(snapshot.origin.as_deref(), Some("GRU"));
        assert_eq!(snapshot.destination.as_deref(), Some("SCL"));
        assert_eq!(
            snapshot.actual_departure,
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 10, 25, 0).unwrap())
        );
        assert_eq!(
            snapshot.estimated_arrival,
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 14, 10, 0).unwrap())
        );
    }

    #[test]
    fn test_offset_timestamps_resolve_to_utc() {
        let parsed = parse_timestamp("2026-05-01T07:25:00-03:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 5, 1, 10, 25, 0).unwrap());
    }

    #[test]
    fn test_naive_timestamp_assumed_utc() {
        let parsed = parse_timestamp("2026-05-01T10:25:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 5, 1, 10, 25, 0).unwrap());
    }

    #[test]
    fn test_garbage_timestamp_is_absent() {
        assert!(parse_timestamp("tomorrow-ish").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_lookup_missing_blocks() {
        let snapshot = normalize(&RawFlight::Lookup(LookupFlight {
            status: None,
            departure: None,
            arrival: None,
        }));
        assert_eq!(snapshot, FlightSnapshot::default());
    }
}
