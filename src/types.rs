//! Core data types for flight status monitoring.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flight designator used as the monitoring key (e.g. "LA3339").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(String);

impl FlightId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlightId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Normalized, provider-independent view of one flight at fetch time.
///
/// Every field is optional: providers differ widely in what they expose
/// (the zone feed carries little beyond a status label) and a partially
/// filled snapshot must still format and compare cleanly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightSnapshot {
    pub status: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
}

/// Snapshot fields eligible for inclusion in a [`ChangeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    Status,
    ActualDeparture,
    EstimatedArrival,
    ScheduledDeparture,
    ScheduledArrival,
    Origin,
    Destination,
}

/// Ordered set of snapshot fields whose value makes a change
/// notification-worthy.
#[derive(Debug, Clone)]
pub struct KeyPolicy {
    fields: Vec<KeyField>,
}

impl KeyPolicy {
    pub fn new(fields: Vec<KeyField>) -> Self {
        Self { fields }
    }

    /// Track the status label only.
    pub fn status_only() -> Self {
        Self::new(vec![KeyField::Status])
    }

    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }
}

impl Default for KeyPolicy {
    /// Status plus the two timestamps a traveller actually acts on.
    fn default() -> Self {
        Self::new(vec![
            KeyField::Status,
            KeyField::ActualDeparture,
            KeyField::EstimatedArrival,
        ])
    }
}

/// Compact derived value compared across runs to decide whether a flight
/// changed. Two snapshots are equivalent iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeKey(String);

impl ChangeKey {
    /// Joins key fields; stripped from field content so a source value can
    /// never fake a field boundary.
    pub const SEPARATOR: char = '|';

    /// Build the key for a snapshot under the given policy.
    ///
    /// Fields are joined in policy order. Absent fields serialize to the
    /// empty string, so "absent" compares equal across runs regardless of
    /// how a provider spells missing data.
    pub fn build(snapshot: &FlightSnapshot, policy: &KeyPolicy) -> Self {
        let parts: Vec<String> = policy
            .fields()
            .iter()
            .map(|field| field_value(snapshot, *field))
            .collect();
        Self(parts.join(&Self::SEPARATOR.to_string()))
    }

    /// Wrap a previously persisted key verbatim.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn field_value(snapshot: &FlightSnapshot, field: KeyField) -> String {
    match field {
        KeyField::Status => text_value(snapshot.status.as_deref()),
        KeyField::ActualDeparture => time_value(snapshot.actual_departure),
        KeyField::EstimatedArrival => time_value(snapshot.estimated_arrival),
        KeyField::ScheduledDeparture => time_value(snapshot.scheduled_departure),
        KeyField::ScheduledArrival => time_value(snapshot.scheduled_arrival),
        KeyField::Origin => text_value(snapshot.origin.as_deref()),
        KeyField::Destination => text_value(snapshot.destination.as_deref()),
    }
}

fn text_value(value: Option<&str>) -> String {
    value
        .map(|v| v.chars().filter(|c| *c != ChangeKey::SEPARATOR).collect())
        .unwrap_or_default()
}

fn time_value(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> FlightSnapshot {
        FlightSnapshot {
            status: Some("active".to_string()),
            origin: Some("GRU".to_string()),
            destination: Some("SCL".to_string()),
            actual_departure: Some(Utc.with_ymd_and_hms(2026, 5, 1, 10, 25, 0).unwrap()),
            estimated_arrival: Some(Utc.with_ymd_and_hms(2026, 5, 1, 14, 10, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_key_order() {
        let key = ChangeKey::build(&snapshot(), &KeyPolicy::default());
        assert_eq!(
            key.as_str(),
            "active|2026-05-01T10:25:00Z|2026-05-01T14:10:00Z"
        );
    }

    #[test]
    fn test_absent_fields_are_empty_segments() {
        let key = ChangeKey::build(&FlightSnapshot::default(), &KeyPolicy::default());
        assert_eq!(key.as_str(), "||");
    }

    #[test]
    fn test_status_only_policy() {
        let key = ChangeKey::build(&snapshot(), &KeyPolicy::status_only());
        assert_eq!(key.as_str(), "active");
    }

    #[test]
    fn test_separator_stripped_from_content() {
        let mut snap = snapshot();
        snap.status = Some("en|route".to_string());
        let key = ChangeKey::build(&snap, &KeyPolicy::status_only());
        assert_eq!(key.as_str(), "enroute");
    }

    #[test]
    fn test_absent_keys_compare_equal() {
        let a = ChangeKey::build(&FlightSnapshot::default(), &KeyPolicy::default());
        let b = ChangeKey::build(&FlightSnapshot::default(), &KeyPolicy::default());
        assert_eq!(a, b);
    }
}
