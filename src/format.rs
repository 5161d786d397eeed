//! Human-readable notification rendering.

use crate::types::{FlightId, FlightSnapshot};
use chrono::{DateTime, Utc};

const ABSENT: &str = "?";

/// Render the notification for one changed flight.
///
/// Total over any snapshot: absent fields render as placeholders.
/// `generated_at` is the wall-clock time of the run, stamped so the
/// recipient can tell a stale delivery from a fresh event.
pub fn render(id: &FlightId, snapshot: &FlightSnapshot, generated_at: DateTime<Utc>) -> String {
    format!(
        "\u{2708}\u{fe0f} Flight {} update\n\n\
         Route: {} -> {}\n\
         Status: {}\n\
         Departure: scheduled {} / actual {}\n\
         Arrival: scheduled {} / estimated {}\n\n\
         \u{23f0} {}",
        id,
        text(snapshot.origin.as_deref()),
        text(snapshot.destination.as_deref()),
        text(snapshot.status.as_deref()),
        time(snapshot.scheduled_departure),
        time(snapshot.actual_departure),
        time(snapshot.scheduled_arrival),
        time(snapshot.estimated_arrival),
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or(ABSENT).to_string()
}

fn time(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(t) => t.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => ABSENT.to_string(),
    }
}
