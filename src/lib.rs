//! Flight status monitor with at-most-once change notifications.
//!
//! This library provides functionality to:
//! - Fetch flight records from pluggable upstream providers
//! - Normalize heterogeneous provider payloads into one snapshot shape
//! - Detect notification-worthy changes across runs
//! - Deliver a WhatsApp message exactly once per detected change
//! - Persist last-notified state across process restarts
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Source    │───▶│  Normalize  │───▶│   Detect    │
//! │ (fr24/lookup)│   │ (snapshot)  │    │ (change key)│
//! └─────────────┘    └─────────────┘    └──────┬──────┘
//!                                              │ changed
//!        ┌─────────────┐    ┌─────────────┐    ▼
//!        │    Store    │◀───│   Notify    │◀─ format
//!        │ (JSON file) │    │ (WhatsApp)  │
//!        └─────────────┘    └─────────────┘
//!              ▲ persisted only after delivery succeeds
//! ```
//!
//! # Example
//!
//! ```no_run
//! use flightwatch::{
//!     fr24::{Fr24Config, Fr24Source},
//!     monitor::{Monitor, MonitorConfig},
//!     notify::{CallMeBotConfig, CallMeBotSink},
//!     store::StatusStore,
//!     types::FlightId,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Fr24Source::new(Fr24Config::default())?;
//!     let sink = CallMeBotSink::new(CallMeBotConfig::new(
//!         "+5511999999999".to_string(),
//!         "apikey".to_string(),
//!     ))?;
//!
//!     let store = StatusStore::load("last_status.json");
//!     let config = MonitorConfig::new(vec![
//!         FlightId::from("LA3339"),
//!         FlightId::from("AM694"),
//!     ]);
//!
//!     let mut monitor = Monitor::new(source, sink, store, config);
//!     let report = monitor.run_once().await?;
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```

pub mod detect;
pub mod format;
pub mod fr24;
pub mod lookup;
pub mod monitor;
pub mod normalize;
pub mod notify;
pub mod source;
pub mod store;
pub mod types;
