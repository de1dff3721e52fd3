//! Ledger events
//!
//! Every successful mutation of the ledger is published as one of these
//! events for audit and settlement consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Principal, StationId};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Station registered (or re-registered over an existing id)
    StationRegistered(StationRegisteredEvent),
    /// Owner changed the station price
    StationPriceUpdated(StationPriceUpdatedEvent),
    /// Owner forced the availability flag
    StationAvailabilityChanged(StationAvailabilityChangedEvent),
    /// Reservation created
    ReservationCreated(ReservationCreatedEvent),
    /// Reservation completed and fee computed
    ChargingCompleted(ChargingCompletedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::StationRegistered(_) => "station_registered",
            Event::StationPriceUpdated(_) => "station_price_updated",
            Event::StationAvailabilityChanged(_) => "station_availability_changed",
            Event::ReservationCreated(_) => "reservation_created",
            Event::ChargingCompleted(_) => "charging_completed",
        }
    }

    pub fn station_id(&self) -> StationId {
        match self {
            Event::StationRegistered(e) => e.station_id,
            Event::StationPriceUpdated(e) => e.station_id,
            Event::StationAvailabilityChanged(e) => e.station_id,
            Event::ReservationCreated(e) => e.station_id,
            Event::ChargingCompleted(e) => e.station_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRegisteredEvent {
    pub station_id: StationId,
    pub owner: Principal,
    pub price: u64,
    /// Owner of the entry this registration overwrote, if any
    pub replaced_owner: Option<Principal>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationPriceUpdatedEvent {
    pub station_id: StationId,
    pub old_price: u64,
    pub new_price: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationAvailabilityChangedEvent {
    pub station_id: StationId,
    pub available: bool,
    /// A reservation record existed when the flag was forced
    pub reservation_present: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreatedEvent {
    pub station_id: StationId,
    pub user: Principal,
    pub start_time: i64,
    pub end_time: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingCompletedEvent {
    pub station_id: StationId,
    pub payer: Principal,
    pub payee: Principal,
    pub price: u64,
    pub fee: u64,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    /// Position in the ledger's mutation order
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(sequence: u64, event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sequence,
            timestamp: Utc::now(),
            event,
        }
    }
}
