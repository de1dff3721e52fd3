//! # Station Ledger
//!
//! Shared registry of charging stations and the reservations held against
//! them. Every mutation is authorized against a recorded principal,
//! validated against current state, and either applied whole or rejected.
//!
//! ## Architecture
//!
//! - **domain**: Stations, reservations, fee rate and the [`Ledger`] state machine
//! - **application**: [`LedgerService`] (locking, logging, events, settlement) and command DTOs
//! - **infrastructure**: Settlement port implementations
//! - **notifications**: Event bus for ledger events
//! - **config**: TOML configuration
//! - **runtime**: Bootstrap and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod runtime;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{LedgerCommand, LedgerService, SettlementPort};
pub use domain::{
    ChargingReceipt, ErrorKind, FeeRate, Ledger, LedgerError, LedgerResult, Principal,
    Reservation, Settlement, Station, StationId,
};

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};

pub use runtime::{init_tracing, LedgerRuntime};
