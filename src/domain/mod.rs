pub mod ledger;
pub mod principal;
pub mod reservation;
pub mod settlement;
pub mod station;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerStats};
pub use principal::Principal;
pub use reservation::Reservation;
pub use settlement::{ChargingReceipt, FeeRate, Settlement, FEE_RATE_DENOMINATOR};
pub use station::{Station, StationId};

pub use crate::shared::errors::{ErrorKind, LedgerError, LedgerResult};
