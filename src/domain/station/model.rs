//! Station domain entity

use serde::{Deserialize, Serialize};

use crate::domain::Principal;

/// Numeric station identifier
pub type StationId = u64;

/// A chargeable resource registered on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Principal that registered the station
    pub owner: Principal,
    /// Rate in the smallest currency unit
    pub price: u64,
    /// Open for reservation
    pub available: bool,
}

impl Station {
    /// Freshly registered station, open for reservation
    pub fn new(owner: Principal, price: u64) -> Self {
        Self {
            owner,
            price,
            available: true,
        }
    }

    pub fn is_owned_by(&self, caller: &Principal) -> bool {
        &self.owner == caller
    }
}
