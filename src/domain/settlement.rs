//! Network fee and settlement value types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Principal, Reservation, StationId};
use crate::shared::errors::ConfigError;

/// Denominator of [`FeeRate`]: one whole expressed in parts-per-ten-thousand
pub const FEE_RATE_DENOMINATOR: u64 = 10_000;

/// Network fee rate in parts-per-ten-thousand (basis points).
///
/// Bounded to `0..=10_000`, so a fee never exceeds the price it is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FeeRate(u32);

impl FeeRate {
    pub const ZERO: FeeRate = FeeRate(0);

    pub fn new(basis_points: u32) -> Result<Self, ConfigError> {
        if u64::from(basis_points) > FEE_RATE_DENOMINATOR {
            return Err(ConfigError::Invalid(format!(
                "network fee rate {} exceeds {}",
                basis_points, FEE_RATE_DENOMINATOR
            )));
        }
        Ok(Self(basis_points))
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }

    /// Fee owed on `price`, truncated toward zero
    ///
    /// # Returns
    /// `floor(price * rate / 10_000)` in the price's currency unit
    pub fn fee_for(&self, price: u64) -> u64 {
        // Widen so price * rate cannot overflow; the quotient is <= price.
        let fee = u128::from(price) * u128::from(self.0) / u128::from(FEE_RATE_DENOMINATOR);
        fee as u64
    }
}

impl Default for FeeRate {
    /// 1%
    fn default() -> Self {
        Self(100)
    }
}

impl TryFrom<u32> for FeeRate {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeeRate> for u32 {
    fn from(rate: FeeRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

/// Value-transfer instruction handed to the settlement collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub station_id: StationId,
    pub payer: Principal,
    pub payee: Principal,
    pub amount: u64,
}

/// Result of a successful `complete_charging`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargingReceipt {
    pub station_id: StationId,
    /// Station price at completion time
    pub price: u64,
    pub fee_rate: FeeRate,
    pub fee: u64,
    /// The reservation that was closed
    pub reservation: Reservation,
    pub settlement: Settlement,
}
