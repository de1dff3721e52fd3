//! Outbound ports — interfaces to collaborators outside the ledger
//!
//! [`SettlementPort`] is the contract that decouples the ledger service from
//! whatever actually moves value between principals. The ledger computes the
//! fee and hands over a [`Settlement`]; the port owns everything after that.

use std::sync::Arc;

use crate::domain::Settlement;
use crate::shared::errors::SettlementError;

/// Port for handing completed-charging fees to the value-transfer system.
///
/// Called once per successful `complete_charging`, after the ledger has
/// committed and released its lock. Implementations must not block for
/// long; the service logs a failure and moves on, it never retries and never
/// rolls the ledger back.
pub trait SettlementPort: Send + Sync {
    fn settle(&self, settlement: &Settlement) -> Result<(), SettlementError>;
}

pub type SharedSettlementPort = Arc<dyn SettlementPort>;

/// Port that accepts and discards every settlement
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSettlement;

impl SettlementPort for NoopSettlement {
    fn settle(&self, _settlement: &Settlement) -> Result<(), SettlementError> {
        Ok(())
    }
}
