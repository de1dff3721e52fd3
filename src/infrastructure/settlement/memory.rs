//! In-memory settlement recorder

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::application::ports::SettlementPort;
use crate::domain::{Principal, Settlement};
use crate::shared::errors::SettlementError;

/// Records settlement instructions and keeps a net position per principal.
///
/// Intended for development, audit replay and testing. It does not model
/// real balances: payers go negative freely.
pub struct InMemorySettlementLedger {
    records: Mutex<Vec<Settlement>>,
    positions: DashMap<Principal, i128>,
}

impl InMemorySettlementLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            positions: DashMap::new(),
        }
    }

    /// All settlements in the order they were received
    pub fn records(&self) -> Vec<Settlement> {
        self.records.lock().clone()
    }

    /// Net amount received minus amount paid for `principal`
    pub fn position(&self, principal: &Principal) -> i128 {
        self.positions.get(principal).map(|p| *p).unwrap_or(0)
    }

    /// Sum of all settled amounts
    pub fn total_settled(&self) -> u128 {
        self.records
            .lock()
            .iter()
            .map(|s| u128::from(s.amount))
            .sum()
    }
}

impl Default for InMemorySettlementLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementPort for InMemorySettlementLedger {
    fn settle(&self, settlement: &Settlement) -> Result<(), SettlementError> {
        let amount = i128::from(settlement.amount);
        *self.positions.entry(settlement.payer.clone()).or_insert(0) -= amount;
        *self.positions.entry(settlement.payee.clone()).or_insert(0) += amount;
        self.records.lock().push(settlement.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement(payer: &str, payee: &str, amount: u64) -> Settlement {
        Settlement {
            station_id: 1,
            payer: Principal::from(payer),
            payee: Principal::from(payee),
            amount,
        }
    }

    #[test]
    fn tracks_positions() {
        let ledger = InMemorySettlementLedger::new();
        ledger.settle(&settlement("user1", "owner1", 5)).unwrap();
        ledger.settle(&settlement("user2", "owner1", 3)).unwrap();

        assert_eq!(ledger.position(&Principal::from("owner1")), 8);
        assert_eq!(ledger.position(&Principal::from("user1")), -5);
        assert_eq!(ledger.position(&Principal::from("nobody")), 0);
        assert_eq!(ledger.total_settled(), 8);
        assert_eq!(ledger.records().len(), 2);
    }

    #[test]
    fn self_settlement_nets_to_zero() {
        let ledger = InMemorySettlementLedger::new();
        ledger.settle(&settlement("A", "A", 10)).unwrap();
        assert_eq!(ledger.position(&Principal::from("A")), 0);
    }
}
