//! Application services

mod ledger;

pub use ledger::LedgerService;
