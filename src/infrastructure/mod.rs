//! Infrastructure layer - external concerns

pub mod settlement;

pub use settlement::InMemorySettlementLedger;
