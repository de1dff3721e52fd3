//! Settlement port implementations

mod memory;

pub use memory::InMemorySettlementLedger;
