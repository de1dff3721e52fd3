pub mod dto;
pub mod ports;
pub mod script;
pub mod services;

// Re-export key types for convenience
pub use dto::{CommandOutcome, CommandOutput, LedgerCommand};
pub use script::parse_script;
pub use ports::{NoopSettlement, SettlementPort, SharedSettlementPort};
pub use services::LedgerService;
