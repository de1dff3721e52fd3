pub mod command;

pub use command::{CommandFailure, CommandOutcome, CommandOutput, LedgerCommand};
