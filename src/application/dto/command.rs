//! Command DTOs
//!
//! Serializable form of every ledger operation, used by the scripted runner.
//! One command per JSON line:
//!
//! ```text
//! {"op":"register_station","station_id":1,"price":100,"caller":"A"}
//! {"op":"make_reservation","station_id":1,"start_time":1000,"end_time":2000,"caller":"B"}
//! {"op":"complete_charging","station_id":1,"caller":"B"}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{
    ChargingReceipt, LedgerError, LedgerStats, Principal, Reservation, Station, StationId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerCommand {
    RegisterStation {
        station_id: StationId,
        price: u64,
        caller: Principal,
    },
    UpdateStationPrice {
        station_id: StationId,
        new_price: u64,
        caller: Principal,
    },
    SetStationAvailability {
        station_id: StationId,
        is_available: bool,
        caller: Principal,
    },
    MakeReservation {
        station_id: StationId,
        start_time: i64,
        end_time: i64,
        caller: Principal,
    },
    CompleteCharging {
        station_id: StationId,
        caller: Principal,
    },
    GetStationInfo {
        station_id: StationId,
    },
    GetReservationInfo {
        station_id: StationId,
    },
    Stats,
}

impl LedgerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterStation { .. } => "register_station",
            Self::UpdateStationPrice { .. } => "update_station_price",
            Self::SetStationAvailability { .. } => "set_station_availability",
            Self::MakeReservation { .. } => "make_reservation",
            Self::CompleteCharging { .. } => "complete_charging",
            Self::GetStationInfo { .. } => "get_station_info",
            Self::GetReservationInfo { .. } => "get_reservation_info",
            Self::Stats => "stats",
        }
    }

    /// Whether the command can change ledger state
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::GetStationInfo { .. } | Self::GetReservationInfo { .. } | Self::Stats
        )
    }
}

/// Successful result payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandOutput {
    /// Mutation applied
    Done,
    /// Registration applied; carries the overwritten entry, if any
    Registered { replaced: Option<Station> },
    Receipt(ChargingReceipt),
    Station(Option<Station>),
    Reservation(Option<Reservation>),
    Stats(LedgerStats),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFailure {
    pub kind: String,
    pub code: u16,
    pub message: String,
}

impl From<&LedgerError> for CommandFailure {
    fn from(err: &LedgerError) -> Self {
        Self {
            kind: err.kind().to_string(),
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Outcome of executing one [`LedgerCommand`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CommandOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandFailure>,
}

impl CommandOutcome {
    pub fn success(op: &'static str, output: CommandOutput) -> Self {
        Self {
            op,
            ok: true,
            output: Some(output),
            error: None,
        }
    }

    pub fn failure(op: &'static str, err: &LedgerError) -> Self {
        Self {
            op,
            ok: false,
            output: None,
            error: Some(CommandFailure::from(err)),
        }
    }
}
