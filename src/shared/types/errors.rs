use thiserror::Error;

use crate::domain::{Principal, StationId};

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    NotAvailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::Unauthorized => "Unauthorized",
            Self::NotAvailable => "NotAvailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Not found: {entity} for station {station_id}")]
    NotFound {
        entity: &'static str,
        station_id: StationId,
    },

    #[error("Unauthorized: {caller} may not act on station {station_id}")]
    Unauthorized {
        station_id: StationId,
        caller: Principal,
    },

    #[error("Station {0} is not available")]
    NotAvailable(StationId),
}

impl LedgerError {
    pub fn station_not_found(station_id: StationId) -> Self {
        Self::NotFound {
            entity: "Station",
            station_id,
        }
    }

    pub fn reservation_not_found(station_id: StationId) -> Self {
        Self::NotFound {
            entity: "Reservation",
            station_id,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::NotAvailable(_) => ErrorKind::NotAvailable,
        }
    }

    /// Numeric status code, mirroring HTTP semantics.
    pub fn code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Unauthorized => 403,
            ErrorKind::NotAvailable => 400,
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Settlement rejected: {0}")]
    Rejected(String),

    #[error("Settlement backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Line {line}: invalid command: {source}")]
    InvalidCommand {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
}
