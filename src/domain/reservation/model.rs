//! Reservation domain entity

use serde::{Deserialize, Serialize};

use crate::domain::Principal;

/// Claim on a station by a user for a time window.
///
/// Keyed by station id in the ledger; at most one exists per station.
/// The window is recorded as given: neither ordering nor overlap with
/// other windows is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reserving principal
    pub user: Principal,
    pub start_time: i64,
    pub end_time: i64,
}

impl Reservation {
    pub fn new(user: Principal, start_time: i64, end_time: i64) -> Self {
        Self {
            user,
            start_time,
            end_time,
        }
    }

    pub fn is_held_by(&self, caller: &Principal) -> bool {
        &self.user == caller
    }

    /// Length of the requested window; negative when the window is inverted
    pub fn duration(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_check() {
        let r = Reservation::new(Principal::from("user1"), 1000, 2000);
        assert!(r.is_held_by(&Principal::from("user1")));
        assert!(!r.is_held_by(&Principal::from("user2")));
        assert_eq!(r.duration(), 1000);
    }

    #[test]
    fn inverted_window_is_kept() {
        let r = Reservation::new(Principal::from("user1"), 2000, 1000);
        assert_eq!(r.start_time, 2000);
        assert_eq!(r.duration(), -1000);
    }
}
