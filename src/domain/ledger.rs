//! Station ledger state machine
//!
//! Holds the station and reservation stores and applies the five
//! transitions against them. Every mutating operation validates first and
//! writes only after all preconditions hold, so a failed call leaves the
//! ledger untouched.
//!
//! Per station the conceptual states are `Available ⇄ Reserved`:
//! `make_reservation` moves a station to reserved and `complete_charging`
//! moves it back. `set_station_availability` flips the flag out-of-band
//! without touching the reservation store, and `register_station` on an
//! existing id overwrites the entry; both can leave `available` out of step
//! with the reservation store until the next reservation or completion
//! reconciles it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::settlement::{ChargingReceipt, FeeRate, Settlement};
use crate::domain::{Principal, Reservation, Station, StationId};
use crate::shared::errors::{LedgerError, LedgerResult};

/// Aggregate counts over the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub stations: usize,
    pub available: usize,
    pub unavailable: usize,
    pub reservations: usize,
}

/// Single authoritative store of stations and reservations
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    stations: BTreeMap<StationId, Station>,
    reservations: BTreeMap<StationId, Reservation>,
    fee_rate: FeeRate,
}

impl Ledger {
    pub fn new(fee_rate: FeeRate) -> Self {
        Self {
            stations: BTreeMap::new(),
            reservations: BTreeMap::new(),
            fee_rate,
        }
    }

    pub fn fee_rate(&self) -> FeeRate {
        self.fee_rate
    }

    /// Register a station, or overwrite an existing one.
    ///
    /// No uniqueness check is made: a second registration of the same id
    /// replaces owner and price and reopens the station. The replaced entry
    /// is returned so callers can detect the overwrite. Any reservation on
    /// the id is left in place.
    pub fn register_station(
        &mut self,
        station_id: StationId,
        price: u64,
        caller: Principal,
    ) -> Option<Station> {
        self.stations
            .insert(station_id, Station::new(caller, price))
    }

    pub fn update_station_price(
        &mut self,
        station_id: StationId,
        new_price: u64,
        caller: &Principal,
    ) -> LedgerResult<()> {
        let station = self.owned_station_mut(station_id, caller)?;
        station.price = new_price;
        Ok(())
    }

    /// Force the availability flag. Reservation records are not consulted.
    pub fn set_station_availability(
        &mut self,
        station_id: StationId,
        is_available: bool,
        caller: &Principal,
    ) -> LedgerResult<()> {
        let station = self.owned_station_mut(station_id, caller)?;
        station.available = is_available;
        Ok(())
    }

    pub fn make_reservation(
        &mut self,
        station_id: StationId,
        start_time: i64,
        end_time: i64,
        caller: Principal,
    ) -> LedgerResult<()> {
        let station = self
            .stations
            .get_mut(&station_id)
            .ok_or_else(|| LedgerError::station_not_found(station_id))?;

        if !station.available {
            return Err(LedgerError::NotAvailable(station_id));
        }

        station.available = false;
        // Overwrites a stale record left behind by a forced availability flip.
        self.reservations
            .insert(station_id, Reservation::new(caller, start_time, end_time));
        Ok(())
    }

    /// Close the caller's reservation and compute the network fee.
    ///
    /// The fee is taken from the station's price at call time. No value is
    /// moved here; the receipt carries the settlement instruction.
    pub fn complete_charging(
        &mut self,
        station_id: StationId,
        caller: &Principal,
    ) -> LedgerResult<ChargingReceipt> {
        let station = self
            .stations
            .get(&station_id)
            .ok_or_else(|| LedgerError::station_not_found(station_id))?;
        let reservation = self
            .reservations
            .get(&station_id)
            .ok_or_else(|| LedgerError::reservation_not_found(station_id))?;

        if !reservation.is_held_by(caller) {
            return Err(LedgerError::Unauthorized {
                station_id,
                caller: caller.clone(),
            });
        }

        let price = station.price;
        let fee = self.fee_rate.fee_for(price);
        let settlement = Settlement {
            station_id,
            payer: caller.clone(),
            payee: station.owner.clone(),
            amount: fee,
        };

        let reservation = self
            .reservations
            .remove(&station_id)
            .ok_or_else(|| LedgerError::reservation_not_found(station_id))?;
        if let Some(station) = self.stations.get_mut(&station_id) {
            station.available = true;
        }

        Ok(ChargingReceipt {
            station_id,
            price,
            fee_rate: self.fee_rate,
            fee,
            reservation,
            settlement,
        })
    }

    pub fn station_info(&self, station_id: StationId) -> Option<&Station> {
        self.stations.get(&station_id)
    }

    pub fn reservation_info(&self, station_id: StationId) -> Option<&Reservation> {
        self.reservations.get(&station_id)
    }

    /// All stations ordered by id
    pub fn stations(&self) -> impl Iterator<Item = (StationId, &Station)> {
        self.stations.iter().map(|(id, s)| (*id, s))
    }

    /// All reservations ordered by station id
    pub fn reservations(&self) -> impl Iterator<Item = (StationId, &Reservation)> {
        self.reservations.iter().map(|(id, r)| (*id, r))
    }

    pub fn stats(&self) -> LedgerStats {
        let available = self.stations.values().filter(|s| s.available).count();
        LedgerStats {
            stations: self.stations.len(),
            available,
            unavailable: self.stations.len() - available,
            reservations: self.reservations.len(),
        }
    }

    fn owned_station_mut(
        &mut self,
        station_id: StationId,
        caller: &Principal,
    ) -> LedgerResult<&mut Station> {
        let station = self
            .stations
            .get_mut(&station_id)
            .ok_or_else(|| LedgerError::station_not_found(station_id))?;
        if !station.is_owned_by(caller) {
            return Err(LedgerError::Unauthorized {
                station_id,
                caller: caller.clone(),
            });
        }
        Ok(station)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::ErrorKind;

    fn p(id: &str) -> Principal {
        Principal::from(id)
    }

    fn ledger() -> Ledger {
        Ledger::new(FeeRate::new(100).unwrap())
    }

    fn ledger_with_station() -> Ledger {
        let mut l = ledger();
        l.register_station(1, 100, p("owner1"));
        l
    }

    #[test]
    fn unregistered_station_is_absent() {
        let l = ledger();
        assert!(l.station_info(1).is_none());
        assert!(l.reservation_info(1).is_none());
        assert!(l.station_info(u64::MAX).is_none());
    }

    #[test]
    fn register_station() {
        let mut l = ledger();
        assert!(l.register_station(1, 100, p("owner1")).is_none());
        assert_eq!(
            l.station_info(1),
            Some(&Station {
                owner: p("owner1"),
                price: 100,
                available: true,
            })
        );
    }

    #[test]
    fn re_register_overwrites_and_returns_previous() {
        let mut l = ledger_with_station();
        l.set_station_availability(1, false, &p("owner1")).unwrap();

        let previous = l.register_station(1, 300, p("intruder")).unwrap();
        assert_eq!(previous.owner, p("owner1"));
        assert!(!previous.available);

        let station = l.station_info(1).unwrap();
        assert_eq!(station.owner, p("intruder"));
        assert_eq!(station.price, 300);
        assert!(station.available);
    }

    #[test]
    fn re_register_keeps_reservation() {
        let mut l = ledger_with_station();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();
        l.register_station(1, 100, p("owner2"));
        assert!(l.reservation_info(1).is_some());
        assert!(l.station_info(1).unwrap().available);
    }

    #[test]
    fn owner_updates_price() {
        let mut l = ledger_with_station();
        l.update_station_price(1, 150, &p("owner1")).unwrap();
        let station = l.station_info(1).unwrap();
        assert_eq!(station.price, 150);
        assert_eq!(station.owner, p("owner1"));
        assert!(station.available);
    }

    #[test]
    fn non_owner_cannot_update_price() {
        let mut l = ledger_with_station();
        let err = l.update_station_price(1, 150, &p("owner2")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(l.station_info(1).unwrap().price, 100);
    }

    #[test]
    fn update_price_on_missing_station() {
        let mut l = ledger();
        let err = l.update_station_price(9, 150, &p("owner1")).unwrap_err();
        assert_eq!(err, LedgerError::station_not_found(9));
    }

    #[test]
    fn owner_sets_availability() {
        let mut l = ledger_with_station();
        l.set_station_availability(1, false, &p("owner1")).unwrap();
        assert!(!l.station_info(1).unwrap().available);
        l.set_station_availability(1, true, &p("owner1")).unwrap();
        assert!(l.station_info(1).unwrap().available);
    }

    #[test]
    fn availability_guarded() {
        let mut l = ledger_with_station();
        assert_eq!(
            l.set_station_availability(1, false, &p("user1"))
                .unwrap_err()
                .kind(),
            ErrorKind::Unauthorized
        );
        assert!(l.station_info(1).unwrap().available);
        assert_eq!(
            l.set_station_availability(2, false, &p("owner1"))
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn make_reservation() {
        let mut l = ledger_with_station();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();
        assert_eq!(
            l.reservation_info(1),
            Some(&Reservation::new(p("user1"), 1000, 2000))
        );
        assert!(!l.station_info(1).unwrap().available);
    }

    #[test]
    fn second_reservation_is_rejected() {
        let mut l = ledger_with_station();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();
        let err = l.make_reservation(1, 2000, 3000, p("user2")).unwrap_err();
        assert_eq!(err, LedgerError::NotAvailable(1));
        assert_eq!(l.reservation_info(1).unwrap().user, p("user1"));
        assert_eq!(l.reservation_info(1).unwrap().start_time, 1000);
    }

    #[test]
    fn reservation_on_missing_station() {
        let mut l = ledger();
        let err = l.make_reservation(1, 1000, 2000, p("user1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(l.reservation_info(1).is_none());
    }

    #[test]
    fn reservation_on_forced_unavailable_station() {
        let mut l = ledger_with_station();
        l.set_station_availability(1, false, &p("owner1")).unwrap();
        assert_eq!(
            l.make_reservation(1, 1000, 2000, p("user1")).unwrap_err(),
            LedgerError::NotAvailable(1)
        );
        assert!(l.reservation_info(1).is_none());
    }

    #[test]
    fn complete_charging_settles_fee() {
        let mut l = ledger_with_station();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();

        let receipt = l.complete_charging(1, &p("user1")).unwrap();
        assert_eq!(receipt.fee, 1);
        assert_eq!(receipt.price, 100);
        assert_eq!(receipt.reservation, Reservation::new(p("user1"), 1000, 2000));
        assert_eq!(
            receipt.settlement,
            Settlement {
                station_id: 1,
                payer: p("user1"),
                payee: p("owner1"),
                amount: 1,
            }
        );
        assert!(l.reservation_info(1).is_none());
        assert!(l.station_info(1).unwrap().available);
    }

    #[test]
    fn fee_uses_price_at_completion() {
        let mut l = ledger_with_station();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();
        l.update_station_price(1, 25_000, &p("owner1")).unwrap();
        let receipt = l.complete_charging(1, &p("user1")).unwrap();
        assert_eq!(receipt.fee, 250);
    }

    #[test]
    fn non_user_cannot_complete() {
        let mut l = ledger_with_station();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();
        let err = l.complete_charging(1, &p("user2")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(l.reservation_info(1).is_some());
        assert!(!l.station_info(1).unwrap().available);

        // The owner is not the reserving user either.
        assert!(l.complete_charging(1, &p("owner1")).is_err());
    }

    #[test]
    fn complete_without_reservation() {
        let mut l = ledger_with_station();
        assert_eq!(
            l.complete_charging(1, &p("user1")).unwrap_err(),
            LedgerError::reservation_not_found(1)
        );
        assert_eq!(
            l.complete_charging(2, &p("user1")).unwrap_err(),
            LedgerError::station_not_found(2)
        );
    }

    #[test]
    fn full_cycle_restores_station() {
        let mut l = ledger_with_station();
        let before = l.station_info(1).cloned();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();
        l.complete_charging(1, &p("user1")).unwrap();
        assert_eq!(l.station_info(1).cloned(), before);
        assert!(l.reservation_info(1).is_none());
    }

    #[test]
    fn forced_available_then_rereserve_replaces_stale_record() {
        let mut l = ledger_with_station();
        l.make_reservation(1, 1000, 2000, p("user1")).unwrap();
        l.set_station_availability(1, true, &p("owner1")).unwrap();
        // The stale record still exists while the flag says available.
        assert!(l.reservation_info(1).is_some());

        l.make_reservation(1, 3000, 4000, p("user2")).unwrap();
        assert_eq!(l.reservation_info(1).unwrap().user, p("user2"));
        assert!(l.complete_charging(1, &p("user1")).is_err());
        assert!(l.complete_charging(1, &p("user2")).is_ok());
    }

    #[test]
    fn stats_and_listing() {
        let mut l = ledger();
        l.register_station(3, 10, p("a"));
        l.register_station(1, 10, p("a"));
        l.register_station(2, 10, p("b"));
        l.make_reservation(2, 0, 1, p("u")).unwrap();

        let ids: Vec<_> = l.stations().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(l.reservations().count(), 1);
        assert_eq!(
            l.stats(),
            LedgerStats {
                stations: 3,
                available: 2,
                unavailable: 1,
                reservations: 1,
            }
        );
    }
}
