//! Ledger service: the shared, thread-safe entry point to the station ledger

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::application::dto::{CommandOutcome, CommandOutput, LedgerCommand};
use crate::application::ports::{NoopSettlement, SharedSettlementPort};
use crate::domain::{
    ChargingReceipt, FeeRate, Ledger, LedgerError, LedgerResult, LedgerStats, Principal,
    Reservation, Station, StationId,
};
use crate::notifications::{
    ChargingCompletedEvent, Event, ReservationCreatedEvent, SharedEventBus,
    StationAvailabilityChangedEvent, StationPriceUpdatedEvent, StationRegisteredEvent,
};

/// Service wrapping one [`Ledger`] behind a single exclusive lock.
///
/// Each operation reads, validates and writes under the lock, so operations
/// are linearizable. Events are published under the lock to keep their
/// sequence in mutation order; settlement runs after the lock is released.
pub struct LedgerService {
    ledger: Mutex<Ledger>,
    event_bus: SharedEventBus,
    settlement: SharedSettlementPort,
}

impl LedgerService {
    pub fn new(fee_rate: FeeRate, event_bus: SharedEventBus) -> Self {
        Self::with_settlement(fee_rate, event_bus, Arc::new(NoopSettlement))
    }

    pub fn with_settlement(
        fee_rate: FeeRate,
        event_bus: SharedEventBus,
        settlement: SharedSettlementPort,
    ) -> Self {
        info!(fee_rate = %fee_rate, "Station ledger initialized");
        Self {
            ledger: Mutex::new(Ledger::new(fee_rate)),
            event_bus,
            settlement,
        }
    }

    pub fn fee_rate(&self) -> FeeRate {
        self.ledger.lock().fee_rate()
    }

    pub fn event_bus(&self) -> &SharedEventBus {
        &self.event_bus
    }

    /// Register or overwrite a station. Returns the replaced entry, if any.
    pub fn register_station(
        &self,
        station_id: StationId,
        price: u64,
        caller: &Principal,
    ) -> Option<Station> {
        let mut ledger = self.ledger.lock();
        let replaced = ledger.register_station(station_id, price, caller.clone());

        if let Some(previous) = &replaced {
            warn!(
                station_id,
                previous_owner = %previous.owner,
                new_owner = %caller,
                "Station re-registered, previous entry overwritten"
            );
        } else {
            info!(station_id, owner = %caller, price, "Station registered");
        }

        self.event_bus
            .publish(Event::StationRegistered(StationRegisteredEvent {
                station_id,
                owner: caller.clone(),
                price,
                replaced_owner: replaced.as_ref().map(|s| s.owner.clone()),
                timestamp: Utc::now(),
            }));
        record("register_station", true);
        replaced
    }

    pub fn update_station_price(
        &self,
        station_id: StationId,
        new_price: u64,
        caller: &Principal,
    ) -> LedgerResult<()> {
        let mut ledger = self.ledger.lock();
        let old_price = ledger.station_info(station_id).map(|s| s.price);

        match ledger.update_station_price(station_id, new_price, caller) {
            Ok(()) => {
                let old_price = old_price.unwrap_or_default();
                info!(station_id, old_price, new_price, "Station price updated");
                self.event_bus
                    .publish(Event::StationPriceUpdated(StationPriceUpdatedEvent {
                        station_id,
                        old_price,
                        new_price,
                        timestamp: Utc::now(),
                    }));
                record("update_station_price", true);
                Ok(())
            }
            Err(e) => Err(rejected("update_station_price", caller, e)),
        }
    }

    /// Force the availability flag; reservations are not reconciled.
    pub fn set_station_availability(
        &self,
        station_id: StationId,
        is_available: bool,
        caller: &Principal,
    ) -> LedgerResult<()> {
        let mut ledger = self.ledger.lock();

        match ledger.set_station_availability(station_id, is_available, caller) {
            Ok(()) => {
                let reservation_present = ledger.reservation_info(station_id).is_some();
                if reservation_present == is_available {
                    warn!(
                        station_id,
                        available = is_available,
                        reservation_present,
                        "Availability forced out of step with reservation"
                    );
                } else {
                    info!(station_id, available = is_available, "Station availability set");
                }
                self.event_bus.publish(Event::StationAvailabilityChanged(
                    StationAvailabilityChangedEvent {
                        station_id,
                        available: is_available,
                        reservation_present,
                        timestamp: Utc::now(),
                    },
                ));
                record("set_station_availability", true);
                Ok(())
            }
            Err(e) => Err(rejected("set_station_availability", caller, e)),
        }
    }

    pub fn make_reservation(
        &self,
        station_id: StationId,
        start_time: i64,
        end_time: i64,
        caller: &Principal,
    ) -> LedgerResult<()> {
        let mut ledger = self.ledger.lock();

        match ledger.make_reservation(station_id, start_time, end_time, caller.clone()) {
            Ok(()) => {
                info!(
                    station_id,
                    user = %caller,
                    start_time,
                    end_time,
                    "Reservation created"
                );
                self.event_bus
                    .publish(Event::ReservationCreated(ReservationCreatedEvent {
                        station_id,
                        user: caller.clone(),
                        start_time,
                        end_time,
                        timestamp: Utc::now(),
                    }));
                record("make_reservation", true);
                Ok(())
            }
            Err(e) => Err(rejected("make_reservation", caller, e)),
        }
    }

    /// Close the caller's reservation, then hand the fee to settlement.
    ///
    /// A settlement failure is logged only; the ledger transition stands.
    pub fn complete_charging(
        &self,
        station_id: StationId,
        caller: &Principal,
    ) -> LedgerResult<ChargingReceipt> {
        let receipt = {
            let mut ledger = self.ledger.lock();
            match ledger.complete_charging(station_id, caller) {
                Ok(receipt) => {
                    self.event_bus
                        .publish(Event::ChargingCompleted(ChargingCompletedEvent {
                            station_id,
                            payer: receipt.settlement.payer.clone(),
                            payee: receipt.settlement.payee.clone(),
                            price: receipt.price,
                            fee: receipt.fee,
                            timestamp: Utc::now(),
                        }));
                    receipt
                }
                Err(e) => return Err(rejected("complete_charging", caller, e)),
            }
        };

        info!(
            station_id,
            payer = %receipt.settlement.payer,
            payee = %receipt.settlement.payee,
            price = receipt.price,
            fee = receipt.fee,
            "Charging completed"
        );
        record("complete_charging", true);
        counter!("ledger_fees_total").increment(receipt.fee);

        if let Err(e) = self.settlement.settle(&receipt.settlement) {
            warn!(station_id, error = %e, "Settlement failed, not retried");
        }

        Ok(receipt)
    }

    pub fn station_info(&self, station_id: StationId) -> Option<Station> {
        let station = self.ledger.lock().station_info(station_id).cloned();
        debug!(station_id, found = station.is_some(), "Station lookup");
        station
    }

    pub fn reservation_info(&self, station_id: StationId) -> Option<Reservation> {
        let reservation = self.ledger.lock().reservation_info(station_id).cloned();
        debug!(station_id, found = reservation.is_some(), "Reservation lookup");
        reservation
    }

    pub fn list_stations(&self) -> Vec<(StationId, Station)> {
        self.ledger
            .lock()
            .stations()
            .map(|(id, s)| (id, s.clone()))
            .collect()
    }

    pub fn list_reservations(&self) -> Vec<(StationId, Reservation)> {
        self.ledger
            .lock()
            .reservations()
            .map(|(id, r)| (id, r.clone()))
            .collect()
    }

    pub fn stats(&self) -> LedgerStats {
        self.ledger.lock().stats()
    }

    /// Apply one command and describe the result
    pub fn execute(&self, command: LedgerCommand) -> CommandOutcome {
        let op = command.name();
        let result = match command {
            LedgerCommand::RegisterStation {
                station_id,
                price,
                caller,
            } => Ok(CommandOutput::Registered {
                replaced: self.register_station(station_id, price, &caller),
            }),
            LedgerCommand::UpdateStationPrice {
                station_id,
                new_price,
                caller,
            } => self
                .update_station_price(station_id, new_price, &caller)
                .map(|()| CommandOutput::Done),
            LedgerCommand::SetStationAvailability {
                station_id,
                is_available,
                caller,
            } => self
                .set_station_availability(station_id, is_available, &caller)
                .map(|()| CommandOutput::Done),
            LedgerCommand::MakeReservation {
                station_id,
                start_time,
                end_time,
                caller,
            } => self
                .make_reservation(station_id, start_time, end_time, &caller)
                .map(|()| CommandOutput::Done),
            LedgerCommand::CompleteCharging { station_id, caller } => self
                .complete_charging(station_id, &caller)
                .map(CommandOutput::Receipt),
            LedgerCommand::GetStationInfo { station_id } => {
                Ok(CommandOutput::Station(self.station_info(station_id)))
            }
            LedgerCommand::GetReservationInfo { station_id } => {
                Ok(CommandOutput::Reservation(self.reservation_info(station_id)))
            }
            LedgerCommand::Stats => Ok(CommandOutput::Stats(self.stats())),
        };

        match result {
            Ok(output) => CommandOutcome::success(op, output),
            Err(e) => CommandOutcome::failure(op, &e),
        }
    }
}

fn record(operation: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "rejected" };
    counter!("ledger_operations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

fn rejected(operation: &'static str, caller: &Principal, err: LedgerError) -> LedgerError {
    warn!(operation, caller = %caller, kind = %err.kind(), error = %err, "Operation rejected");
    record(operation, false);
    err
}
