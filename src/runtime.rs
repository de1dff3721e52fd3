//! Ledger runtime bootstrap.
//!
//! Provides [`LedgerRuntime`] which wires the ledger service, event bus and
//! settlement port from an [`AppConfig`], plus [`init_tracing`] for process
//! startup.

use std::sync::Arc;

use tracing::info;

use crate::application::dto::{CommandOutcome, LedgerCommand};
use crate::application::services::LedgerService;
use crate::config::AppConfig;
use crate::infrastructure::InMemorySettlementLedger;
use crate::notifications::{create_event_bus, SharedEventBus};

/// A configured ledger with its collaborators.
pub struct LedgerRuntime {
    service: Arc<LedgerService>,
    event_bus: SharedEventBus,
    settlement: Arc<InMemorySettlementLedger>,
}

impl LedgerRuntime {
    pub fn new(config: &AppConfig) -> Self {
        let event_bus = create_event_bus();
        let settlement = Arc::new(InMemorySettlementLedger::new());
        let service = Arc::new(LedgerService::with_settlement(
            config.ledger.network_fee_rate,
            event_bus.clone(),
            settlement.clone(),
        ));

        info!(
            fee_rate = %config.ledger.network_fee_rate,
            "Ledger runtime ready"
        );

        Self {
            service,
            event_bus,
            settlement,
        }
    }

    pub fn service(&self) -> &Arc<LedgerService> {
        &self.service
    }

    pub fn event_bus(&self) -> &SharedEventBus {
        &self.event_bus
    }

    pub fn settlement(&self) -> &Arc<InMemorySettlementLedger> {
        &self.settlement
    }

    /// Execute commands strictly in order
    pub fn run<I>(&self, commands: I) -> Vec<CommandOutcome>
    where
        I: IntoIterator<Item = LedgerCommand>,
    {
        commands
            .into_iter()
            .map(|cmd| self.service.execute(cmd))
            .collect()
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup. `RUST_LOG` overrides the configured
/// level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeeRate, Principal};

    #[test]
    fn runs_scripted_scenario() {
        let mut config = AppConfig::default();
        config.ledger.network_fee_rate = FeeRate::new(100).unwrap();
        let runtime = LedgerRuntime::new(&config);

        let script = r#"
            {"op":"register_station","station_id":1,"price":100,"caller":"A"}
            {"op":"update_station_price","station_id":1,"new_price":150,"caller":"B"}
            {"op":"make_reservation","station_id":1,"start_time":1000,"end_time":2000,"caller":"B"}
            {"op":"complete_charging","station_id":1,"caller":"B"}
            {"op":"get_reservation_info","station_id":1}
        "#;
        let commands: Vec<LedgerCommand> = script
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        let outcomes = runtime.run(commands);
        let ok: Vec<bool> = outcomes.iter().map(|o| o.ok).collect();
        assert_eq!(ok, vec![true, false, true, true, true]);
        assert_eq!(outcomes[1].error.as_ref().unwrap().code, 403);

        assert_eq!(runtime.settlement().position(&Principal::from("A")), 1);
        assert_eq!(runtime.service().station_info(1).unwrap().price, 100);
        assert_eq!(runtime.event_bus().last_sequence(), 3);
    }
}
