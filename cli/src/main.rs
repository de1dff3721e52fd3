//! Station Ledger — CLI
//!
//! Replays JSON-lines command scripts against a fresh ledger and prints one
//! JSON outcome per command.
//!
//! ```sh
//! # Run a script with the default config (~/.config/station-ledger/config.toml)
//! station-ledger run scenario.jsonl
//!
//! # Read commands from stdin, override the fee rate
//! cat scenario.jsonl | station-ledger --fee-rate 250 run -
//!
//! # Validate config without running anything
//! station-ledger check
//! ```

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use station_ledger::application::parse_script;
use station_ledger::config::AppConfig;
use station_ledger::domain::FeeRate;
use station_ledger::runtime::{init_tracing, LedgerRuntime};

/// Station Ledger — charging station registry and reservation ledger.
#[derive(Parser, Debug)]
#[command(
    name = "station-ledger",
    version,
    about = "Charging station registry and reservation ledger",
    long_about = "Replays ledger command scripts (one JSON command per line) \
                  against a fresh in-memory ledger.\n\n\
                  Default config: ~/.config/station-ledger/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "STATION_LEDGER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the network fee rate (parts-per-ten-thousand).
    #[arg(long, global = true)]
    fee_rate: Option<u32>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a command script; `-` reads stdin.
    Run {
        script: PathBuf,

        /// Print the final stations, reservations and settlement positions.
        #[arg(long)]
        summary: bool,
    },
    /// Validate the configuration and exit.
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(station_ledger::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(&AppConfig::default());
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(rate) = cli.fee_rate {
        config.ledger.network_fee_rate = FeeRate::new(rate)?;
    }
    config.validate()?;

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    match cli.command {
        Command::Check => {
            println!("✅ Configuration is valid");
            println!("   Config file : {}", config_path.display());
            println!("   Fee rate    : {}", config.ledger.network_fee_rate);
            println!("   Log level   : {}", config.logging.level);
            println!("   Log format  : {}", config.logging.format);
            Ok(())
        }
        Command::Run { script, summary } => run(&config, &script, summary),
    }
}

fn run(config: &AppConfig, script: &Path, summary: bool) -> Result<(), Box<dyn std::error::Error>> {
    let commands = if script == Path::new("-") {
        parse_script(io::stdin().lock())?
    } else {
        parse_script(BufReader::new(File::open(script)?))?
    };
    info!(commands = commands.len(), "Script parsed");

    let runtime = LedgerRuntime::new(config);
    let outcomes = runtime.run(commands);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;
    for outcome in &outcomes {
        if !outcome.ok {
            failures += 1;
        }
        writeln!(out, "{}", serde_json::to_string(outcome)?)?;
    }

    if summary {
        let service = runtime.service();
        let report = serde_json::json!({
            "stats": service.stats(),
            "stations": service.list_stations(),
            "reservations": service.list_reservations(),
            "settlements": runtime.settlement().records(),
            "total_settled": runtime.settlement().total_settled().to_string(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    }

    if failures > 0 {
        warn!(failures, total = outcomes.len(), "Script finished with rejected commands");
    } else {
        info!(total = outcomes.len(), "Script finished");
    }
    Ok(())
}
