//! SPREADWATCH — Main entry point.
//!
//! Loads configuration, initialises structured logging, wires the
//! detection pipeline together, starts the API/stream server, and runs the
//! scheduler loop with graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use spreadwatch::api::{self, ApiState};
use spreadwatch::config::AppConfig;
use spreadwatch::distributor::Distributor;
use spreadwatch::engine::analyzer::{AnalyzerConfig, GasEstimate, SpreadAnalyzer};
use spreadwatch::engine::history::HistoryTracker;
use spreadwatch::engine::ranker::OpportunityRanker;
use spreadwatch::engine::scheduler::Scheduler;
use spreadwatch::engine::simulator::TradeSimulator;
use spreadwatch::providers::simulated::SimulatedProvider;
use spreadwatch::providers::QuoteProvider;

const BANNER: &str = r#"
  ____  ____  ____  _____    _    ____
 / ___||  _ \|  _ \| ____|  / \  |  _ \
 \___ \| |_) | |_) ||  _|   / _ \ | | | |
  ___) ||  __/|  _ < | |___ / ___ \| |_| |
 |____/ |_|   |_| \_\|_____/_/   \_\____/

  SPREADWATCH — Cross-venue spread scanner
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_or_default("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        interval_secs = cfg.scanner.interval_secs,
        pairs = cfg.market.pairs.len(),
        venues = cfg.market.venues.len(),
        top_n = cfg.scanner.ranked_set_size,
        "SPREADWATCH starting up"
    );

    // -- Wire the pipeline ------------------------------------------------

    let provider: Arc<dyn QuoteProvider> =
        Arc::new(SimulatedProvider::new(&cfg.market.pairs));
    let ranker = Arc::new(OpportunityRanker::new(cfg.scanner.ranked_set_size));
    let history = Arc::new(HistoryTracker::new(cfg.scanner.history_capacity));
    let distributor = Arc::new(Distributor::new());
    let simulator = Arc::new(TradeSimulator::new(
        ranker.clone(),
        cfg.scanner.reference_amount,
    ));

    let analyzer = SpreadAnalyzer::new(AnalyzerConfig {
        min_spread_pct: cfg.scanner.min_spread_pct,
        min_net_profit_pct: cfg.scanner.min_net_profit_pct,
        gas: GasEstimate::VenueHash,
    });

    let scheduler = Scheduler::new(
        provider.clone(),
        analyzer,
        ranker.clone(),
        history.clone(),
        distributor.clone(),
        cfg.pair_symbols(),
        cfg.market.venues.clone(),
        Duration::from_secs(cfg.scanner.interval_secs),
    );

    // -- API / stream server ----------------------------------------------

    if cfg.server.enabled {
        let state = Arc::new(ApiState {
            ranker,
            history,
            distributor,
            simulator,
            provider,
            pairs: cfg.pair_symbols(),
            venues: cfg.market.venues.clone(),
        });
        api::spawn_server(state, cfg.server.port);
    }

    // -- Main loop --------------------------------------------------------

    info!("Entering detection loop. Press Ctrl+C to stop.");

    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    info!("SPREADWATCH shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spreadwatch=info"));

    let json_logging = std::env::var("SPREADWATCH_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }
}
