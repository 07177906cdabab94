//! Spread detection and confidence scoring.
//!
//! Compares every ordered venue pair for one trading pair, filters by raw
//! spread and by net profit after slippage and execution cost, and scores
//! each surviving opportunity.
//!
//! The analyzer is a pure function of its inputs: all randomness lives in
//! the quote provider, and the gas estimate is a stable hash of the venue
//! route. Identical quotes always yield identical opportunities.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::{Opportunity, Quote};

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Coarse pre-filter: raw spreads at or below this are ignored before any
/// cost accounting.
pub const DEFAULT_MIN_SPREAD_PCT: f64 = 0.1;

/// Opportunities at or below this net profit are discarded, never stored.
pub const DEFAULT_MIN_NET_PROFIT_PCT: f64 = 0.05;

/// Confidence weights. The three terms sum to at most 100.
pub const LIQUIDITY_WEIGHT: f64 = 40.0;
pub const SPREAD_WEIGHT: f64 = 30.0;
pub const STABILITY_WEIGHT: f64 = 30.0;

/// Mean venue liquidity at which the liquidity term saturates.
pub const REFERENCE_LIQUIDITY: f64 = 500_000.0;

/// Spread percentage at which the spread-magnitude term saturates.
pub const REFERENCE_SPREAD_PCT: f64 = 2.0;

/// Gas estimate bounds: 0.01% plus up to 0.02% depending on the route.
const GAS_BASE_PCT: f64 = 0.01;
const GAS_ROUTE_STEPS: u64 = 20;
const GAS_STEP_PCT: f64 = 0.001;

/// How the per-route execution cost is estimated.
#[derive(Debug, Clone, Copy)]
pub enum GasEstimate {
    /// Stable hash of the buy→sell venue route mapped into [0.01%, 0.03%).
    VenueHash,
    /// Fixed percentage (used by tests and cost-model experiments).
    Fixed(f64),
}

impl GasEstimate {
    /// Execution cost estimate for a buy→sell route, in percent.
    pub fn pct(&self, buy_venue: &str, sell_venue: &str) -> f64 {
        match self {
            GasEstimate::Fixed(pct) => *pct,
            GasEstimate::VenueHash => {
                let h = fnv1a(&format!("{buy_venue}|{sell_venue}"));
                GAS_BASE_PCT + (h % GAS_ROUTE_STEPS) as f64 * GAS_STEP_PCT
            }
        }
    }
}

/// FNV-1a, 64-bit. Stable across runs and platforms.
fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Analyzer thresholds and cost model.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub min_spread_pct: f64,
    pub min_net_profit_pct: f64,
    pub gas: GasEstimate,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_spread_pct: DEFAULT_MIN_SPREAD_PCT,
            min_net_profit_pct: DEFAULT_MIN_NET_PROFIT_PCT,
            gas: GasEstimate::VenueHash,
        }
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

pub struct SpreadAnalyzer {
    config: AnalyzerConfig,
}

impl SpreadAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Detect profitable opportunities among one pair's venue quotes.
    ///
    /// `stability` is a market-stability signal in [0, 1] (see
    /// [`crate::engine::history::HistoryTracker::stability`]); `detected_at`
    /// is the cycle timestamp, passed in so detection stays deterministic.
    pub fn detect(
        &self,
        pair: &str,
        quotes: &[Quote],
        stability: f64,
        detected_at: DateTime<Utc>,
    ) -> Vec<Opportunity> {
        let mut opportunities = Vec::new();

        for buy in quotes {
            for sell in quotes {
                if buy.venue == sell.venue {
                    continue;
                }

                let spread_pct = (sell.price - buy.price) / buy.price * 100.0;
                if spread_pct <= self.config.min_spread_pct {
                    continue;
                }

                let gross_profit_pct =
                    spread_pct - (buy.slippage_pct() + sell.slippage_pct());
                let estimated_gas_pct = self.config.gas.pct(&buy.venue, &sell.venue);
                let net_profit_pct = gross_profit_pct - estimated_gas_pct;

                if net_profit_pct <= self.config.min_net_profit_pct {
                    debug!(
                        pair,
                        buy = %buy.venue,
                        sell = %sell.venue,
                        net = net_profit_pct,
                        "Spread not profitable after costs"
                    );
                    continue;
                }

                let confidence = confidence_score(buy, sell, spread_pct, stability);

                opportunities.push(Opportunity {
                    id: Opportunity::compose_id(pair, &buy.venue, &sell.venue, detected_at),
                    pair: pair.to_string(),
                    buy_venue: buy.venue.clone(),
                    sell_venue: sell.venue.clone(),
                    buy_price: buy.price,
                    sell_price: sell.price,
                    spread_pct,
                    gross_profit_pct,
                    estimated_gas_pct,
                    net_profit_pct,
                    confidence,
                    detected_at,
                    route: vec![
                        format!("Buy on {}", buy.venue),
                        format!("Sell on {}", sell.venue),
                    ],
                });
            }
        }

        opportunities
    }
}

/// Weighted composite confidence in [0, 100].
///
/// - Liquidity term (≤ 40): mean of the two venues' liquidity, saturating
///   at [`REFERENCE_LIQUIDITY`].
/// - Spread term (≤ 30): spread magnitude, saturating at
///   [`REFERENCE_SPREAD_PCT`].
/// - Stability term (≤ 30): the supplied market-stability signal.
pub fn confidence_score(buy: &Quote, sell: &Quote, spread_pct: f64, stability: f64) -> f64 {
    let mean_liquidity = (buy.liquidity + sell.liquidity) / 2.0;
    let liquidity_term = (mean_liquidity / REFERENCE_LIQUIDITY).min(1.0) * LIQUIDITY_WEIGHT;
    let spread_term = (spread_pct / REFERENCE_SPREAD_PCT).min(1.0) * SPREAD_WEIGHT;
    let stability_term = stability.clamp(0.0, 1.0) * STABILITY_WEIGHT;

    (liquidity_term + spread_term + stability_term).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
