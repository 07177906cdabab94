//! Shared types for the SPREADWATCH scanner.
//!
//! These types form the data model used across all modules.
//! Wire representations are camelCase to match the public API the
//! dashboard clients already speak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// A single venue's quote for one trading pair.
///
/// Produced fresh each detection cycle by a [`crate::providers::QuoteProvider`]
/// and never retained beyond the cycle that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Venue identifier, e.g. "Raydium".
    pub venue: String,
    /// Pair identifier, e.g. "SOL/USDC".
    pub pair: String,
    /// Quoted price (> 0).
    pub price: f64,
    /// Available liquidity in quote-currency units (>= 0).
    pub liquidity: f64,
    /// Expected slippage as a fraction of price (0..1).
    pub slippage_rate: f64,
    /// Venue fee as a fraction of notional (0..1).
    pub fee_rate: f64,
    /// Route annotation, e.g. ["SOL", "Raydium", "USDC"].
    pub route: Vec<String>,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} @ {:.6} (liq: {:.0} | slip: {:.2}% | fee: {:.2}%)",
            self.venue,
            self.pair,
            self.price,
            self.liquidity,
            self.slippage_rate * 100.0,
            self.fee_rate * 100.0,
        )
    }
}

impl Quote {
    /// Slippage expressed as a percentage of price.
    pub fn slippage_pct(&self) -> f64 {
        self.slippage_rate * 100.0
    }

    /// Helper to build a test quote with sensible defaults.
    #[cfg(test)]
    pub fn sample(venue: &str, price: f64) -> Self {
        Quote {
            venue: venue.to_string(),
            pair: "SOL/USDC".to_string(),
            price,
            liquidity: 500_000.0,
            slippage_rate: 0.003,
            fee_rate: 0.0025,
            route: vec!["SOL".to_string(), venue.to_string(), "USDC".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

/// A profitable cross-venue spread detected in one cycle.
///
/// Invariants: `buy_venue != sell_venue` and `net_profit_pct > 0` —
/// unprofitable comparisons are discarded by the analyzer, never stored.
/// Instances are superseded (not mutated) by the next cycle's ranked set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    /// Unique per detection: `{pair}-{buy}-{sell}-{unix_millis}` with the
    /// pair's slash replaced by a dash.
    pub id: String,
    pub pair: String,
    pub buy_venue: String,
    pub sell_venue: String,
    pub buy_price: f64,
    pub sell_price: f64,
    /// Raw spread: `(sell - buy) / buy * 100`.
    pub spread_pct: f64,
    /// Spread minus both venues' slippage.
    pub gross_profit_pct: f64,
    /// Execution cost estimate for the buy→sell route.
    pub estimated_gas_pct: f64,
    /// Gross profit minus gas. Always > 0 for a materialized opportunity.
    pub net_profit_pct: f64,
    /// Composite reliability score in [0, 100]. Not a probability.
    pub confidence: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub detected_at: DateTime<Utc>,
    /// Ordered step labels, e.g. ["Buy on Raydium", "Sell on Orca"].
    pub route: Vec<String>,
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {} (spread: {:.3}% | net: {:.3}% | conf: {:.0})",
            self.pair,
            self.buy_venue,
            self.sell_venue,
            self.spread_pct,
            self.net_profit_pct,
            self.confidence,
        )
    }
}

impl Opportunity {
    /// Compose the deterministic-per-cycle opportunity id.
    pub fn compose_id(
        pair: &str,
        buy_venue: &str,
        sell_venue: &str,
        detected_at: DateTime<Utc>,
    ) -> String {
        format!(
            "{}-{}-{}-{}",
            pair.replace('/', "-"),
            buy_venue,
            sell_venue,
            detected_at.timestamp_millis()
        )
    }

    /// Helper to build a test opportunity with sensible defaults.
    #[cfg(test)]
    pub fn sample(id: &str, net_profit_pct: f64) -> Self {
        let detected_at = Utc::now();
        Opportunity {
            id: id.to_string(),
            pair: "SOL/USDC".to_string(),
            buy_venue: "Raydium".to_string(),
            sell_venue: "Orca".to_string(),
            buy_price: 100.0,
            sell_price: 102.0,
            spread_pct: 2.0,
            gross_profit_pct: net_profit_pct + 0.02,
            estimated_gas_pct: 0.02,
            net_profit_pct,
            confidence: 75.0,
            detected_at,
            route: vec!["Buy on Raydium".to_string(), "Sell on Orca".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Ranked set
// ---------------------------------------------------------------------------

/// The current top-N opportunities, replaced wholesale each cycle.
///
/// Readers only ever hold immutable snapshots, so a set is either all-old
/// or all-new — never a mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSet {
    pub opportunities: Vec<Opportunity>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub generated_at: DateTime<Utc>,
}

impl RankedSet {
    /// The empty set published before the first cycle completes.
    pub fn empty() -> Self {
        RankedSet {
            opportunities: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.opportunities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Outcome of replaying an opportunity against a hypothetical order size.
/// Created per simulation call; not persisted beyond the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub opportunity_id: String,
    pub requested_amount: f64,
    pub execution_latency_ms: u64,
    pub original_estimate_net_profit_pct: f64,
    pub actual_profit_amount: f64,
    pub slippage_impact_pct: f64,
    pub gas_used: f64,
    pub route: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub completed_at: DateTime<Utc>,
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sim {} ({} units): profit {:.4} | slip {:.2}% | {}ms",
            self.opportunity_id,
            self.requested_amount,
            self.actual_profit_amount,
            self.slippage_impact_pct,
            self.execution_latency_ms,
        )
    }
}

// ---------------------------------------------------------------------------
// Stream events
// ---------------------------------------------------------------------------

/// Messages pushed to streaming observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamEvent {
    /// Full ranked-set push (on connect and after every cycle).
    Opportunities { data: RankedSet },
    /// Acknowledgement of a pair-scoped subscription request.
    Subscribed { pair: String },
}

/// Control messages accepted from streaming observers.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamCommand {
    Subscribe { pair: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
