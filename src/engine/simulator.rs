//! Trade simulation against the current ranked set.
//!
//! Replays a detected opportunity with a hypothetical order size: draws a
//! realistic execution latency and an extra slippage impact beyond what the
//! opportunity already priced in, then scales the profit estimate.
//!
//! Read-only with respect to ranking and history state — a simulation only
//! consumes a snapshot of the named opportunity, and concurrent calls never
//! interfere (no shared mutable counters).

use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::engine::ranker::OpportunityRanker;
use crate::errors::SimulationError;
use crate::types::SimulationResult;

/// Simulated execution latency bounds, milliseconds.
const LATENCY_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=600;

/// Extra slippage beyond the opportunity's priced-in estimate, percent.
const EXTRA_SLIPPAGE_RANGE_PCT: std::ops::Range<f64> = 0.1..0.6;

pub struct TradeSimulator {
    ranker: Arc<OpportunityRanker>,
    /// Notional size the opportunity's profit estimate refers to.
    reference_amount: f64,
}

impl TradeSimulator {
    pub fn new(ranker: Arc<OpportunityRanker>, reference_amount: f64) -> Self {
        Self {
            ranker,
            reference_amount,
        }
    }

    /// Simulate executing `amount` against the opportunity with this id.
    ///
    /// Fails with [`SimulationError::OpportunityExpired`] if the id is not
    /// in the current ranked set, and [`SimulationError::InvalidAmount`]
    /// for a non-positive or non-finite amount.
    pub async fn simulate(
        &self,
        opportunity_id: &str,
        amount: f64,
    ) -> Result<SimulationResult, SimulationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SimulationError::InvalidAmount(amount.to_string()));
        }

        let opportunity = self
            .ranker
            .find(opportunity_id)
            .ok_or_else(|| SimulationError::OpportunityExpired(opportunity_id.to_string()))?;

        // Draw before any await point — ThreadRng is not Send.
        let (latency_ms, slippage_impact_pct) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(LATENCY_RANGE_MS),
                rng.gen_range(EXTRA_SLIPPAGE_RANGE_PCT),
            )
        };

        tokio::time::sleep(Duration::from_millis(latency_ms)).await;

        let actual_profit_amount = opportunity.net_profit_pct
            * (amount / self.reference_amount)
            * (1.0 - slippage_impact_pct / 100.0);

        let result = SimulationResult {
            opportunity_id: opportunity.id.clone(),
            requested_amount: amount,
            execution_latency_ms: latency_ms,
            original_estimate_net_profit_pct: opportunity.net_profit_pct,
            actual_profit_amount,
            slippage_impact_pct,
            gas_used: opportunity.estimated_gas_pct,
            route: opportunity.route.clone(),
            completed_at: Utc::now(),
        };

        info!(
            opportunity = opportunity_id,
            amount,
            latency_ms,
            profit = actual_profit_amount,
            "Simulated execution"
        );

        Ok(result)
    }
}
