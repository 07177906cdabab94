//! Randomized quote generation — a stand-in for live venue feeds.
//!
//! Anchors each pair at a configured base price and draws per-venue
//! variance, liquidity, slippage, and fees in realistic ranges. Only used
//! when no real feed is wired in; tests inject a deterministic provider
//! instead of relying on these distributions.

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;

use crate::config::PairConfig;
use crate::errors::QuoteError;
use crate::providers::QuoteProvider;
use crate::types::Quote;

/// Per-venue price variance around the pair's base price: ±0.5%.
const PRICE_VARIANCE: f64 = 0.005;

/// Simulated liquidity range in quote-currency units.
const LIQUIDITY_RANGE: std::ops::Range<f64> = 100_000.0..900_000.0;

/// Simulated slippage range: 0.1% – 0.6% of price.
const SLIPPAGE_RANGE: std::ops::Range<f64> = 0.001..0.006;

/// Simulated venue fee range: 0.25% – 1%.
const FEE_RANGE: std::ops::Range<f64> = 0.0025..0.01;

pub struct SimulatedProvider {
    base_prices: HashMap<String, f64>,
}

impl SimulatedProvider {
    pub fn new(pairs: &[PairConfig]) -> Self {
        Self {
            base_prices: pairs
                .iter()
                .map(|p| (p.symbol.clone(), p.base_price))
                .collect(),
        }
    }
}

#[async_trait]
impl QuoteProvider for SimulatedProvider {
    async fn fetch_quote(&self, venue: &str, pair: &str) -> Result<Quote, QuoteError> {
        let base_price = self.base_prices.get(pair).copied().ok_or_else(|| {
            QuoteError::Unavailable {
                venue: venue.to_string(),
                pair: pair.to_string(),
                reason: "pair not tracked".to_string(),
            }
        })?;

        let mut rng = rand::thread_rng();
        let variance = rng.gen_range(-PRICE_VARIANCE..PRICE_VARIANCE);

        let (base, quote) = pair.split_once('/').unwrap_or((pair, "USDC"));

        Ok(Quote {
            venue: venue.to_string(),
            pair: pair.to_string(),
            price: base_price * (1.0 + variance),
            liquidity: rng.gen_range(LIQUIDITY_RANGE),
            slippage_rate: rng.gen_range(SLIPPAGE_RANGE),
            fee_rate: rng.gen_range(FEE_RANGE),
            route: vec![base.to_string(), venue.to_string(), quote.to_string()],
        })
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;

    fn provider() -> SimulatedProvider {
        SimulatedProvider::new(&MarketConfig::default().pairs)
    }

    #[tokio::test]
    async fn test_quote_within_variance() {
        let p = provider();
        for _ in 0..50 {
            let q = p.fetch_quote("Raydium", "SOL/USDC").await.unwrap();
            assert!(q.price > 145.0 * (1.0 - PRICE_VARIANCE));
            assert!(q.price < 145.0 * (1.0 + PRICE_VARIANCE));
            assert!(q.liquidity >= 100_000.0 && q.liquidity < 900_000.0);
            assert!(q.slippage_rate >= 0.001 && q.slippage_rate < 0.006);
            assert!(q.fee_rate >= 0.0025 && q.fee_rate < 0.01);
        }
    }

    #[tokio::test]
    async fn test_route_annotation() {
        let q = provider().fetch_quote("Orca", "RAY/USDC").await.unwrap();
        assert_eq!(q.route, vec!["RAY", "Orca", "USDC"]);
    }

    #[tokio::test]
    async fn test_unknown_pair_is_unavailable() {
        let err = provider().fetch_quote("Orca", "FOO/BAR").await.unwrap_err();
        assert!(format!("{err}").contains("FOO/BAR"));
    }
}
