//! Mock quote provider for integration testing.
//!
//! A deterministic `QuoteProvider` implementation that returns known
//! quotes — all in-memory with no external dependencies and no randomness,
//! so detection results are exactly predictable from test code.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use spreadwatch::errors::QuoteError;
use spreadwatch::providers::QuoteProvider;
use spreadwatch::types::Quote;

pub struct MockProvider {
    quotes: HashMap<(String, String), Quote>,
    /// Pairs that will fail to quote (per-pair failure injection).
    failing_pairs: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Build a provider serving zero-cost quotes at fixed prices.
    pub fn with_prices(entries: &[(&str, &str, f64)]) -> Self {
        let quotes = entries
            .iter()
            .map(|(venue, pair, price)| {
                (
                    (venue.to_string(), pair.to_string()),
                    Quote {
                        venue: venue.to_string(),
                        pair: pair.to_string(),
                        price: *price,
                        liquidity: 500_000.0,
                        slippage_rate: 0.0,
                        fee_rate: 0.0,
                        route: vec![venue.to_string()],
                    },
                )
            })
            .collect();
        Self {
            quotes,
            failing_pairs: Mutex::new(Vec::new()),
        }
    }

    /// Make every fetch for this pair fail until cleared.
    pub fn fail_pair(&self, pair: &str) {
        self.failing_pairs.lock().unwrap().push(pair.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing_pairs.lock().unwrap().clear();
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    async fn fetch_quote(&self, venue: &str, pair: &str) -> Result<Quote, QuoteError> {
        if self.failing_pairs.lock().unwrap().iter().any(|p| p == pair) {
            return Err(QuoteError::Unavailable {
                venue: venue.to_string(),
                pair: pair.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.quotes
            .get(&(venue.to_string(), pair.to_string()))
            .cloned()
            .ok_or_else(|| QuoteError::Unavailable {
                venue: venue.to_string(),
                pair: pair.to_string(),
                reason: "no quote configured".to_string(),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
