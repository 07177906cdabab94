//! Per-pair rolling spread history.
//!
//! Raw retention only: a bounded FIFO of recent `spread_pct` samples per
//! pair. Summarization (mean, dispersion) is a read-side concern — the one
//! derived read here is the market-stability signal fed to the analyzer.

use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

/// Samples needed before the stability signal is derived from data.
const MIN_STABILITY_SAMPLES: usize = 5;

/// Stability reported while the window is still warming up.
pub const NEUTRAL_STABILITY: f64 = 0.7;

/// Spread standard deviation (in percentage points) at which stability
/// bottoms out at zero.
const REFERENCE_VOLATILITY_PCT: f64 = 1.0;

pub struct HistoryTracker {
    windows: RwLock<HashMap<String, VecDeque<f64>>>,
    capacity: usize,
}

impl HistoryTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Append a spread sample, evicting the oldest once over capacity.
    pub async fn record(&self, pair: &str, spread_pct: f64) {
        let mut windows = self.windows.write().await;
        let window = windows.entry(pair.to_string()).or_default();
        window.push_back(spread_pct);
        while window.len() > self.capacity {
            window.pop_front();
        }
    }

    /// Snapshot of a pair's window, most-recent-last. Empty if untracked.
    pub async fn window(&self, pair: &str) -> Vec<f64> {
        self.windows
            .read()
            .await
            .get(pair)
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Market-stability signal in [0, 1] for the analyzer's confidence
    /// scoring: `1 − min(stddev / REFERENCE_VOLATILITY_PCT, 1)` over the
    /// pair's recent spread samples, or [`NEUTRAL_STABILITY`] while fewer
    /// than `MIN_STABILITY_SAMPLES` exist.
    pub async fn stability(&self, pair: &str) -> f64 {
        let windows = self.windows.read().await;
        let Some(window) = windows.get(pair) else {
            return NEUTRAL_STABILITY;
        };
        if window.len() < MIN_STABILITY_SAMPLES {
            return NEUTRAL_STABILITY;
        }

        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        let stddev = variance.sqrt();

        1.0 - (stddev / REFERENCE_VOLATILITY_PCT).min(1.0)
    }
}
