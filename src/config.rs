//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default so a partial (or missing) file still yields
//! a runnable configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub market: MarketConfig,
    pub server: ServerConfig,
}

/// Detection cycle cadence and filtering thresholds.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScannerConfig {
    /// Detection cycle period in seconds.
    pub interval_secs: u64,
    /// Ranked set capacity (top N by net profit).
    pub ranked_set_size: usize,
    /// Per-pair spread history capacity (FIFO).
    pub history_capacity: usize,
    /// Coarse pre-filter: minimum raw spread percentage.
    pub min_spread_pct: f64,
    /// Minimum net profit percentage after slippage and gas.
    pub min_net_profit_pct: f64,
    /// Notional size against which simulated profit is scaled.
    pub reference_amount: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            ranked_set_size: 10,
            history_capacity: 50,
            min_spread_pct: 0.1,
            min_net_profit_pct: 0.05,
            reference_amount: 1000.0,
        }
    }
}

/// Tracked pairs and venues.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MarketConfig {
    pub pairs: Vec<PairConfig>,
    pub venues: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PairConfig {
    /// Pair symbol, e.g. "SOL/USDC".
    pub symbol: String,
    /// Reference price the simulated provider anchors its draws around.
    pub base_price: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            pairs: vec![
                PairConfig { symbol: "SOL/USDC".into(), base_price: 145.0 },
                PairConfig { symbol: "RAY/USDC".into(), base_price: 2.4 },
                PairConfig { symbol: "ORCA/USDC".into(), base_price: 3.1 },
                PairConfig { symbol: "BONK/USDC".into(), base_price: 0.000021 },
                PairConfig { symbol: "JUP/USDC".into(), base_price: 0.85 },
            ],
            venues: vec!["Raydium".into(), "Orca".into(), "Lifinity".into()],
        }
    }
}

/// HTTP/WebSocket API server.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load from a TOML file, falling back to defaults if it is absent.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::warn!(path, "Config file not found — using defaults");
            Ok(Self::default())
        }
    }

    /// Pair symbols as a plain list.
    pub fn pair_symbols(&self) -> Vec<String> {
        self.market.pairs.iter().map(|p| p.symbol.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.scanner.interval_secs, 3);
        assert_eq!(cfg.scanner.ranked_set_size, 10);
        assert_eq!(cfg.scanner.history_capacity, 50);
        assert!((cfg.scanner.min_spread_pct - 0.1).abs() < 1e-12);
        assert!((cfg.scanner.min_net_profit_pct - 0.05).abs() < 1e-12);
        assert_eq!(cfg.market.venues.len(), 3);
        assert_eq!(cfg.market.pairs.len(), 5);
        assert!(cfg.server.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [scanner]
            interval_secs = 10
            ranked_set_size = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scanner.interval_secs, 10);
        assert_eq!(cfg.scanner.ranked_set_size, 5);
        // Untouched fields keep their defaults
        assert_eq!(cfg.scanner.history_capacity, 50);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn test_pair_symbols() {
        let cfg = AppConfig::default();
        let symbols = cfg.pair_symbols();
        assert!(symbols.contains(&"SOL/USDC".to_string()));
        assert_eq!(symbols.len(), 5);
    }
}
