//! Error taxonomy for the scanner core.
//!
//! No variant here is fatal to the process: quote failures are recovered
//! per-pair inside a cycle, and simulation failures surface as typed
//! responses to the caller.

use thiserror::Error;

/// A venue/pair quote fetch failed for this cycle.
///
/// Recovered locally: the pair's contribution is skipped for the tick and
/// retried independently on the next cycle.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("quote unavailable for {pair} on {venue}: {reason}")]
    Unavailable {
        venue: String,
        pair: String,
        reason: String,
    },
}

/// Trade simulation rejection, surfaced to the caller as a typed signal
/// distinct from a generic fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The opportunity id is unknown or was superseded by a newer cycle.
    /// Callers must not retry blindly.
    #[error("opportunity {0} not found in the current ranked set")]
    OpportunityExpired(String),

    /// Non-positive order size — rejected before the simulation runs.
    #[error("simulation amount must be positive, got {0}")]
    InvalidAmount(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_error_message() {
        let e = QuoteError::Unavailable {
            venue: "Raydium".into(),
            pair: "SOL/USDC".into(),
            reason: "timeout".into(),
        };
        let msg = format!("{e}");
        assert!(msg.contains("SOL/USDC"));
        assert!(msg.contains("Raydium"));
    }

    #[test]
    fn test_simulation_error_variants() {
        let expired = SimulationError::OpportunityExpired("x-1".into());
        assert!(format!("{expired}").contains("x-1"));

        let invalid = SimulationError::InvalidAmount("-5".into());
        assert!(format!("{invalid}").contains("positive"));
        assert_ne!(expired, invalid);
    }
}
