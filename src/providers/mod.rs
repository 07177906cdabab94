//! Quote providers.
//!
//! Defines the `QuoteProvider` trait — the seam between the detection core
//! and whatever supplies venue prices. Live acquisition (network clients,
//! rate limiting, retries) lives behind this trait and outside this crate;
//! the shipped implementation is a randomized stand-in for live feeds.

pub mod simulated;

use async_trait::async_trait;

use crate::errors::QuoteError;
use crate::types::Quote;

/// Abstraction over per-venue quote sources.
///
/// Implementors return one fresh [`Quote`] per venue/pair combination.
/// All randomness in the pipeline belongs here — downstream detection is a
/// pure function of the quotes it receives.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch a fresh quote for one venue/pair combination.
    async fn fetch_quote(&self, venue: &str, pair: &str) -> Result<Quote, QuoteError>;

    /// Provider name for logging and identification.
    fn name(&self) -> &str;
}
