//! Detection cycle driver.
//!
//! Runs the gather → detect → rank → record → publish pipeline on a fixed
//! interval. Quote gathering fans out concurrently across venues and pairs;
//! the merge/replace/publish tail runs to completion before the next tick,
//! so cycles never overlap.
//!
//! A pair whose quotes fail this tick is skipped and retried on the next
//! cycle — one bad venue never aborts the whole cycle.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::distributor::Distributor;
use crate::engine::analyzer::SpreadAnalyzer;
use crate::engine::history::HistoryTracker;
use crate::engine::ranker::OpportunityRanker;
use crate::providers::QuoteProvider;
use crate::types::Quote;

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// Summary of one detection cycle, for logging and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub pairs_scanned: usize,
    pub pairs_failed: usize,
    pub opportunities_detected: usize,
    pub opportunities_ranked: usize,
    pub observers_notified: usize,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

pub struct Scheduler {
    provider: Arc<dyn QuoteProvider>,
    analyzer: SpreadAnalyzer,
    ranker: Arc<OpportunityRanker>,
    history: Arc<HistoryTracker>,
    distributor: Arc<Distributor>,
    pairs: Vec<String>,
    venues: Vec<String>,
    interval: Duration,
}

impl Scheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        analyzer: SpreadAnalyzer,
        ranker: Arc<OpportunityRanker>,
        history: Arc<HistoryTracker>,
        distributor: Arc<Distributor>,
        pairs: Vec<String>,
        venues: Vec<String>,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            analyzer,
            ranker,
            history,
            distributor,
            pairs,
            venues,
            interval,
        }
    }

    /// Drive detection cycles until the task is dropped or aborted.
    ///
    /// A cycle that fails partway is logged and the loop continues — no
    /// single cycle's failure is fatal to the scheduler.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.interval);
        let mut cycle_number: u64 = 0;

        info!(
            interval_secs = self.interval.as_secs_f64(),
            pairs = self.pairs.len(),
            venues = self.venues.len(),
            "Scheduler started"
        );

        loop {
            interval.tick().await;
            cycle_number += 1;
            let report = self.run_cycle(cycle_number).await;
            log_cycle_report(&report);
        }
    }

    /// Run one gather → detect → rank → record → publish cycle.
    pub async fn run_cycle(&self, cycle_number: u64) -> CycleReport {
        let mut report = CycleReport {
            cycle_number,
            ..CycleReport::default()
        };

        // Gather quotes for all pairs concurrently; each pair gathers all
        // of its venues concurrently too. Failures are isolated per pair.
        let gathered = join_all(
            self.pairs
                .iter()
                .map(|pair| async move { (pair.clone(), self.gather_pair(pair).await) }),
        )
        .await;

        // Merge: detection itself is synchronous and deterministic.
        let detected_at = Utc::now();
        let mut merged = Vec::new();
        for (pair, quotes) in gathered {
            match quotes {
                Some(quotes) => {
                    report.pairs_scanned += 1;
                    let stability = self.history.stability(&pair).await;
                    let opportunities =
                        self.analyzer.detect(&pair, &quotes, stability, detected_at);
                    debug!(pair, found = opportunities.len(), "Pair analyzed");
                    merged.extend(opportunities);
                }
                None => report.pairs_failed += 1,
            }
        }
        report.opportunities_detected = merged.len();

        // Rank (atomic wholesale replacement), then record the surviving
        // spreads, then publish — one logically atomic tail per cycle.
        self.ranker.replace(merged);
        let ranked = self.ranker.current();
        report.opportunities_ranked = ranked.len();

        for opportunity in &ranked.opportunities {
            self.history
                .record(&opportunity.pair, opportunity.spread_pct)
                .await;
        }

        report.observers_notified = self.distributor.publish(ranked).await;
        report
    }

    /// Fetch quotes from every venue for one pair.
    ///
    /// Returns `None` if any venue fetch fails — the pair sits out this
    /// cycle and is retried on the next one.
    async fn gather_pair(&self, pair: &str) -> Option<Vec<Quote>> {
        let results = join_all(
            self.venues
                .iter()
                .map(|venue| self.provider.fetch_quote(venue, pair)),
        )
        .await;

        let mut quotes = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    warn!(pair, error = %e, "Quote unavailable — skipping pair this cycle");
                    return None;
                }
            }
        }
        Some(quotes)
    }
}

/// Log a human-readable cycle summary.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        scanned = report.pairs_scanned,
        failed = report.pairs_failed,
        detected = report.opportunities_detected,
        ranked = report.opportunities_ranked,
        observers = report.observers_notified,
        "Cycle complete"
    );
}
