//! Top-N opportunity ranking with atomic wholesale replacement.
//!
//! The ranked set is held behind an `ArcSwap`: `replace` builds the new set
//! off to the side and swaps the pointer, so readers always observe either
//! the previous set or the new one in full — never a partial mix, and
//! without holding a lock.

use arc_swap::ArcSwap;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::types::{Opportunity, RankedSet};

pub struct OpportunityRanker {
    current: ArcSwap<RankedSet>,
    capacity: usize,
}

impl OpportunityRanker {
    pub fn new(capacity: usize) -> Self {
        Self {
            current: ArcSwap::from_pointee(RankedSet::empty()),
            capacity,
        }
    }

    /// Replace the held set with the top `capacity` of `opportunities`.
    ///
    /// Sorts by `net_profit_pct` descending, ties broken by earlier
    /// `detected_at` (stable), truncates, and swaps atomically.
    pub fn replace(&self, mut opportunities: Vec<Opportunity>) {
        opportunities.sort_by(|a, b| {
            b.net_profit_pct
                .partial_cmp(&a.net_profit_pct)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.detected_at.cmp(&b.detected_at))
        });
        opportunities.truncate(self.capacity);

        self.current.store(Arc::new(RankedSet {
            opportunities,
            generated_at: Utc::now(),
        }));
    }

    /// Snapshot of the currently held set.
    pub fn current(&self) -> Arc<RankedSet> {
        self.current.load_full()
    }

    /// Look up an opportunity by id in the current set only.
    ///
    /// Ids from superseded sets return `None` — the opportunity expired.
    pub fn find(&self, id: &str) -> Option<Opportunity> {
        self.current
            .load()
            .opportunities
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }
}
