//! Core engine — the gather → detect → rank → record → publish cycle.

pub mod analyzer;
pub mod history;
pub mod ranker;
pub mod scheduler;
pub mod simulator;
