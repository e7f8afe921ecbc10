// src/core/counters.rs

use std::sync::atomic::{AtomicU64, Ordering};

use log::info;

/// Operational counters for error conditions, observable by operators.
/// Incremented from both phases; per-shard and per-mask failures are counted
/// here and skipped rather than aborting the job.
#[derive(Debug, Default)]
pub struct Counters {
    pub invalid_sieve_array: AtomicU64,
    pub unable_to_output: AtomicU64,
    pub unable_to_solve_system: AtomicU64,
    pub cant_factor: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Counters::default()
    }

    pub fn log_totals(&self) {
        info!(
            "counters: invalid_sieve_array={} unable_to_output={} unable_to_solve_system={} cant_factor={}",
            self.invalid_sieve_array.load(Ordering::Relaxed),
            self.unable_to_output.load(Ordering::Relaxed),
            self.unable_to_solve_system.load(Ordering::Relaxed),
            self.cant_factor.load(Ordering::Relaxed),
        );
    }
}

/// Bump a counter by one.
pub fn increment(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}
