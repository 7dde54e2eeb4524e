//! Search limits
//!
//! Time and node budgets for the search. The wall clock is only read every
//! `clock_check_mask + 1` steps to keep the check cheap.

use std::time::{Duration, Instant};

use crate::types::SolverParams;

#[derive(Debug, Clone)]
pub(crate) struct SearchLimits {
    clock_check_mask: u64,
    steps: u64,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    start_time: Instant,
}

impl SearchLimits {
    /// Check the clock every 1,024 steps (2^10).
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FF;

    pub(crate) fn new(params: &SolverParams) -> Self {
        Self::with_clock_check_mask(params, Self::DEFAULT_STEP_CLOCK_CHECK_MASK)
    }

    pub(crate) fn with_clock_check_mask(params: &SolverParams, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit: params.time_limit(),
            node_limit: params.node_limit(),
            start_time: Instant::now(),
        }
    }

    #[inline(always)]
    pub(crate) fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// The reason to stop, if any limit has been reached.
    pub(crate) fn exceeded(&self) -> Option<String> {
        if let Some(limit) = self.node_limit {
            if self.steps >= limit {
                return Some("node limit reached".to_string());
            }
        }
        if let Some(limit) = self.time_limit {
            if (self.steps & self.clock_check_mask) == 0 && self.start_time.elapsed() >= limit {
                return Some("time limit reached".to_string());
            }
        }
        None
    }
}
