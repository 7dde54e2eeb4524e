//! Type definitions for interval-cp

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Closed integer range `[lb, ub]` of an integer variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain {
    lb: i64,
    ub: i64,
}

impl Domain {
    /// Create a domain, rejecting `lb > ub`.
    pub fn new(lb: i64, ub: i64) -> Result<Self> {
        if lb > ub {
            return Err(Error::InvalidDomain { lb, ub });
        }
        Ok(Self { lb, ub })
    }

    /// Domain holding a single value.
    pub fn fixed(value: i64) -> Self {
        Self {
            lb: value,
            ub: value,
        }
    }

    pub fn lb(&self) -> i64 {
        self.lb
    }

    pub fn ub(&self) -> i64 {
        self.ub
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lb <= value && value <= self.ub
    }
}

/// Handle to an integer variable of a [`crate::CpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntVar(pub(crate) usize);

/// Handle to a boolean variable of a [`crate::CpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoolVar(pub(crate) usize);

/// Handle to an interval variable of a [`crate::CpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntervalVar(pub(crate) usize);

impl IntVar {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl BoolVar {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl IntervalVar {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Outcome of a solve call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    /// A solution was found and proven optimal.
    Optimal,
    /// A solution was found, but the search stopped before proving optimality.
    Feasible,
    /// The search proved that no solution exists.
    Infeasible,
    /// The search stopped without a solution and without an infeasibility proof.
    Unknown,
}

impl SolverStatus {
    /// `true` for statuses that carry variable values.
    pub fn has_solution(&self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStatus::Optimal => write!(f, "Optimal"),
            SolverStatus::Feasible => write!(f, "Feasible"),
            SolverStatus::Infeasible => write!(f, "Infeasible"),
            SolverStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why the search stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The whole tree was explored (optimality or infeasibility is proven).
    Exhausted,
    /// A search limit fired; the string names it.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "Search exhausted"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Parameters for the solving engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Wall-clock limit in seconds (0 = no limit)
    #[serde(default)]
    pub time_limit_seconds: f64,

    /// Maximum number of explored nodes (0 = no limit)
    #[serde(default)]
    pub max_nodes: u64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            time_limit_seconds: 0.0,
            max_nodes: 0,
        }
    }
}

impl SolverParams {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_seconds = limit.as_secs_f64();
        self
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// The time limit as a `Duration`, `None` when unlimited.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.time_limit_seconds > 0.0 && self.time_limit_seconds.is_finite() {
            Some(Duration::from_secs_f64(self.time_limit_seconds))
        } else {
            None
        }
    }

    /// The node limit, `None` when unlimited.
    pub fn node_limit(&self) -> Option<u64> {
        (self.max_nodes > 0).then_some(self.max_nodes)
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Candidate placements generated while branching.
    pub decisions_generated: u64,
    /// Deepest level reached in the tree.
    pub max_depth: u64,
    /// Subtrees cut because their bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Improving solutions found.
    pub solutions_found: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl SolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Decisions generated:  {}", self.decisions_generated)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        write!(f, "  Total time:           {:.2?}", self.time_total)
    }
}
