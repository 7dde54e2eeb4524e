//! Solver response

use crate::types::{BoolVar, IntVar, SolverStatistics, SolverStatus, TerminationReason};

/// Result of solving a [`crate::CpModel`].
///
/// Variable values are only meaningful when [`SolverStatus::has_solution`]
/// holds; otherwise the value vectors are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpSolverResponse {
    pub status: SolverStatus,
    pub objective_value: Option<i64>,
    pub termination: TerminationReason,
    pub statistics: SolverStatistics,
    pub(crate) int_values: Vec<i64>,
    pub(crate) bool_values: Vec<bool>,
}

impl CpSolverResponse {
    pub(crate) fn without_solution(
        status: SolverStatus,
        termination: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            status,
            objective_value: None,
            termination,
            statistics,
            int_values: Vec::new(),
            bool_values: Vec::new(),
        }
    }

    /// Value of `var` in the returned solution.
    pub fn value(&self, var: IntVar) -> Option<i64> {
        self.int_values.get(var.0).copied()
    }

    /// Value of `var` in the returned solution.
    pub fn bool_value(&self, var: BoolVar) -> Option<bool> {
        self.bool_values.get(var.0).copied()
    }
}

impl std::fmt::Display for CpSolverResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.objective_value {
            Some(objective) => writeln!(f, "{}(objective={})", self.status, objective)?,
            None => writeln!(f, "{}", self.status)?,
        }
        writeln!(f, "  Termination:          {}", self.termination)?;
        write!(f, "{}", self.statistics)
    }
}
