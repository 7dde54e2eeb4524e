//! Solving engine capability
//!
//! The scheduling core only depends on this trait, so any engine able to
//! handle interval models can be plugged in.

use crate::error::Result;
use crate::model::CpModel;
use crate::response::CpSolverResponse;
use crate::types::SolverParams;

/// Something that can solve a [`CpModel`].
pub trait SolvingEngine {
    /// Short engine name used in logs.
    fn name(&self) -> &str;

    /// Solve `model` within the limits in `params`.
    ///
    /// Hitting a limit is not an error: it yields a `Feasible` or `Unknown`
    /// status. Errors are reserved for models the engine cannot interpret.
    fn solve(&self, model: &CpModel, params: &SolverParams) -> Result<CpSolverResponse>;
}

impl<E: SolvingEngine + ?Sized> SolvingEngine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, model: &CpModel, params: &SolverParams) -> Result<CpSolverResponse> {
        (**self).solve(model, params)
    }
}
