//! Scheduling core: model construction, solving and reporting.
//!
//! ```rust
//! use interval_cp::{BranchAndBound, SolverParams};
//! use telsched::models::{Horizon, ModifiedJulianDate, TargetId, TelescopeId, Window};
//! use telsched::scheduler::{build_model, report, solve};
//! use telsched::services::AcceptedWindow;
//!
//! let horizon = Horizon::new(ModifiedJulianDate::new(60000.0), 120);
//! let accepted = [AcceptedWindow {
//!     telescope: TelescopeId(1),
//!     target: TargetId(42),
//!     run: 0,
//!     window: Window::new(10, 70),
//!     duration: 50,
//!     priority: 0.0,
//! }];
//!
//! let model = build_model(&accepted, &horizon)?;
//! let result = solve(&model, &BranchAndBound, &SolverParams::default())?;
//! let rows = report(&result, &accepted);
//! assert_eq!((rows[0].start, rows[0].end), (10, 60));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod model_builder;
pub mod report;
pub mod solver;

pub use model_builder::{
    build_model, build_model_with_scope, Assignment, AssignmentKey, ExclusivityScope,
    ModelError, SchedulingModel,
};
pub use report::{report, ScheduleReport, ScheduledObservation, TimedObservation};
pub use solver::{solve, SolveError, SolveResult};

#[cfg(test)]
mod tests;
