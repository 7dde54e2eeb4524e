//! # telsched
//!
//! Night planner that assigns observation targets to telescopes.
//!
//! For every (telescope, target) pair the planner finds the run of minutes
//! during which the target is observable, turns the accepted runs into an
//! interval scheduling model, solves it with an [`interval_cp`] engine and
//! reports a per-telescope timetable.
//!
//! ## Architecture
//!
//! - [`models`]: telescopes, targets, time and the planning horizon
//! - [`services`]: ephemeris, visibility oracle, window finder, night horizon
//! - [`scheduler`]: model builder, solver adapter and schedule reporter
//! - [`config`] and [`parsing`]: telescope configuration and target catalog
//! - [`pipeline`]: the stages wired together
//!
//! Library code logs through the `log` facade; the `telsched` binary
//! installs a `tracing` subscriber.

pub mod config;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod scheduler;
pub mod services;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;
