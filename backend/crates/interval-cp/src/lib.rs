//! # interval-cp
//!
//! Interval scheduling models and a small exact solving engine.
//!
//! The crate has two halves:
//!
//! - a modelling API ([`CpModelBuilder`], [`CpModel`]) with bounded integer
//!   variables, booleans, fixed-size (optionally present) intervals,
//!   no-overlap, at-most-one and max-equality constraints, and one linear
//!   objective to minimize;
//! - the [`SolvingEngine`] capability, implemented by [`BranchAndBound`].
//!
//! ## Example
//!
//! ```rust
//! use interval_cp::{
//!     BranchAndBound, CpModelBuilder, Domain, LinearExpr, SolverParams, SolverStatus,
//!     SolvingEngine,
//! };
//!
//! let mut builder = CpModelBuilder::new();
//! let start = builder.new_int_var(Domain::new(10, 20)?, "start");
//! let end = builder.new_int_var(Domain::new(60, 70)?, "end");
//! let present = builder.new_bool_var("present");
//! let job = builder.new_optional_interval_var(start, 50, end, present, "job")?;
//! let makespan = builder.new_int_var(Domain::new(0, 100)?, "makespan");
//! builder.add_no_overlap([job])?;
//! builder.add_max_equality(makespan, [job])?;
//! builder.minimize(LinearExpr::new().add_int(makespan, 1).add_bool(present, -101))?;
//!
//! let response = BranchAndBound.solve(&builder.build(), &SolverParams::default())?;
//! assert_eq!(response.status, SolverStatus::Optimal);
//! assert_eq!(response.value(start), Some(10));
//! # Ok::<(), interval_cp::Error>(())
//! ```

mod bnb;
mod engine;
mod error;
mod limits;
mod model;
mod response;
mod types;

pub use bnb::BranchAndBound;
pub use engine::SolvingEngine;
pub use error::{Error, Result};
pub use model::{Constraint, CpModel, CpModelBuilder, LinearExpr, Term};
pub use response::CpSolverResponse;
pub use types::*;
