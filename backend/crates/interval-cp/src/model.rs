//! Interval scheduling model and its builder
//!
//! A [`CpModel`] is an immutable bag of variables, constraints and a single
//! linear objective. It is assembled through [`CpModelBuilder`], which hands out
//! typed handles and validates every reference when it is registered.
//!
//! # Example
//!
//! ```rust
//! use interval_cp::{CpModelBuilder, Domain, LinearExpr};
//!
//! let mut builder = CpModelBuilder::new();
//! let start = builder.new_int_var(Domain::new(0, 10)?, "start");
//! let end = builder.new_int_var(Domain::new(0, 15)?, "end");
//! let present = builder.new_bool_var("present");
//! let interval = builder.new_optional_interval_var(start, 5, end, present, "job")?;
//!
//! let makespan = builder.new_int_var(Domain::new(0, 15)?, "makespan");
//! builder.add_max_equality(makespan, [interval])?;
//! builder.minimize(LinearExpr::new().add_int(makespan, 1).add_bool(present, -100))?;
//!
//! let model = builder.build();
//! assert_eq!(model.num_intervals(), 1);
//! # Ok::<(), interval_cp::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::types::{BoolVar, Domain, IntVar, IntervalVar};

/// A variable referenced by a linear term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Int(IntVar),
    Bool(BoolVar),
}

/// `Σ coefficient · variable + constant`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(Term, i64)>,
    constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_int(mut self, var: IntVar, coefficient: i64) -> Self {
        self.terms.push((Term::Int(var), coefficient));
        self
    }

    pub fn add_bool(mut self, var: BoolVar, coefficient: i64) -> Self {
        self.terms.push((Term::Bool(var), coefficient));
        self
    }

    pub fn add_constant(mut self, constant: i64) -> Self {
        self.constant += constant;
        self
    }

    pub fn terms(&self) -> &[(Term, i64)] {
        &self.terms
    }

    pub fn constant(&self) -> i64 {
        self.constant
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IntVarData {
    pub(crate) domain: Domain,
    pub(crate) name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IntervalData {
    pub(crate) start: IntVar,
    pub(crate) size: i64,
    pub(crate) end: IntVar,
    pub(crate) presence: Option<BoolVar>,
    pub(crate) name: String,
}

/// Constraints understood by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// No two present intervals of the set share a time point.
    NoOverlap(Vec<IntervalVar>),
    /// At most one of the booleans is true.
    AtMostOne(Vec<BoolVar>),
    /// `target` equals the largest end among the present intervals, or the
    /// lower bound of its domain when none is present.
    MaxEquality {
        target: IntVar,
        intervals: Vec<IntervalVar>,
    },
}

/// Immutable interval scheduling model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpModel {
    pub(crate) int_vars: Vec<IntVarData>,
    pub(crate) bool_vars: Vec<String>,
    pub(crate) intervals: Vec<IntervalData>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Option<LinearExpr>,
}

impl CpModel {
    pub fn num_int_vars(&self) -> usize {
        self.int_vars.len()
    }

    pub fn num_bool_vars(&self) -> usize {
        self.bool_vars.len()
    }

    pub fn num_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&LinearExpr> {
        self.objective.as_ref()
    }

    pub fn domain(&self, var: IntVar) -> Domain {
        self.int_vars[var.0].domain
    }

    pub fn int_var_name(&self, var: IntVar) -> &str {
        &self.int_vars[var.0].name
    }

    pub fn bool_var_name(&self, var: BoolVar) -> &str {
        &self.bool_vars[var.0]
    }

    pub fn interval_name(&self, interval: IntervalVar) -> &str {
        &self.intervals[interval.0].name
    }

    pub fn interval_size(&self, interval: IntervalVar) -> i64 {
        self.intervals[interval.0].size
    }

    pub fn interval_start(&self, interval: IntervalVar) -> IntVar {
        self.intervals[interval.0].start
    }

    pub fn interval_end(&self, interval: IntervalVar) -> IntVar {
        self.intervals[interval.0].end
    }

    pub fn interval_presence(&self, interval: IntervalVar) -> Option<BoolVar> {
        self.intervals[interval.0].presence
    }
}

/// Incremental builder for [`CpModel`].
#[derive(Debug, Default)]
pub struct CpModelBuilder {
    model: CpModel,
}

impl CpModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an integer variable ranging over `domain`.
    pub fn new_int_var(&mut self, domain: Domain, name: impl Into<String>) -> IntVar {
        self.model.int_vars.push(IntVarData {
            domain,
            name: name.into(),
        });
        IntVar(self.model.int_vars.len() - 1)
    }

    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        self.model.bool_vars.push(name.into());
        BoolVar(self.model.bool_vars.len() - 1)
    }

    /// Add an interval that is always part of the schedule.
    ///
    /// `end = start + size` is implied by the interval.
    pub fn new_interval_var(
        &mut self,
        start: IntVar,
        size: i64,
        end: IntVar,
        name: impl Into<String>,
    ) -> Result<IntervalVar> {
        self.push_interval(start, size, end, None, name.into())
    }

    /// Add an interval whose participation is decided by `presence`.
    ///
    /// An absent interval is ignored by every constraint that mentions it.
    pub fn new_optional_interval_var(
        &mut self,
        start: IntVar,
        size: i64,
        end: IntVar,
        presence: BoolVar,
        name: impl Into<String>,
    ) -> Result<IntervalVar> {
        self.check_bool(presence)?;
        self.push_interval(start, size, end, Some(presence), name.into())
    }

    fn push_interval(
        &mut self,
        start: IntVar,
        size: i64,
        end: IntVar,
        presence: Option<BoolVar>,
        name: String,
    ) -> Result<IntervalVar> {
        self.check_int(start)?;
        self.check_int(end)?;
        if size < 0 {
            return Err(Error::NegativeSize { name, size });
        }
        self.model.intervals.push(IntervalData {
            start,
            size,
            end,
            presence,
            name,
        });
        Ok(IntervalVar(self.model.intervals.len() - 1))
    }

    pub fn add_no_overlap(
        &mut self,
        intervals: impl IntoIterator<Item = IntervalVar>,
    ) -> Result<()> {
        let intervals: Vec<IntervalVar> = intervals.into_iter().collect();
        for interval in &intervals {
            self.check_interval(*interval)?;
        }
        self.model.constraints.push(Constraint::NoOverlap(intervals));
        Ok(())
    }

    pub fn add_at_most_one(&mut self, literals: impl IntoIterator<Item = BoolVar>) -> Result<()> {
        let literals: Vec<BoolVar> = literals.into_iter().collect();
        for literal in &literals {
            self.check_bool(*literal)?;
        }
        self.model.constraints.push(Constraint::AtMostOne(literals));
        Ok(())
    }

    /// `target == max(end(i) for present i in intervals)`.
    pub fn add_max_equality(
        &mut self,
        target: IntVar,
        intervals: impl IntoIterator<Item = IntervalVar>,
    ) -> Result<()> {
        self.check_int(target)?;
        let intervals: Vec<IntervalVar> = intervals.into_iter().collect();
        for interval in &intervals {
            self.check_interval(*interval)?;
        }
        self.model
            .constraints
            .push(Constraint::MaxEquality { target, intervals });
        Ok(())
    }

    /// Set the objective to minimize. A later call replaces the earlier one.
    pub fn minimize(&mut self, expr: LinearExpr) -> Result<()> {
        for (term, _) in expr.terms() {
            match term {
                Term::Int(var) => self.check_int(*var)?,
                Term::Bool(var) => self.check_bool(*var)?,
            }
        }
        self.model.objective = Some(expr);
        Ok(())
    }

    pub fn build(self) -> CpModel {
        self.model
    }

    fn check_int(&self, var: IntVar) -> Result<()> {
        if var.0 < self.model.int_vars.len() {
            Ok(())
        } else {
            Err(Error::UnknownVariable {
                kind: "integer",
                index: var.0,
            })
        }
    }

    fn check_bool(&self, var: BoolVar) -> Result<()> {
        if var.0 < self.model.bool_vars.len() {
            Ok(())
        } else {
            Err(Error::UnknownVariable {
                kind: "boolean",
                index: var.0,
            })
        }
    }

    fn check_interval(&self, interval: IntervalVar) -> Result<()> {
        if interval.0 < self.model.intervals.len() {
            Ok(())
        } else {
            Err(Error::UnknownVariable {
                kind: "interval",
                index: interval.0,
            })
        }
    }
}
