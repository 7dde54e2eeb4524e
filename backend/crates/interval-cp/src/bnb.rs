//! Depth-first branch-and-bound engine
//!
//! The engine builds, for every no-overlap group, a sequence of intervals where
//! each one starts as early as its domain and its predecessor allow
//! (left-justified). For objectives that never decrease when an end time
//! grows, some optimal solution is of that shape, so enumerating sequences is
//! complete. Groups are closed in index order, which removes the permutations
//! that only differ in the order groups were extended.
//!
//! Supported model shapes:
//!
//! - an interval belongs to at most one `NoOverlap` constraint; intervals in
//!   none are scheduled on their own,
//! - a `MaxEquality` target is not shared with another constraint or interval,
//! - objective terms reference presence literals, `MaxEquality` targets or
//!   free integer variables.
//!
//! Anything else is reported as [`Error::Unsupported`].

use log::debug;

use crate::engine::SolvingEngine;
use crate::error::{Error, Result};
use crate::limits::SearchLimits;
use crate::model::{Constraint, CpModel, Term};
use crate::response::CpSolverResponse;
use crate::types::{SolverParams, SolverStatistics, SolverStatus, TerminationReason};

/// Exact engine for interval models.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound;

impl BranchAndBound {
    pub fn new() -> Self {
        Self
    }
}

impl SolvingEngine for BranchAndBound {
    fn name(&self) -> &str {
        "branch-and-bound"
    }

    fn solve(&self, model: &CpModel, params: &SolverParams) -> Result<CpSolverResponse> {
        let problem = Problem::compile(model)?;
        debug!(
            "Compiled model: {} intervals in {} sequences, {} at-most-one groups, {} max constraints",
            problem.tasks.len(),
            problem.groups.len(),
            problem.amo_count,
            problem.max_eqs.len()
        );

        let mut search = Search::new(&problem, SearchLimits::new(params));
        search.dfs(0, 0);
        Ok(search.into_response(model))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VarRole {
    Free,
    Start(usize),
    End(usize),
    MaxTarget(usize),
}

#[derive(Debug, Clone)]
struct Task {
    size: i64,
    est: i64,
    lst: i64,
    group: usize,
    mandatory: bool,
    reward: i64,
    amo: Vec<usize>,
    max_eqs: Vec<usize>,
}

#[derive(Debug, Clone)]
struct MaxEq {
    lb: i64,
    ub: i64,
    coef: i64,
}

#[derive(Debug)]
struct Problem {
    tasks: Vec<Task>,
    groups: Vec<Vec<usize>>,
    amo_count: usize,
    max_eqs: Vec<MaxEq>,
    roles: Vec<VarRole>,
    presence_of: Vec<Option<usize>>,
    int_coefs: Vec<i64>,
    constant: i64,
}

impl Problem {
    fn compile(model: &CpModel) -> Result<Self> {
        let mut roles = vec![VarRole::Free; model.int_vars.len()];
        let mut presence_of = vec![None; model.bool_vars.len()];
        let mut tasks = Vec::with_capacity(model.intervals.len());

        for (index, interval) in model.intervals.iter().enumerate() {
            claim(&mut roles, interval.start.0, VarRole::Start(index), model)?;
            claim(&mut roles, interval.end.0, VarRole::End(index), model)?;
            if let Some(presence) = interval.presence {
                if presence_of[presence.0].replace(index).is_some() {
                    return Err(Error::Unsupported(format!(
                        "presence literal '{}' is shared by several intervals",
                        model.bool_vars[presence.0]
                    )));
                }
            }

            let start = model.int_vars[interval.start.0].domain;
            let end = model.int_vars[interval.end.0].domain;
            tasks.push(Task {
                size: interval.size,
                est: start.lb().max(end.lb().saturating_sub(interval.size)),
                lst: start.ub().min(end.ub().saturating_sub(interval.size)),
                group: usize::MAX,
                mandatory: interval.presence.is_none(),
                reward: 0,
                amo: Vec::new(),
                max_eqs: Vec::new(),
            });
        }

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut amo_count = 0;
        let mut max_eqs = Vec::new();
        for constraint in &model.constraints {
            match constraint {
                Constraint::NoOverlap(intervals) => {
                    let group = groups.len();
                    let mut members = Vec::with_capacity(intervals.len());
                    for interval in intervals {
                        let task = &mut tasks[interval.0];
                        if task.group == group {
                            continue;
                        }
                        if task.group != usize::MAX {
                            return Err(Error::Unsupported(format!(
                                "interval '{}' appears in several no-overlap constraints",
                                model.intervals[interval.0].name
                            )));
                        }
                        task.group = group;
                        members.push(interval.0);
                    }
                    groups.push(members);
                }
                Constraint::AtMostOne(literals) => {
                    for literal in literals {
                        let Some(task) = presence_of[literal.0] else {
                            return Err(Error::Unsupported(format!(
                                "boolean '{}' is not the presence literal of an interval",
                                model.bool_vars[literal.0]
                            )));
                        };
                        if !tasks[task].amo.contains(&amo_count) {
                            tasks[task].amo.push(amo_count);
                        }
                    }
                    amo_count += 1;
                }
                Constraint::MaxEquality { target, intervals } => {
                    let index = max_eqs.len();
                    claim(&mut roles, target.0, VarRole::MaxTarget(index), model)?;
                    let domain = model.int_vars[target.0].domain;
                    max_eqs.push(MaxEq {
                        lb: domain.lb(),
                        ub: domain.ub(),
                        coef: 0,
                    });
                    for interval in intervals {
                        let task = &mut tasks[interval.0];
                        if !task.max_eqs.contains(&index) {
                            task.max_eqs.push(index);
                        }
                    }
                }
            }
        }

        for (index, task) in tasks.iter_mut().enumerate() {
            if task.group == usize::MAX {
                task.group = groups.len();
                groups.push(vec![index]);
            }
        }

        let mut int_coefs = vec![0i64; model.int_vars.len()];
        let mut constant = 0i64;
        if let Some(objective) = &model.objective {
            constant = objective.constant();
            for (term, coef) in objective.terms() {
                match *term {
                    Term::Bool(var) => match presence_of[var.0] {
                        Some(task) => tasks[task].reward += coef,
                        None => {
                            return Err(Error::Unsupported(format!(
                                "objective references boolean '{}' which is not a presence literal",
                                model.bool_vars[var.0]
                            )))
                        }
                    },
                    Term::Int(var) => match roles[var.0] {
                        VarRole::Free => int_coefs[var.0] += coef,
                        VarRole::MaxTarget(m) => max_eqs[m].coef += coef,
                        VarRole::Start(_) | VarRole::End(_) => {
                            return Err(Error::Unsupported(format!(
                                "objective references interval bound '{}'",
                                model.int_vars[var.0].name
                            )))
                        }
                    },
                }
            }
        }

        for (index, coef) in int_coefs.iter().enumerate() {
            if *coef != 0 {
                let domain = model.int_vars[index].domain;
                let value = if *coef > 0 { domain.lb() } else { domain.ub() };
                constant = constant.saturating_add(coef.saturating_mul(value));
            }
        }

        Ok(Self {
            tasks,
            groups,
            amo_count,
            max_eqs,
            roles,
            presence_of,
            int_coefs,
            constant,
        })
    }
}

fn claim(roles: &mut [VarRole], var: usize, role: VarRole, model: &CpModel) -> Result<()> {
    if roles[var] != VarRole::Free {
        return Err(Error::Unsupported(format!(
            "integer variable '{}' is bound to more than one interval or constraint",
            model.int_vars[var].name
        )));
    }
    roles[var] = role;
    Ok(())
}

struct Undo {
    frontier: Option<i64>,
    max_values: Vec<(usize, Option<i64>)>,
}

struct Search<'a> {
    problem: &'a Problem,
    limits: SearchLimits,
    stats: SolverStatistics,
    frontier: Vec<Option<i64>>,
    starts: Vec<Option<i64>>,
    amo_used: Vec<bool>,
    max_values: Vec<Option<i64>>,
    reward: i64,
    mandatory_left: usize,
    incumbent: Option<(i64, Vec<Option<i64>>)>,
    aborted: Option<String>,
}

impl<'a> Search<'a> {
    fn new(problem: &'a Problem, limits: SearchLimits) -> Self {
        Self {
            problem,
            limits,
            stats: SolverStatistics::default(),
            frontier: vec![None; problem.groups.len()],
            starts: vec![None; problem.tasks.len()],
            amo_used: vec![false; problem.amo_count],
            max_values: vec![None; problem.max_eqs.len()],
            reward: 0,
            mandatory_left: problem.tasks.iter().filter(|t| t.mandatory).count(),
            incumbent: None,
            aborted: None,
        }
    }

    fn dfs(&mut self, group: usize, depth: u64) {
        self.stats.on_node_explored();
        self.stats.on_depth_update(depth);
        self.limits.on_step();
        if let Some(reason) = self.limits.exceeded() {
            self.aborted = Some(reason);
            return;
        }

        let Some(bound) = self.lower_bound(group) else {
            return;
        };
        if let Some((best, _)) = &self.incumbent {
            if bound >= *best {
                self.stats.on_pruning_bound();
                return;
            }
        }

        if self.is_complete() {
            let objective = self.objective();
            if self.incumbent.as_ref().map_or(true, |(best, _)| objective < *best) {
                self.stats.on_solution_found();
                debug!("New incumbent with objective {} at depth {}", objective, depth);
                self.incumbent = Some((objective, self.starts.clone()));
            }
        }

        for (task, start) in self.candidates(group) {
            if self.aborted.is_some() {
                return;
            }
            self.stats.on_decision_generated();
            let next_group = self.problem.tasks[task].group;
            let undo = self.place(task, start);
            self.dfs(next_group, depth + 1);
            self.unplace(task, undo);
        }
    }

    fn earliest_start(&self, task: usize) -> i64 {
        let t = &self.problem.tasks[task];
        match self.frontier[t.group] {
            Some(end) => end.max(t.est),
            None => t.est,
        }
    }

    fn placeable(&self, task: usize, group: usize) -> Option<i64> {
        let t = &self.problem.tasks[task];
        if self.starts[task].is_some() || t.group < group {
            return None;
        }
        if t.amo.iter().any(|&a| self.amo_used[a]) {
            return None;
        }
        let start = self.earliest_start(task);
        if start > t.lst {
            return None;
        }
        let end = start.saturating_add(t.size);
        if t.max_eqs.iter().any(|&m| end > self.problem.max_eqs[m].ub) {
            return None;
        }
        Some(start)
    }

    fn candidates(&self, group: usize) -> Vec<(usize, i64)> {
        let mut candidates: Vec<(usize, i64)> = self.problem.groups[group..]
            .iter()
            .flatten()
            .filter_map(|&task| self.placeable(task, group).map(|start| (task, start)))
            .collect();
        candidates.sort_by_key(|&(task, start)| {
            let t = &self.problem.tasks[task];
            (start + t.size, t.reward, task)
        });
        candidates
    }

    /// Optimistic objective over every completion of the current node, `None`
    /// when a mandatory interval can no longer be placed.
    fn lower_bound(&self, group: usize) -> Option<i64> {
        let mut bound = self.problem.constant.saturating_add(self.reward);
        for (m, eq) in self.problem.max_eqs.iter().enumerate() {
            let value = if eq.coef >= 0 {
                self.max_values[m].unwrap_or(eq.lb)
            } else {
                eq.ub
            };
            bound = bound.saturating_add(eq.coef.saturating_mul(value));
        }

        let mut best_per_amo: Vec<i64> = vec![0; self.problem.amo_count];
        for (task, t) in self.problem.tasks.iter().enumerate() {
            if self.starts[task].is_some() {
                continue;
            }
            let open = self.placeable(task, group).is_some();
            if t.mandatory && !open {
                return None;
            }
            if !open || t.reward >= 0 {
                continue;
            }
            match t.amo.first() {
                Some(&a) => best_per_amo[a] = best_per_amo[a].min(t.reward),
                None => bound = bound.saturating_add(t.reward),
            }
        }
        Some(bound.saturating_add(best_per_amo.iter().sum::<i64>()))
    }

    fn is_complete(&self) -> bool {
        self.mandatory_left == 0
            && self
                .problem
                .max_eqs
                .iter()
                .zip(&self.max_values)
                .all(|(eq, value)| value.map_or(true, |v| v >= eq.lb))
    }

    fn objective(&self) -> i64 {
        let mut objective = self.problem.constant.saturating_add(self.reward);
        for (eq, value) in self.problem.max_eqs.iter().zip(&self.max_values) {
            objective = objective.saturating_add(eq.coef.saturating_mul(value.unwrap_or(eq.lb)));
        }
        objective
    }

    fn place(&mut self, task: usize, start: i64) -> Undo {
        let t = &self.problem.tasks[task];
        let end = start + t.size;
        let undo = Undo {
            frontier: self.frontier[t.group],
            max_values: t.max_eqs.iter().map(|&m| (m, self.max_values[m])).collect(),
        };

        self.starts[task] = Some(start);
        self.frontier[t.group] = Some(end);
        for &a in &t.amo {
            self.amo_used[a] = true;
        }
        for &m in &t.max_eqs {
            self.max_values[m] = Some(self.max_values[m].map_or(end, |v| v.max(end)));
        }
        self.reward += t.reward;
        if t.mandatory {
            self.mandatory_left -= 1;
        }
        undo
    }

    fn unplace(&mut self, task: usize, undo: Undo) {
        let t = &self.problem.tasks[task];
        self.starts[task] = None;
        self.frontier[t.group] = undo.frontier;
        for &a in &t.amo {
            self.amo_used[a] = false;
        }
        for (m, value) in undo.max_values {
            self.max_values[m] = value;
        }
        self.reward -= t.reward;
        if t.mandatory {
            self.mandatory_left += 1;
        }
    }

    fn into_response(mut self, model: &CpModel) -> CpSolverResponse {
        self.stats.time_total = self.limits.elapsed();
        let (status, termination) = match (&self.aborted, &self.incumbent) {
            (Some(reason), Some(_)) => (
                SolverStatus::Feasible,
                TerminationReason::Aborted(reason.clone()),
            ),
            (Some(reason), None) => (
                SolverStatus::Unknown,
                TerminationReason::Aborted(reason.clone()),
            ),
            (None, Some(_)) => (SolverStatus::Optimal, TerminationReason::Exhausted),
            (None, None) => (SolverStatus::Infeasible, TerminationReason::Exhausted),
        };

        let Some((objective, starts)) = self.incumbent.take() else {
            return CpSolverResponse::without_solution(status, termination, self.stats);
        };

        let problem = self.problem;
        let mut max_values: Vec<Option<i64>> = vec![None; problem.max_eqs.len()];
        for (task, start) in starts.iter().enumerate() {
            if let Some(start) = start {
                let end = start + problem.tasks[task].size;
                for &m in &problem.tasks[task].max_eqs {
                    max_values[m] = Some(max_values[m].map_or(end, |v| v.max(end)));
                }
            }
        }

        let int_values = problem
            .roles
            .iter()
            .enumerate()
            .map(|(var, role)| {
                let domain = model.int_vars[var].domain;
                match *role {
                    VarRole::Start(task) => starts[task].unwrap_or(domain.lb()),
                    VarRole::End(task) => starts[task]
                        .map(|s| s + problem.tasks[task].size)
                        .unwrap_or(domain.lb()),
                    VarRole::MaxTarget(m) => max_values[m].unwrap_or(problem.max_eqs[m].lb),
                    VarRole::Free if problem.int_coefs[var] < 0 => domain.ub(),
                    VarRole::Free => domain.lb(),
                }
            })
            .collect();
        let bool_values = problem
            .presence_of
            .iter()
            .map(|task| task.is_some_and(|task| starts[task].is_some()))
            .collect();

        CpSolverResponse {
            status,
            objective_value: Some(objective),
            termination,
            statistics: self.stats,
            int_values,
            bool_values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CpModelBuilder, LinearExpr};
    use crate::types::{BoolVar, Domain, IntVar, IntervalVar};
    use proptest::prelude::*;

    struct Job {
        start: IntVar,
        end: IntVar,
        present: BoolVar,
        interval: IntervalVar,
    }

    fn optional_job(b: &mut CpModelBuilder, lo: i64, hi: i64, size: i64, name: &str) -> Job {
        let start = b.new_int_var(Domain::new(lo, hi - size).unwrap(), format!("{name}_start"));
        let end = b.new_int_var(Domain::new(lo + size, hi).unwrap(), format!("{name}_end"));
        let present = b.new_bool_var(format!("{name}_present"));
        let interval = b
            .new_optional_interval_var(start, size, end, present, name)
            .unwrap();
        Job {
            start,
            end,
            present,
            interval,
        }
    }

    fn solve(model: &CpModel) -> CpSolverResponse {
        BranchAndBound.solve(model, &SolverParams::default()).unwrap()
    }

    #[test]
    fn test_single_job_is_left_justified() {
        let mut b = CpModelBuilder::new();
        let job = optional_job(&mut b, 10, 70, 50, "a");
        let makespan = b.new_int_var(Domain::new(0, 100).unwrap(), "makespan");
        b.add_no_overlap([job.interval]).unwrap();
        b.add_max_equality(makespan, [job.interval]).unwrap();
        b.minimize(LinearExpr::new().add_int(makespan, 1).add_bool(job.present, -101))
            .unwrap();

        let response = solve(&b.build());
        assert_eq!(response.status, SolverStatus::Optimal);
        assert_eq!(response.bool_value(job.present), Some(true));
        assert_eq!(response.value(job.start), Some(10));
        assert_eq!(response.value(job.end), Some(60));
        assert_eq!(response.value(makespan), Some(60));
        assert_eq!(response.objective_value, Some(60 - 101));
    }

    #[test]
    fn test_overlapping_jobs_keep_only_one() {
        let mut b = CpModelBuilder::new();
        let a = optional_job(&mut b, 0, 60, 40, "a");
        let c = optional_job(&mut b, 0, 60, 30, "c");
        let makespan = b.new_int_var(Domain::new(0, 60).unwrap(), "makespan");
        b.add_no_overlap([a.interval, c.interval]).unwrap();
        b.add_max_equality(makespan, [a.interval, c.interval]).unwrap();
        b.minimize(
            LinearExpr::new()
                .add_int(makespan, 1)
                .add_bool(a.present, -61)
                .add_bool(c.present, -61),
        )
        .unwrap();

        let response = solve(&b.build());
        assert_eq!(response.status, SolverStatus::Optimal);
        let scheduled = [a.present, c.present]
            .iter()
            .filter(|p| response.bool_value(**p) == Some(true))
            .count();
        assert_eq!(scheduled, 1);
        // The shorter job wins on makespan.
        assert_eq!(response.bool_value(c.present), Some(true));
        assert_eq!(response.value(makespan), Some(30));
    }

    #[test]
    fn test_ordering_search_finds_both_jobs() {
        let mut b = CpModelBuilder::new();
        let flexible = optional_job(&mut b, 0, 110, 10, "flexible");
        let pinned = optional_job(&mut b, 5, 15, 10, "pinned");
        let makespan = b.new_int_var(Domain::new(0, 200).unwrap(), "makespan");
        b.add_no_overlap([flexible.interval, pinned.interval]).unwrap();
        b.add_max_equality(makespan, [flexible.interval, pinned.interval])
            .unwrap();
        b.minimize(
            LinearExpr::new()
                .add_int(makespan, 1)
                .add_bool(flexible.present, -201)
                .add_bool(pinned.present, -201),
        )
        .unwrap();

        let response = solve(&b.build());
        assert_eq!(response.status, SolverStatus::Optimal);
        assert_eq!(response.value(pinned.start), Some(5));
        assert_eq!(response.value(flexible.start), Some(15));
        assert_eq!(response.value(makespan), Some(25));
    }

    #[test]
    fn test_at_most_one_across_sequences() {
        let mut b = CpModelBuilder::new();
        let on_first = optional_job(&mut b, 0, 50, 20, "first");
        let on_second = optional_job(&mut b, 0, 50, 20, "second");
        b.add_no_overlap([on_first.interval]).unwrap();
        b.add_no_overlap([on_second.interval]).unwrap();
        b.add_at_most_one([on_first.present, on_second.present])
            .unwrap();
        b.minimize(
            LinearExpr::new()
                .add_bool(on_first.present, -1)
                .add_bool(on_second.present, -1),
        )
        .unwrap();

        let response = solve(&b.build());
        assert_eq!(response.status, SolverStatus::Optimal);
        assert_eq!(response.objective_value, Some(-1));
        let both = response.bool_value(on_first.present) == Some(true)
            && response.bool_value(on_second.present) == Some(true);
        assert!(!both);
    }

    #[test]
    fn test_mandatory_jobs_that_cannot_fit_are_infeasible() {
        let mut b = CpModelBuilder::new();
        let s1 = b.new_int_var(Domain::new(0, 10).unwrap(), "s1");
        let e1 = b.new_int_var(Domain::new(0, 20).unwrap(), "e1");
        let s2 = b.new_int_var(Domain::new(0, 10).unwrap(), "s2");
        let e2 = b.new_int_var(Domain::new(0, 20).unwrap(), "e2");
        let i1 = b.new_interval_var(s1, 15, e1, "i1").unwrap();
        let i2 = b.new_interval_var(s2, 15, e2, "i2").unwrap();
        b.add_no_overlap([i1, i2]).unwrap();

        let response = solve(&b.build());
        assert_eq!(response.status, SolverStatus::Infeasible);
        assert_eq!(response.termination, TerminationReason::Exhausted);
        assert!(response.value(s1).is_none());
    }

    #[test]
    fn test_empty_model_is_trivially_optimal() {
        let response = solve(&CpModelBuilder::new().build());
        assert_eq!(response.status, SolverStatus::Optimal);
        assert_eq!(response.objective_value, Some(0));
    }

    #[test]
    fn test_max_equality_without_present_intervals_takes_lower_bound() {
        let mut b = CpModelBuilder::new();
        let job = optional_job(&mut b, 0, 10, 5, "a");
        let makespan = b.new_int_var(Domain::new(0, 10).unwrap(), "makespan");
        b.add_max_equality(makespan, [job.interval]).unwrap();
        b.minimize(LinearExpr::new().add_int(makespan, 1)).unwrap();

        let response = solve(&b.build());
        assert_eq!(response.status, SolverStatus::Optimal);
        assert_eq!(response.bool_value(job.present), Some(false));
        assert_eq!(response.value(makespan), Some(0));
    }

    #[test]
    fn test_node_limit_never_claims_infeasibility() {
        let mut b = CpModelBuilder::new();
        let mut objective = LinearExpr::new();
        let mut intervals = Vec::new();
        for i in 0..8 {
            let job = optional_job(&mut b, 0, 200, 10 + i, &format!("j{i}"));
            objective = objective.add_bool(job.present, -1000);
            intervals.push(job.interval);
        }
        let makespan = b.new_int_var(Domain::new(0, 200).unwrap(), "makespan");
        b.add_no_overlap(intervals.clone()).unwrap();
        b.add_max_equality(makespan, intervals).unwrap();
        b.minimize(objective.add_int(makespan, 1)).unwrap();

        let model = b.build();
        let response = BranchAndBound
            .solve(&model, &SolverParams::default().with_max_nodes(4))
            .unwrap();
        assert!(matches!(
            response.status,
            SolverStatus::Feasible | SolverStatus::Unknown
        ));
        assert!(matches!(response.termination, TerminationReason::Aborted(_)));
    }

    #[test]
    fn test_interval_in_two_sequences_is_unsupported() {
        let mut b = CpModelBuilder::new();
        let job = optional_job(&mut b, 0, 10, 5, "a");
        b.add_no_overlap([job.interval]).unwrap();
        b.add_no_overlap([job.interval]).unwrap();

        let err = BranchAndBound
            .solve(&b.build(), &SolverParams::default())
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_free_boolean_in_objective_is_unsupported() {
        let mut b = CpModelBuilder::new();
        let flag = b.new_bool_var("flag");
        b.minimize(LinearExpr::new().add_bool(flag, -1)).unwrap();

        let err = BranchAndBound
            .solve(&b.build(), &SolverParams::default())
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_free_integer_is_pushed_to_its_best_bound() {
        let mut b = CpModelBuilder::new();
        let x = b.new_int_var(Domain::new(-4, 9).unwrap(), "x");
        b.minimize(LinearExpr::new().add_int(x, -2).add_constant(3))
            .unwrap();

        let response = solve(&b.build());
        assert_eq!(response.value(x), Some(9));
        assert_eq!(response.objective_value, Some(3 - 18));
    }

    /// Smallest makespan of a left-justified sequence holding every job, or
    /// `None` when no order fits the windows.
    fn exhaustive_makespan(jobs: &[(i64, i64, i64)], used: &mut [bool], frontier: i64) -> Option<i64> {
        if used.iter().all(|u| *u) {
            return Some(frontier);
        }
        let mut best: Option<i64> = None;
        for i in 0..jobs.len() {
            if used[i] {
                continue;
            }
            let (lo, hi, size) = jobs[i];
            let start = frontier.max(lo);
            if start + size > hi {
                continue;
            }
            used[i] = true;
            if let Some(m) = exhaustive_makespan(jobs, used, start + size) {
                best = Some(best.map_or(m, |b| b.min(m)));
            }
            used[i] = false;
        }
        best
    }

    /// Optimum over every subset of jobs with distinct targets.
    fn exhaustive_optimum(jobs: &[(usize, usize, i64, i64, i64, i64)]) -> i64 {
        let mut best = i64::MAX;
        for mask in 0u32..(1 << jobs.len()) {
            let chosen: Vec<_> = (0..jobs.len()).filter(|i| mask & (1 << i) != 0).collect();
            let mut targets: Vec<usize> = chosen.iter().map(|&i| jobs[i].1).collect();
            targets.sort_unstable();
            targets.dedup();
            if targets.len() != chosen.len() {
                continue;
            }

            let mut objective: i64 = chosen.iter().map(|&i| -jobs[i].5).sum();
            let mut feasible = true;
            for group in 0..2 {
                let members: Vec<(i64, i64, i64)> = chosen
                    .iter()
                    .filter(|&&i| jobs[i].0 == group)
                    .map(|&i| (jobs[i].2, jobs[i].3, jobs[i].4))
                    .collect();
                match exhaustive_makespan(&members, &mut vec![false; members.len()], 0) {
                    Some(makespan) => objective += makespan,
                    None => feasible = false,
                }
            }
            if feasible {
                best = best.min(objective);
            }
        }
        best
    }

    proptest! {
        #[test]
        fn prop_objective_matches_exhaustive_search(
            specs in prop::collection::vec(
                (0usize..2, 0usize..3, 0i64..40, 1i64..25, 0i64..30, 1i64..300),
                1..7,
            )
        ) {
            let mut b = CpModelBuilder::new();
            let mut jobs = Vec::new();
            let mut built = Vec::new();
            for (i, (group, target, lo, size, slack, reward)) in specs.iter().enumerate() {
                let hi = lo + size + slack;
                built.push(optional_job(&mut b, *lo, hi, *size, &format!("j{i}")));
                jobs.push((*group, *target, *lo, hi, *size, *reward));
            }

            let mut objective = LinearExpr::new();
            for group in 0..2 {
                let members: Vec<IntervalVar> = jobs
                    .iter()
                    .zip(&built)
                    .filter(|(job, _)| job.0 == group)
                    .map(|(_, j)| j.interval)
                    .collect();
                let makespan = b.new_int_var(Domain::new(0, 200).unwrap(), format!("makespan{group}"));
                b.add_no_overlap(members.clone()).unwrap();
                b.add_max_equality(makespan, members).unwrap();
                objective = objective.add_int(makespan, 1);
            }
            for target in 0..3 {
                let literals: Vec<BoolVar> = jobs
                    .iter()
                    .zip(&built)
                    .filter(|(job, _)| job.1 == target)
                    .map(|(_, j)| j.present)
                    .collect();
                if !literals.is_empty() {
                    b.add_at_most_one(literals).unwrap();
                }
            }
            for (job, j) in jobs.iter().zip(&built) {
                objective = objective.add_bool(j.present, -job.5);
            }
            b.minimize(objective).unwrap();

            let response = solve(&b.build());
            prop_assert_eq!(response.status, SolverStatus::Optimal);
            prop_assert_eq!(response.objective_value, Some(exhaustive_optimum(&jobs)));
        }

        #[test]
        fn prop_solutions_respect_windows_and_sequences(
            jobs in prop::collection::vec((0i64..60, 1i64..30, 0i64..40), 1..6)
        ) {
            let mut b = CpModelBuilder::new();
            let mut built = Vec::new();
            let mut objective = LinearExpr::new();
            for (i, (lo, size, slack)) in jobs.iter().enumerate() {
                let hi = lo + size + slack;
                let job = optional_job(&mut b, *lo, hi, *size, &format!("j{i}"));
                objective = objective.add_bool(job.present, -500);
                built.push((job, *lo, hi, *size));
            }
            let intervals: Vec<_> = built.iter().map(|(j, ..)| j.interval).collect();
            let makespan = b.new_int_var(Domain::new(0, 200).unwrap(), "makespan");
            b.add_no_overlap(intervals.clone()).unwrap();
            b.add_max_equality(makespan, intervals).unwrap();
            b.minimize(objective.add_int(makespan, 1)).unwrap();

            let response = solve(&b.build());
            prop_assert_eq!(response.status, SolverStatus::Optimal);

            let mut placed = Vec::new();
            for (job, lo, hi, size) in &built {
                if response.bool_value(job.present) == Some(true) {
                    let start = response.value(job.start).unwrap();
                    let end = response.value(job.end).unwrap();
                    prop_assert_eq!(end - start, *size);
                    prop_assert!(start >= *lo && end <= *hi);
                    placed.push((start, end));
                }
            }
            placed.sort();
            for pair in placed.windows(2) {
                prop_assert!(pair[0].1 <= pair[1].0);
            }
            let latest = placed.iter().map(|p| p.1).max().unwrap_or(0);
            prop_assert_eq!(response.value(makespan), Some(latest));
            // At least one job always fits on its own.
            prop_assert!(!placed.is_empty());
        }
    }
}
