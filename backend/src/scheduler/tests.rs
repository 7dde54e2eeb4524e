//! Model builder, solver adapter and reporter exercised together on
//! hand-written windows.

use std::collections::BTreeSet;

use interval_cp::{BranchAndBound, Constraint, SolverParams, SolverStatus};

use crate::models::{Horizon, ModifiedJulianDate, TargetId, TelescopeId, Window};
use crate::scheduler::*;
use crate::services::windows::AcceptedWindow;

fn horizon(len: i64) -> Horizon {
    Horizon::new(ModifiedJulianDate::new(60000.0), len)
}

fn accepted(telescope: i64, target: i64, window: (i64, i64), duration: i64) -> AcceptedWindow {
    AcceptedWindow {
        telescope: TelescopeId(telescope),
        target: TargetId(target),
        run: 0,
        window: Window::new(window.0, window.1),
        duration,
        priority: 0.0,
    }
}

fn solve_all(candidates: &[AcceptedWindow], len: i64) -> (SolveResult, Vec<ScheduledObservation>) {
    let model = build_model(candidates, &horizon(len)).expect("model builds");
    let result = solve(&model, &BranchAndBound, &SolverParams::default()).expect("solver runs");
    let rows = report(&result, candidates);
    (result, rows)
}

fn assert_no_overlap(rows: &[ScheduledObservation]) {
    for (i, a) in rows.iter().enumerate() {
        for b in &rows[i + 1..] {
            if a.telescope == b.telescope {
                assert!(
                    a.end <= b.start || b.end <= a.start,
                    "{a:?} overlaps {b:?}"
                );
            }
        }
    }
}

#[test]
fn test_single_window_is_scheduled_at_its_start() {
    let candidates = [accepted(1, 1, (10, 70), 50)];
    let (result, rows) = solve_all(&candidates, 720);

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(rows.len(), 1);
    let row = rows[0];
    assert!((10..=20).contains(&row.start));
    assert_eq!(row.end, row.start + 50);
    assert_eq!(result.makespans[&TelescopeId(1)], row.end);
    assert_eq!(row.start, 10);
}

#[test]
fn test_conflicting_windows_keep_one_observation() {
    let candidates = [accepted(1, 1, (0, 60), 40), accepted(1, 2, (0, 60), 40)];
    let (result, rows) = solve_all(&candidates, 720);

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].start, 0);
}

fn with_priority(candidate: AcceptedWindow, priority: f64) -> AcceptedWindow {
    AcceptedWindow {
        priority,
        ..candidate
    }
}

#[test]
fn test_priority_breaks_ties_between_conflicting_windows() {
    let candidates = [
        with_priority(accepted(1, 1, (0, 60), 40), 2.0),
        with_priority(accepted(1, 2, (0, 60), 40), 7.5),
    ];
    let (result, rows) = solve_all(&candidates, 720);

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target, TargetId(2));

    let swapped = [
        with_priority(accepted(1, 1, (0, 60), 40), 7.5),
        with_priority(accepted(1, 2, (0, 60), 40), 2.0),
    ];
    let (_, rows) = solve_all(&swapped, 720);
    assert_eq!(rows[0].target, TargetId(1));
}

#[test]
fn test_priority_never_costs_an_observation() {
    // The favourite fills the whole window; the two others fit side by side.
    let candidates = [
        with_priority(accepted(1, 1, (0, 60), 60), 9.0),
        accepted(1, 2, (0, 60), 30),
        accepted(1, 3, (0, 60), 30),
    ];
    let (_, rows) = solve_all(&candidates, 720);

    let targets: Vec<TargetId> = rows.iter().map(|r| r.target).collect();
    assert_eq!(targets, vec![TargetId(2), TargetId(3)]);
}

#[test]
fn test_priority_does_not_outweigh_makespan() {
    // Same count either way; the shorter observation ends earlier.
    let candidates = [
        with_priority(accepted(1, 1, (0, 100), 50), 9.0),
        accepted(1, 2, (0, 100), 30),
    ];
    let model = build_model_with_scope(&candidates, &horizon(720), ExclusivityScope::Global)
        .unwrap();
    let result = solve(&model, &BranchAndBound, &SolverParams::default()).unwrap();
    let rows = report(&result, &candidates);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target, TargetId(2));
    assert_eq!(model.priority_scale(), 2);
}

#[test]
fn test_sequencing_fits_both_observations() {
    let candidates = [accepted(1, 1, (0, 100), 40), accepted(1, 2, (20, 100), 40)];
    let (_, rows) = solve_all(&candidates, 720);

    assert_eq!(rows.len(), 2);
    assert_no_overlap(&rows);
    // Makespan minimization packs both to the left.
    assert_eq!(rows.iter().map(|r| r.end).max(), Some(80));
}

#[test]
fn test_target_scheduled_on_one_telescope_only() {
    let candidates = [accepted(1, 5, (0, 100), 30), accepted(2, 5, (0, 100), 30)];
    let (result, rows) = solve_all(&candidates, 720);

    assert_eq!(result.scheduled(), 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target, TargetId(5));
}

#[test]
fn test_global_exclusivity_keeps_a_single_observation() {
    let candidates = [accepted(1, 1, (0, 100), 30), accepted(2, 2, (0, 100), 30)];

    let per_target = build_model(&candidates, &horizon(720)).unwrap();
    let result = solve(&per_target, &BranchAndBound, &SolverParams::default()).unwrap();
    assert_eq!(result.scheduled(), 2);

    let global =
        build_model_with_scope(&candidates, &horizon(720), ExclusivityScope::Global).unwrap();
    let result = solve(&global, &BranchAndBound, &SolverParams::default()).unwrap();
    assert_eq!(result.scheduled(), 1);
}

#[test]
fn test_rows_are_ordered_by_telescope_then_target() {
    let candidates = [
        accepted(2, 9, (0, 300), 20),
        accepted(1, 7, (0, 300), 20),
        accepted(1, 3, (0, 300), 20),
        accepted(2, 4, (0, 300), 20),
    ];
    let (_, rows) = solve_all(&candidates, 720);

    let keys: Vec<(i64, i64)> = rows.iter().map(|r| (r.telescope.0, r.target.0)).collect();
    assert_eq!(keys, vec![(1, 3), (1, 7), (2, 4), (2, 9)]);
    assert_no_overlap(&rows);
}

#[test]
fn test_selected_intervals_stay_inside_their_windows() {
    let candidates = [
        accepted(1, 1, (5, 50), 20),
        accepted(1, 2, (10, 45), 15),
        accepted(1, 3, (30, 90), 25),
        accepted(2, 2, (0, 40), 15),
        accepted(2, 4, (0, 40), 30),
    ];
    let (result, rows) = solve_all(&candidates, 120);

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_no_overlap(&rows);
    for row in &rows {
        let window = candidates
            .iter()
            .find(|c| c.telescope == row.telescope && c.target == row.target)
            .unwrap()
            .window;
        assert!(window.start <= row.start && row.end <= window.end);
        assert_eq!(row.end - row.start, row.duration);
    }
    let targets: BTreeSet<TargetId> = rows.iter().map(|r| r.target).collect();
    assert_eq!(targets.len(), rows.len());
}

#[test]
fn test_solving_twice_gives_the_same_schedule() {
    let candidates = [
        accepted(1, 1, (0, 100), 30),
        accepted(1, 2, (0, 100), 30),
        accepted(1, 3, (0, 100), 30),
        accepted(1, 4, (0, 100), 30),
    ];
    let model = build_model(&candidates, &horizon(720)).unwrap();
    let first = solve(&model, &BranchAndBound, &SolverParams::default()).unwrap();
    let second = solve(&model, &BranchAndBound, &SolverParams::default()).unwrap();

    assert_eq!(first.assignments, second.assignments);
    assert_eq!(first.objective, second.objective);
    assert_eq!(first.scheduled(), 3);
}

#[test]
fn test_empty_model_is_trivially_feasible() {
    let (result, rows) = solve_all(&[], 720);
    assert!(result.has_solution());
    assert!(rows.is_empty());
    assert!(result.makespans.is_empty());
}

#[test]
fn test_model_layout() {
    let candidates = [
        accepted(1, 1, (0, 100), 30),
        accepted(1, 2, (0, 100), 30),
        accepted(2, 1, (0, 100), 30),
    ];
    let model = build_model(&candidates, &horizon(100)).unwrap();

    assert_eq!(model.assignments().len(), 3);
    assert_eq!(model.makespans().len(), 2);
    // 100 steps, 2 telescopes
    assert_eq!(model.selection_weight(), 201);

    let cp = model.cp_model();
    assert_eq!(cp.num_intervals(), 3);
    let count = |pred: fn(&Constraint) -> bool| cp.constraints().iter().filter(|c| pred(c)).count();
    assert_eq!(count(|c| matches!(c, Constraint::NoOverlap(_))), 2);
    assert_eq!(count(|c| matches!(c, Constraint::MaxEquality { .. })), 2);
    assert_eq!(count(|c| matches!(c, Constraint::AtMostOne(_))), 2);

    let key = AssignmentKey {
        telescope: TelescopeId(1),
        target: TargetId(2),
        run: 0,
    };
    let assignment = model.assignments()[&key];
    assert_eq!(cp.domain(assignment.start).lb(), 0);
    assert_eq!(cp.domain(assignment.start).ub(), 70);
    assert_eq!(cp.domain(assignment.end).lb(), 30);
    assert_eq!(cp.domain(assignment.end).ub(), 100);
}

#[test]
fn test_invalid_windows_are_rejected() {
    let h = horizon(100);

    let inverted = AcceptedWindow {
        window: Window { start: 50, end: 40 },
        ..accepted(1, 1, (0, 0), 5)
    };
    assert!(matches!(
        build_model(&[inverted], &h),
        Err(ModelError::InvertedWindow { .. })
    ));

    assert!(matches!(
        build_model(&[accepted(1, 1, (0, 20), 30)], &h),
        Err(ModelError::WindowTooShort { duration: 30, .. })
    ));

    assert!(matches!(
        build_model(&[accepted(1, 1, (50, 120), 30)], &h),
        Err(ModelError::OutsideHorizon { horizon_len: 100, .. })
    ));

    let twice = accepted(1, 1, (0, 50), 30);
    assert!(matches!(
        build_model(&[twice, twice], &h),
        Err(ModelError::DuplicateAssignment(_))
    ));
}

#[test]
fn test_node_limit_never_reports_infeasible() {
    let candidates: Vec<AcceptedWindow> =
        (0..8).map(|t| accepted(1, t, (0, 400), 30 + t)).collect();
    let model = build_model(&candidates, &horizon(720)).unwrap();
    let params = SolverParams::default().with_max_nodes(3);

    let result = solve(&model, &BranchAndBound, &params).unwrap();
    assert!(matches!(
        result.status,
        SolverStatus::Feasible | SolverStatus::Unknown
    ));
    if !result.has_solution() {
        assert!(result.assignments.is_empty());
    }
}

#[test]
#[should_panic(expected = "has no accepted window")]
fn test_report_panics_on_foreign_result() {
    let (result, _) = solve_all(&[accepted(1, 1, (0, 60), 30)], 720);
    report(&result, &[]);
}

#[test]
fn test_text_report_lists_rows() {
    let candidates = [accepted(1, 1, (10, 70), 50)];
    let (result, rows) = solve_all(&candidates, 720);
    let report = ScheduleReport::new(&result, &rows, &horizon(720));

    let text = report.render_text();
    assert!(text.contains("Horizon: 720 steps from 2023-02-25 00:00 UTC"));
    assert!(text.contains("00:10  01:00"));
    assert!(text.contains("Status: Optimal"));

    // Ids are right-aligned under their headers.
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[1],
        "telescope   target  start    end   dur  from   to   "
    );
    assert_eq!(
        lines[2],
        "        1        1     10     60    50  00:10  01:00"
    );
    assert_eq!(lines[1].find("target").map(|i| i + 6), Some(18));

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["observations"][0]["start"], 10);
    assert_eq!(json["observations"][0]["telescope"], 1);
}
