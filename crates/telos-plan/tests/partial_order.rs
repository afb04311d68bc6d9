// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
use std::sync::Arc;

use telos_dry_tests::blocks::{a_on_b, all_actions, blocks_rules, three_blocks_on_table};
use telos_dry_tests::lamp::{lamp_actions, lamp_on, used_and_off};
use telos_dry_tests::replay;
use telos_logic::{atom, Context, ContextId, Goal, LogicalInstance, Situation};
use telos_plan::pop::{PartialOrder, PartialOrderProblem, PlanSkeleton, Refinement, Step};
use telos_plan::{render_plan, Problem, StateKind, Strategy};
use telos_search::{Outcome, Resolver, SearchConfig, SearchProblem};

#[test]
fn blocks_plan_takes_then_stacks() {
    let solution = Problem::new(three_blocks_on_table(), all_actions(), a_on_b())
        .find_solution(Strategy::PartialOrder)
        .unwrap();
    assert_eq!(
        render_plan(&solution.outcome),
        "  1. take(A)\n  2. stack(A, B)\n"
    );
    let plan = solution.outcome.plan().unwrap();
    assert!((plan.cost() - 2.0).abs() < f64::EPSILON);
    assert_eq!(plan.terminal().kind(), StateKind::PlanSkeleton);
    let skeleton = plan.terminal().as_plan_skeleton().unwrap();
    assert!(skeleton.is_complete());
    assert!(skeleton.is_acyclic());
    assert!(skeleton.open_preconditions().is_empty());
    replay(&three_blocks_on_table(), plan.operators(), &a_on_b()).unwrap();
}

#[test]
fn lifted_goal_separates_the_lifted_block_from_its_target() {
    let goal = Goal::new([atom("on", ["?x", "B"])]);
    let problem = PartialOrderProblem::new(three_blocks_on_table(), all_actions(), &goal).unwrap();
    let mut resolver =
        Resolver::with_config(&problem, SearchConfig::new().with_max_expansions(5_000));
    let outcome = resolver.find_solution().unwrap();
    let plan = outcome.plan().unwrap();
    assert!(plan
        .operators()
        .iter()
        .any(|r| matches!(r, Refinement::Separate { .. })));
    let steps = problem.linearize(plan.terminal());
    let order: Vec<String> = steps.iter().map(ToString::to_string).collect();
    assert_eq!(order, ["take(A)", "stack(A, B)"]);
    replay(&three_blocks_on_table(), &steps, &goal).unwrap();
}

#[test]
fn threat_repair_orders_use_before_switching_off() {
    let problem = PartialOrderProblem::new(lamp_on(), lamp_actions(), &used_and_off()).unwrap();
    let outcome = Resolver::new(&problem).find_solution().unwrap();
    let plan = outcome.plan().unwrap();
    let skeleton = plan.terminal();
    let order: Vec<String> = problem
        .linearize(skeleton)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(order, ["use(L)", "flip_off(L)"]);
    replay(&lamp_on(), &problem.linearize(skeleton), &used_and_off()).unwrap();
    assert!(plan
        .operators()
        .iter()
        .any(|r| matches!(r, Refinement::Order(_))));
    let steps = skeleton.linearize();
    assert!(skeleton.precedes(&steps[0], &steps[1]));
    assert!(!skeleton.precedes(&steps[1], &steps[0]));
}

#[test]
fn empty_skeleton_frames_the_goal() {
    let skeleton = PlanSkeleton::new(&lamp_on(), &used_and_off()).unwrap();
    assert_eq!(skeleton.open_preconditions().len(), 2);
    assert!(skeleton.precedes(skeleton.start(), skeleton.finish()));
    assert!(!skeleton.can_order(skeleton.finish(), skeleton.start()));
    assert!(!skeleton.can_order(skeleton.start(), skeleton.start()));
    assert!(skeleton.threats().is_empty());
    assert!(skeleton.linearize().is_empty());
    assert!(!skeleton.is_complete());
    assert_eq!(skeleton.start().instance().name(), "start");
    assert_eq!(skeleton.finish().instance().name(), "finish");
}

#[test]
fn threats_are_repaired_before_open_preconditions() {
    let problem = PartialOrderProblem::new(lamp_on(), lamp_actions(), &used_and_off()).unwrap();
    let mut state = problem.initial_state();
    // Follow the only refinements until a threat appears.
    while state.threats().is_empty() {
        let options = problem.options(&state);
        assert!(!options.is_empty(), "stuck at\n{state}");
        let next = options
            .iter()
            .find(|r| matches!(r, Refinement::Link { .. }))
            .unwrap_or(&options[0]);
        state = problem.apply(next, &state);
        assert!(problem.is_valid(&state));
    }
    assert!(!state.open_preconditions().is_empty());
    let options = problem.options(&state);
    assert!(!options.is_empty());
    assert!(options.iter().all(|r| matches!(r, Refinement::Order(_))));
    for option in &options {
        assert!(problem.is_valid(&problem.apply(option, &state)));
    }
}

#[test]
fn goal_true_initially_is_already_satisfied() {
    let initial = Situation::from_atoms([atom("used", ["L"]), atom("off", ["L"])]);
    let solution = Problem::new(initial.clone(), lamp_actions(), used_and_off())
        .find_solution(Strategy::PartialOrder)
        .unwrap();
    assert_eq!(solution.outcome, Outcome::AlreadySatisfied);
    assert_eq!(render_plan(&solution.outcome), "(already satisfied)\n");
    assert_eq!(solution.stats.expanded, 0);
    let problem = PartialOrderProblem::new(initial, lamp_actions(), &used_and_off()).unwrap();
    assert!(problem.is_final(&problem.initial_state()));
}

#[test]
fn goals_already_true_are_linked_to_start() {
    let initial = Situation::from_atoms([atom("on", ["L"]), atom("used", ["L"])]);
    let solution = Problem::new(initial.clone(), lamp_actions(), used_and_off())
        .find_solution(Strategy::PartialOrder)
        .unwrap();
    assert_eq!(render_plan(&solution.outcome), "  1. flip_off(L)\n");
    let plan = solution.outcome.plan().unwrap();
    assert!((plan.cost() - 1.0).abs() < f64::EPSILON);
    let skeleton = plan.terminal().as_plan_skeleton().unwrap();
    assert!(skeleton
        .links()
        .any(|l| l.producer() == skeleton.start() && l.consumer() == skeleton.finish()));
    replay(&initial, plan.operators(), &used_and_off()).unwrap();
}

#[test]
fn rules_leave_partial_order_plans_unchanged() {
    let plain = Problem::new(three_blocks_on_table(), all_actions(), a_on_b());
    let ruled = plain.clone().with_rules(blocks_rules());
    let a = plain.find_solution(Strategy::PartialOrder).unwrap();
    let b = ruled.find_solution(Strategy::PartialOrder).unwrap();
    assert_eq!(a, b);
}

#[test]
fn missing_vocabulary_is_unreachable() {
    let goal = Goal::new([atom("broken", ["L"])]);
    let solution = Problem::new(lamp_on(), lamp_actions(), goal)
        .find_solution(Strategy::PartialOrder)
        .unwrap();
    assert_eq!(solution.outcome, Outcome::Unreachable);
}

#[test]
fn partial_orders_compare_structurally() {
    let step = |id: u32| {
        Step::new(LogicalInstance::new(
            Arc::clone(&lamp_actions()[0]),
            Context::new(ContextId(id)),
        ))
    };
    let a = PartialOrder::new(step(3), step(4));
    assert_eq!(a, PartialOrder::new(step(3), step(4)));
    assert_ne!(a, PartialOrder::new(step(4), step(3)));
    assert_eq!(a.first(), &step(3));
    assert_eq!(a.to_string(), "flip_off(?x) ≺ flip_off(?x)");
    let set: std::collections::BTreeSet<_> = [a.clone(), a].into_iter().collect();
    assert_eq!(set.len(), 1);
}
