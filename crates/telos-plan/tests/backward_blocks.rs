// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
use telos_dry_tests::blocks::{
    a_on_b, all_actions, any_three_stacked, blocks_rules, self_stacked, three_blocks_on_table,
    three_blocks_on_table_goal,
};
use telos_dry_tests::replay;
use telos_logic::{atom, Goal, Situation};
use telos_plan::{render_plan, BackwardProblem, PlanError, Problem, Solution, StateKind, Strategy};
use telos_search::{Outcome, Resolver, SearchConfig, SearchError, SearchProblem};

fn regress(initial: &Situation, goal: &Goal, budget: u64) -> Result<Solution, PlanError> {
    Problem::new(initial.clone(), all_actions(), goal.clone())
        .with_rules(blocks_rules())
        .with_config(SearchConfig::new().with_max_expansions(budget))
        .find_solution(Strategy::Backward)
}

/// `A` in hand over a clear `B`; `C` clear on the table only when asked.
fn holding_a(with_c: bool) -> Situation {
    let mut atoms = vec![atom("holding", ["A"]), atom("clear", ["B"]), atom("onTable", ["B"])];
    if with_c {
        atoms.extend([atom("clear", ["C"]), atom("onTable", ["C"])]);
    }
    Situation::from_atoms(atoms)
}

/// `A` on `B`, plus some clear block resting on the table.
fn a_on_b_beside_a_free_block() -> Goal {
    Goal::new([atom("on", ["A", "B"]), atom("clear", ["?z"]), atom("onTable", ["?z"])])
}

#[test]
fn regression_yields_plans_in_execution_order() {
    let solution = Problem::new(three_blocks_on_table(), all_actions(), a_on_b())
        .with_rules(blocks_rules())
        .find_solution(Strategy::Backward)
        .unwrap();
    assert_eq!(
        render_plan(&solution.outcome),
        "  1. take(A)\n  2. stack(A, B)\n"
    );
    let plan = solution.outcome.plan().unwrap();
    assert!(plan.operators().iter().all(|i| i.is_ground()));
    assert_eq!(plan.terminal().kind(), StateKind::Constraint);
    assert!(plan
        .terminal()
        .as_constraint()
        .unwrap()
        .is_verified(&three_blocks_on_table()));
    replay(&three_blocks_on_table(), plan.operators(), &a_on_b()).unwrap();
}

#[test]
fn resolver_returns_regressions_last_first() {
    let problem = BackwardProblem::new(three_blocks_on_table(), all_actions(), a_on_b())
        .with_rules(blocks_rules());
    let outcome = Resolver::new(&problem).find_solution().unwrap();
    let plan = outcome.plan().unwrap();
    let raw: Vec<&str> = plan.operators().iter().map(|r| r.name()).collect();
    assert_eq!(raw, ["stack", "take"]);
    let executable: Vec<String> = problem
        .execution_order(plan)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(executable, ["take(A)", "stack(A, B)"]);
}

#[test]
fn verified_goal_is_already_satisfied() {
    let problem = BackwardProblem::new(
        three_blocks_on_table(),
        all_actions(),
        three_blocks_on_table_goal(),
    );
    assert!(problem.is_final(&problem.initial_state()));
    let outcome = Resolver::new(&problem).find_solution().unwrap();
    assert_eq!(outcome, Outcome::AlreadySatisfied);
}

#[test]
fn rules_prune_every_regression_of_an_impossible_goal() {
    let solution = Problem::new(three_blocks_on_table(), all_actions(), self_stacked())
        .with_rules(blocks_rules())
        .find_solution(Strategy::Backward)
        .unwrap();
    assert_eq!(solution.outcome, Outcome::Unreachable);
    assert!(solution.stats.pruned_invalid > 0);
}

#[test]
fn expansion_budget_surfaces_as_an_error() {
    let err = Problem::new(three_blocks_on_table(), all_actions(), a_on_b())
        .with_rules(blocks_rules())
        .with_config(SearchConfig::new().with_max_expansions(1))
        .find_solution(Strategy::Backward)
        .unwrap_err();
    assert_eq!(err, PlanError::Search(SearchError::BudgetExhausted { expanded: 1 }));
}

#[test]
fn regressing_a_on_b_offers_one_coherent_stack() {
    let problem = BackwardProblem::new(three_blocks_on_table(), all_actions(), a_on_b())
        .with_rules(blocks_rules());
    let root = problem.initial_state();
    let options = problem.options(&root);
    let names: Vec<String> = options.iter().map(ToString::to_string).collect();
    assert_eq!(names, ["stack(A, B)"]);
    let next = problem.apply(&options[0], &root);
    assert!(problem.is_valid(&next));
    assert_eq!(next.to_string(), "clear(B) ∧ holding(A)");
    assert!(!problem.is_final(&next));
}

#[test]
fn stacking_keeps_the_free_block_apart_from_the_covered_one() {
    let initial = holding_a(true);
    let goal = a_on_b_beside_a_free_block();
    let solution = regress(&initial, &goal, 1_000).unwrap();
    assert_eq!(render_plan(&solution.outcome), "  1. stack(A, B)\n");
    let end = replay(&initial, solution.outcome.operators().unwrap(), &goal).unwrap();
    assert!(!end.contains(&telos_logic::pred("clear", ["B"])));
}

#[test]
fn covered_block_never_serves_as_the_free_block() {
    // Forward search proves this unreachable; regression must not claim a plan.
    let initial = holding_a(false);
    let goal = a_on_b_beside_a_free_block();
    let forward = Problem::new(initial.clone(), all_actions(), goal.clone())
        .with_rules(blocks_rules())
        .find_solution(Strategy::Forward)
        .unwrap();
    assert_eq!(forward.outcome, Outcome::Unreachable);
    match regress(&initial, &goal, 500) {
        Ok(solution) => assert!(!matches!(solution.outcome, Outcome::Solved(_))),
        Err(err) => assert!(matches!(
            err,
            PlanError::Search(SearchError::BudgetExhausted { .. })
        )),
    }
}

#[test]
fn abstract_tower_is_built_from_distinct_blocks() {
    let solution = regress(&three_blocks_on_table(), &any_three_stacked(), 50_000).unwrap();
    let plan = solution.outcome.plan().unwrap();
    let names: Vec<&str> = plan.operators().iter().map(|i| i.name()).collect();
    assert_eq!(names, ["take", "stack", "take", "stack"]);
    replay(&three_blocks_on_table(), plan.operators(), &any_three_stacked()).unwrap();
}
