// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
use std::collections::BTreeMap;

use telos_search::{
    CancelFlag, ConfigError, Outcome, Resolver, SearchConfig, SearchError, SearchProblem, TieBreak,
};

/// Weighted directed graph with a per-node estimate table.
struct Graph {
    edges: BTreeMap<&'static str, Vec<(&'static str, f64)>>,
    estimate: BTreeMap<&'static str, f64>,
    start: &'static str,
    goal: &'static str,
    forbidden: Vec<&'static str>,
}

impl Graph {
    fn new(start: &'static str, goal: &'static str, edges: &[(&'static str, &'static str, f64)]) -> Self {
        let mut table: BTreeMap<&'static str, Vec<(&'static str, f64)>> = BTreeMap::new();
        for &(from, to, cost) in edges {
            table.entry(from).or_default().push((to, cost));
        }
        Self {
            edges: table,
            estimate: BTreeMap::new(),
            start,
            goal,
            forbidden: Vec::new(),
        }
    }
}

impl SearchProblem for Graph {
    type State = &'static str;
    type Operator = (&'static str, &'static str, f64);

    fn initial_state(&self) -> Self::State {
        self.start
    }

    fn is_final(&self, state: &Self::State) -> bool {
        *state == self.goal
    }

    fn options(&self, state: &Self::State) -> Vec<Self::Operator> {
        self.edges
            .get(state)
            .map(|out| out.iter().map(|&(to, cost)| (*state, to, cost)).collect())
            .unwrap_or_default()
    }

    fn apply(&self, operator: &Self::Operator, _state: &Self::State) -> Self::State {
        operator.1
    }

    fn is_valid(&self, state: &Self::State) -> bool {
        !self.forbidden.contains(state)
    }

    fn evaluate_state(&self, state: &Self::State) -> f64 {
        self.estimate.get(state).copied().unwrap_or(0.0)
    }

    fn evaluate_operator(&self, operator: &Self::Operator) -> f64 {
        operator.2
    }
}

fn path(outcome: &Outcome<&'static str, (&'static str, &'static str, f64)>) -> Vec<&'static str> {
    outcome
        .operators()
        .unwrap()
        .iter()
        .map(|op| op.1)
        .collect()
}

#[test]
fn cheapest_path_wins_over_fewest_edges() {
    let graph = Graph::new(
        "s",
        "g",
        &[("s", "g", 10.0), ("s", "a", 1.0), ("a", "b", 1.0), ("b", "g", 1.0)],
    );
    let mut resolver = Resolver::new(&graph);
    let outcome = resolver.find_solution().unwrap();
    assert_eq!(path(&outcome), vec!["a", "b", "g"]);
    let plan = outcome.plan().unwrap();
    assert!((plan.cost() - 3.0).abs() < f64::EPSILON);
    assert_eq!(*plan.terminal(), "g");
    assert!(resolver.stats().expanded >= 3);
}

#[test]
fn admissible_estimate_keeps_plans_optimal() {
    let mut graph = Graph::new(
        "s",
        "g",
        &[("s", "a", 1.0), ("s", "b", 2.0), ("a", "g", 5.0), ("b", "g", 1.0)],
    );
    graph.estimate.insert("a", 1.0);
    graph.estimate.insert("b", 1.0);
    let outcome = Resolver::new(&graph).find_solution().unwrap();
    assert_eq!(path(&outcome), vec!["b", "g"]);
}

#[test]
fn final_root_is_already_satisfied() {
    let graph = Graph::new("g", "g", &[("g", "a", 1.0)]);
    let outcome = Resolver::new(&graph).find_solution().unwrap();
    assert_eq!(outcome, Outcome::AlreadySatisfied);
    assert_eq!(outcome.operators().map(<[_]>::len), Some(0));
    assert!(outcome.is_reachable());
}

#[test]
fn exhausted_frontier_is_unreachable() {
    let graph = Graph::new("s", "g", &[("s", "a", 1.0), ("a", "s", 1.0)]);
    let mut resolver = Resolver::new(&graph);
    let outcome = resolver.find_solution().unwrap();
    assert_eq!(outcome, Outcome::Unreachable);
    assert!(!outcome.is_reachable());
    assert_eq!(resolver.stats().expanded, 2);
    assert!(resolver.stats().pruned_closed >= 1);
}

#[test]
fn invalid_states_are_pruned() {
    let mut graph = Graph::new(
        "s",
        "g",
        &[("s", "a", 1.0), ("a", "g", 1.0), ("s", "b", 2.0), ("b", "g", 2.0)],
    );
    graph.forbidden.push("a");
    let mut resolver = Resolver::new(&graph);
    let outcome = resolver.find_solution().unwrap();
    assert_eq!(path(&outcome), vec!["b", "g"]);
    assert_eq!(resolver.stats().pruned_invalid, 1);

    graph.forbidden.push("s");
    assert_eq!(Resolver::new(&graph).find_solution().unwrap(), Outcome::Unreachable);
}

#[test]
fn tie_break_selects_among_equal_cost_paths() {
    let edges = [("s", "a", 1.0), ("s", "b", 1.0), ("a", "g", 1.0), ("b", "g", 1.0)];
    let graph = Graph::new("s", "g", &edges);
    let fifo = Resolver::new(&graph).find_solution().unwrap();
    assert_eq!(path(&fifo), vec!["a", "g"]);
    let lifo = Resolver::with_config(&graph, SearchConfig::new().with_tie_break(TieBreak::Lifo))
        .find_solution()
        .unwrap();
    assert_eq!(path(&lifo), vec!["b", "g"]);
}

#[test]
fn budget_stops_the_search() {
    let graph = Graph::new(
        "s",
        "g",
        &[("s", "a", 1.0), ("a", "b", 1.0), ("b", "c", 1.0), ("c", "g", 1.0)],
    );
    let err = Resolver::with_config(&graph, SearchConfig::new().with_max_expansions(2))
        .find_solution()
        .unwrap_err();
    assert_eq!(err, SearchError::BudgetExhausted { expanded: 2 });
}

#[test]
fn raised_flag_cancels_before_the_first_expansion() {
    let graph = Graph::new("s", "g", &[("s", "g", 1.0)]);
    let flag = CancelFlag::new();
    flag.cancel();
    let err = Resolver::new(&graph)
        .with_cancel(flag.clone())
        .find_solution()
        .unwrap_err();
    assert_eq!(err, SearchError::Cancelled { expanded: 0 });
    assert!(flag.is_cancelled());
}

#[test]
fn plans_render_one_numbered_operator_per_line() {
    struct Line(&'static str);
    impl std::fmt::Display for Line {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }
    let plan = telos_search::Plan::new(vec![Line("take(A)"), Line("stack(A, B)")], 2.0, ());
    assert_eq!(plan.to_string(), "  1. take(A)\n  2. stack(A, B)\n");
}

#[test]
fn config_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.json");
    std::fs::write(&path, br#"{"max_expansions": 500, "tie_break": "lifo"}"#).unwrap();
    let cfg = SearchConfig::load(&path).unwrap();
    assert_eq!(cfg.max_expansions, Some(500));
    assert_eq!(cfg.tie_break, TieBreak::Lifo);
    assert!(matches!(
        SearchConfig::load(dir.path().join("missing.json")),
        Err(ConfigError::NotFound)
    ));
}
