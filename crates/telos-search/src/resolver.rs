// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Best-first (A*) resolver.
//!
//! Each frontier entry points at a node in an append-only arena; nodes
//! record their parent and the operator that produced them, so a plan is
//! recovered by walking parents back to the root. The final test runs when a
//! node is popped, never when it is generated, which keeps returned plans
//! optimal under an admissible estimate.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::outcome::{Outcome, Plan};
use crate::problem::SearchProblem;
use crate::stats::SearchStats;

/// Shared cooperative cancellation switch, checked before every expansion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag; every resolver holding a clone stops at its next pop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`CancelFlag::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
struct Node<S, O> {
    state: S,
    g: f64,
    parent: Option<usize>,
    via: Option<O>,
}

/// Drives a [`SearchProblem`] to a verdict.
#[derive(Debug)]
pub struct Resolver<'p, P: SearchProblem> {
    problem: &'p P,
    config: SearchConfig,
    cancel: Option<CancelFlag>,
    stats: SearchStats,
}

impl<'p, P: SearchProblem> Resolver<'p, P> {
    /// Resolver with the default configuration.
    pub fn new(problem: &'p P) -> Self {
        Self::with_config(problem, SearchConfig::default())
    }

    /// Resolver with an explicit configuration.
    pub fn with_config(problem: &'p P, config: SearchConfig) -> Self {
        Self {
            problem,
            config,
            cancel: None,
            stats: SearchStats::default(),
        }
    }

    /// Attaches a cancellation flag.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Counters from the most recent run.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Runs best-first search from the problem's initial state.
    ///
    /// Returns the cheapest operator path to a final state when the state
    /// estimate is admissible. Ties among equally promising entries follow
    /// [`SearchConfig::tie_break`].
    #[instrument(skip_all)]
    pub fn find_solution(&mut self) -> Result<Outcome<P::State, P::Operator>, SearchError> {
        self.stats = SearchStats::default();
        let problem = self.problem;
        let root = problem.initial_state();
        if !problem.is_valid(&root) {
            debug!("initial state rejected by the validity filter");
            return Ok(Outcome::Unreachable);
        }
        if problem.is_final(&root) {
            debug!("initial state already final");
            return Ok(Outcome::AlreadySatisfied);
        }

        let mut nodes: Vec<Node<P::State, P::Operator>> = Vec::new();
        let mut frontier = Frontier::new(self.config.tie_break);
        let mut best_open: FxHashMap<P::State, f64> = FxHashMap::default();
        let mut closed: FxHashMap<P::State, f64> = FxHashMap::default();

        let h = problem.evaluate_state(&root);
        best_open.insert(root.clone(), 0.0);
        nodes.push(Node {
            state: root,
            g: 0.0,
            parent: None,
            via: None,
        });
        frontier.push(h, h, 0);

        while let Some(index) = frontier.pop() {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                debug!(expanded = self.stats.expanded, "search cancelled");
                return Err(SearchError::Cancelled {
                    expanded: self.stats.expanded,
                });
            }
            let g = nodes[index].g;
            let state = nodes[index].state.clone();
            if closed.get(&state).is_some_and(|&seen| seen <= g) {
                self.stats.pruned_closed += 1;
                continue;
            }
            if problem.is_final(&state) {
                let plan = Self::reconstruct(&mut nodes, index);
                debug!(
                    length = plan.len(),
                    cost = plan.cost(),
                    expanded = self.stats.expanded,
                    generated = self.stats.generated,
                    "plan found"
                );
                return Ok(Outcome::Solved(plan));
            }
            if let Some(max) = self.config.max_expansions {
                if self.stats.expanded >= max {
                    debug!(expanded = self.stats.expanded, "expansion budget exhausted");
                    return Err(SearchError::BudgetExhausted {
                        expanded: self.stats.expanded,
                    });
                }
            }
            best_open.remove(&state);
            if closed.insert(state.clone(), g).is_some() {
                self.stats.reopened += 1;
            }
            self.stats.expanded += 1;

            for op in problem.options(&state) {
                let child = problem.apply(&op, &state);
                self.stats.generated += 1;
                if !problem.is_valid(&child) {
                    trace!(?op, "successor rejected by the validity filter");
                    self.stats.pruned_invalid += 1;
                    continue;
                }
                let child_g = g + problem.evaluate_operator(&op);
                let known = closed
                    .get(&child)
                    .into_iter()
                    .chain(best_open.get(&child))
                    .any(|&seen| seen <= child_g);
                if known {
                    self.stats.pruned_closed += 1;
                    continue;
                }
                let h = problem.evaluate_state(&child);
                best_open.insert(child.clone(), child_g);
                nodes.push(Node {
                    state: child,
                    g: child_g,
                    parent: Some(index),
                    via: Some(op),
                });
                frontier.push(child_g + h, h, nodes.len() - 1);
            }
        }

        debug!(
            expanded = self.stats.expanded,
            generated = self.stats.generated,
            "frontier exhausted"
        );
        Ok(Outcome::Unreachable)
    }

    fn reconstruct(
        nodes: &mut [Node<P::State, P::Operator>],
        goal: usize,
    ) -> Plan<P::State, P::Operator> {
        let cost = nodes[goal].g;
        let terminal = nodes[goal].state.clone();
        let mut operators = Vec::new();
        let mut cursor = Some(goal);
        while let Some(index) = cursor {
            let node = &mut nodes[index];
            if let Some(op) = node.via.take() {
                operators.push(op);
            }
            cursor = node.parent;
        }
        operators.reverse();
        Plan::new(operators, cost, terminal)
    }
}
