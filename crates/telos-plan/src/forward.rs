// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Forward state-space search over situations.
use std::cell::Cell;
use std::sync::Arc;

use telos_logic::{Action, ContextArena, Goal, LogicalInstance, Rule, Situation};
use telos_search::SearchProblem;

use crate::heuristic::{count, widest_effect, Heuristic};

/// Progresses the initial situation until the goal holds.
#[derive(Debug)]
pub struct ForwardProblem {
    initial: Situation,
    actions: Vec<Arc<Action>>,
    goal: Goal,
    rules: Vec<Rule>,
    heuristic: Heuristic,
    widest: usize,
    contexts: Cell<ContextArena>,
}

impl ForwardProblem {
    /// Binds a problem to the forward strategy.
    pub fn new(initial: Situation, actions: Vec<Arc<Action>>, goal: Goal) -> Self {
        let widest = widest_effect(&actions);
        Self {
            initial,
            actions,
            goal,
            rules: Vec::new(),
            heuristic: Heuristic::default(),
            widest,
            contexts: Cell::new(ContextArena::new()),
        }
    }

    /// Adds coherence rules; incoherent situations are pruned.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the remaining-cost estimate.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// The goal being pursued.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }
}

impl SearchProblem for ForwardProblem {
    type State = Situation;
    type Operator = LogicalInstance;

    fn initial_state(&self) -> Situation {
        self.initial.clone()
    }

    fn is_final(&self, state: &Situation) -> bool {
        self.goal.is_satisfied_by(state)
    }

    fn options(&self, state: &Situation) -> Vec<LogicalInstance> {
        let mut arena = self.contexts.get();
        let options: Vec<LogicalInstance> = self
            .actions
            .iter()
            .flat_map(|action| state.groundings(action, arena.allocate()))
            .collect();
        self.contexts.set(arena);
        options
    }

    fn apply(&self, operator: &LogicalInstance, state: &Situation) -> Situation {
        state.apply(operator)
    }

    fn is_valid(&self, state: &Situation) -> bool {
        state.is_coherent(&self.rules)
    }

    fn evaluate_state(&self, state: &Situation) -> f64 {
        self.heuristic
            .scale(count(self.goal.unsatisfied_lower_bound(state)), self.widest)
    }

    fn evaluate_operator(&self, _operator: &LogicalInstance) -> f64 {
        1.0
    }
}
