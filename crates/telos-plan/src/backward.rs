// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Backward (regression) search from the goal toward the initial situation.
//!
//! Search states are [`Constraint`]s; every regression step replaces the
//! atoms an action instance could have asserted with that instance's
//! preconditions. The resolver therefore returns operators last-first; use
//! [`BackwardProblem::execution_order`] to obtain the executable plan.
use std::sync::Arc;

use telos_logic::{Action, Constraint, Goal, LogicalInstance, Regression, Rule, Situation};
use telos_search::{Plan, SearchProblem};

use crate::heuristic::{widest_effect, Heuristic};

/// Regresses the goal until the initial situation verifies it.
#[derive(Debug, Clone)]
pub struct BackwardProblem {
    initial: Situation,
    actions: Vec<Arc<Action>>,
    goal: Goal,
    rules: Vec<Rule>,
    heuristic: Heuristic,
    widest: usize,
}

impl BackwardProblem {
    /// Binds a problem to the regression strategy.
    pub fn new(initial: Situation, actions: Vec<Arc<Action>>, goal: Goal) -> Self {
        let widest = widest_effect(&actions);
        Self {
            initial,
            actions,
            goal,
            rules: Vec::new(),
            heuristic: Heuristic::default(),
            widest,
        }
    }

    /// Adds coherence rules; constraints that necessarily violate one are
    /// pruned.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the remaining-cost estimate.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// The concrete situation regression must reach.
    pub fn initial(&self) -> &Situation {
        &self.initial
    }

    /// Turns a regression plan into executable instances, first action first.
    ///
    /// Parameters are resolved against the bindings under which the initial
    /// situation verifies the plan's terminal constraint.
    pub fn execution_order(&self, plan: &Plan<Constraint, Regression>) -> Vec<LogicalInstance> {
        let terminal = plan.terminal();
        let bindings = terminal
            .verification(&self.initial)
            .unwrap_or_else(|| terminal.codenotation().clone());
        plan.operators()
            .iter()
            .rev()
            .map(|r| r.instance().ground(&bindings))
            .collect()
    }
}

impl SearchProblem for BackwardProblem {
    type State = Constraint;
    type Operator = Regression;

    fn initial_state(&self) -> Constraint {
        Constraint::from_goal(&self.goal)
    }

    fn is_final(&self, state: &Constraint) -> bool {
        state.is_verified(&self.initial)
    }

    fn options(&self, state: &Constraint) -> Vec<Regression> {
        state.contributing_instances(&self.actions)
    }

    fn apply(&self, operator: &Regression, state: &Constraint) -> Constraint {
        state.revert_action(operator)
    }

    fn is_valid(&self, state: &Constraint) -> bool {
        state.is_coherent(&self.rules)
    }

    fn evaluate_state(&self, state: &Constraint) -> f64 {
        self.heuristic
            .scale(state.evaluate_completion(&self.initial), self.widest)
    }

    fn evaluate_operator(&self, _operator: &Regression) -> f64 {
        1.0
    }
}
