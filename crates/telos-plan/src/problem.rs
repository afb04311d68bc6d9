// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Problem construction and strategy dispatch.
use std::fmt;
use std::sync::Arc;

use telos_logic::{Action, Goal, LogicalInstance, Rule, Situation};
use telos_search::{CancelFlag, Outcome, Plan, Resolver, SearchConfig, SearchProblem, SearchStats};
use tracing::{debug, instrument};

use crate::backward::BackwardProblem;
use crate::error::PlanError;
use crate::forward::ForwardProblem;
use crate::heuristic::Heuristic;
use crate::pop::PartialOrderProblem;
use crate::state::SearchState;

/// How [`Problem::find_solution`] searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Progress situations from the initial one.
    #[default]
    Forward,
    /// Regress the goal toward the initial situation.
    Backward,
    /// Repair a partial-order plan.
    PartialOrder,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::PartialOrder => "partial-order",
        })
    }
}

/// A planning problem: initial situation, candidate actions, goal and
/// optional coherence rules.
#[derive(Debug, Clone)]
pub struct Problem {
    initial: Situation,
    actions: Vec<Arc<Action>>,
    goal: Goal,
    rules: Vec<Rule>,
    heuristic: Heuristic,
    config: SearchConfig,
    cancel: Option<CancelFlag>,
}

/// Outcome of [`Problem::find_solution`] with the counters of its run.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The verdict; operators are grounded instances in execution order.
    pub outcome: Outcome<SearchState, LogicalInstance>,
    /// Resolver counters.
    pub stats: SearchStats,
}

impl Problem {
    /// Builds a problem with no rules and default search settings.
    pub fn new(initial: Situation, actions: Vec<Arc<Action>>, goal: Goal) -> Self {
        Self {
            initial,
            actions,
            goal,
            rules: Vec::new(),
            heuristic: Heuristic::default(),
            config: SearchConfig::default(),
            cancel: None,
        }
    }

    /// Adds coherence rules.
    ///
    /// Forward search drops incoherent situations and backward search drops
    /// incoherent constraints. The partial-order strategy does not consult
    /// them: its skeletons carry no world state to check.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the remaining-cost estimate.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Replaces the resolver configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a cancellation flag.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The goal.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Searches with `strategy` and returns executable instances.
    #[instrument(skip(self), fields(goal = %self.goal))]
    pub fn find_solution(&self, strategy: Strategy) -> Result<Solution, PlanError> {
        let solution = match strategy {
            Strategy::Forward => {
                let problem = ForwardProblem::new(
                    self.initial.clone(),
                    self.actions.clone(),
                    self.goal.clone(),
                )
                .with_rules(self.rules.clone())
                .with_heuristic(self.heuristic);
                let (outcome, stats) = self.run(&problem)?;
                Solution {
                    outcome: map_plan(outcome, |plan| {
                        let cost = plan.cost();
                        let terminal = SearchState::Situation(plan.terminal().clone());
                        Plan::new(plan.into_operators(), cost, terminal)
                    }),
                    stats,
                }
            }
            Strategy::Backward => {
                let problem = BackwardProblem::new(
                    self.initial.clone(),
                    self.actions.clone(),
                    self.goal.clone(),
                )
                .with_rules(self.rules.clone())
                .with_heuristic(self.heuristic);
                let (outcome, stats) = self.run(&problem)?;
                Solution {
                    outcome: map_plan(outcome, |plan| {
                        Plan::new(
                            problem.execution_order(&plan),
                            plan.cost(),
                            SearchState::Constraint(plan.terminal().clone()),
                        )
                    }),
                    stats,
                }
            }
            Strategy::PartialOrder => {
                let problem =
                    PartialOrderProblem::new(self.initial.clone(), self.actions.clone(), &self.goal)?
                        .with_heuristic(self.heuristic);
                let (outcome, stats) = self.run(&problem)?;
                Solution {
                    outcome: map_plan(outcome, |plan| {
                        Plan::new(
                            problem.linearize(plan.terminal()),
                            plan.cost(),
                            SearchState::PlanSkeleton(plan.terminal().clone()),
                        )
                    }),
                    stats,
                }
            }
        };
        debug!(
            %strategy,
            reachable = solution.outcome.is_reachable(),
            length = solution.outcome.operators().map_or(0, <[_]>::len),
            expanded = solution.stats.expanded,
            "planning finished"
        );
        Ok(solution)
    }

    fn run<P: SearchProblem>(
        &self,
        problem: &P,
    ) -> Result<(Outcome<P::State, P::Operator>, SearchStats), PlanError> {
        let mut resolver = Resolver::with_config(problem, self.config);
        if let Some(cancel) = &self.cancel {
            resolver = resolver.with_cancel(cancel.clone());
        }
        let outcome = resolver.find_solution()?;
        Ok((outcome, resolver.stats()))
    }
}

fn map_plan<S, O>(
    outcome: Outcome<S, O>,
    convert: impl FnOnce(Plan<S, O>) -> Plan<SearchState, LogicalInstance>,
) -> Outcome<SearchState, LogicalInstance> {
    match outcome {
        Outcome::AlreadySatisfied => Outcome::AlreadySatisfied,
        Outcome::Unreachable => Outcome::Unreachable,
        Outcome::Solved(plan) => Outcome::Solved(convert(plan)),
    }
}
