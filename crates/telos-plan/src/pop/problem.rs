// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Plan repair as best-first search over partial plans.
//!
//! Each state is a [`PlanSkeleton`]. Only one flaw is refined per state: the
//! first threat if there is one, otherwise the oldest open precondition.
//! A threat is repaired by promotion, demotion or separation of the terms
//! that let it unify. Refinements that would close an ordering cycle are
//! never offered.
use std::fmt;
use std::sync::Arc;

use telos_logic::{Action, CodenotationConstraints, Goal, LogicalInstance, SchemaError, Situation};
use telos_search::SearchProblem;
use tracing::trace;

use super::partial_order::PartialOrder;
use super::skeleton::{CausalLink, OpenPrecondition, PlanSkeleton};
use super::step::Step;
use crate::heuristic::{count, widest_effect, Heuristic};

/// One repair of a partial plan.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Refinement {
    /// Support `open` with an effect of a step already in the plan.
    Link {
        /// Supporting step.
        producer: Step,
        /// Precondition being closed.
        open: OpenPrecondition,
        /// Bindings under which the producer establishes it.
        codenotation: CodenotationConstraints,
    },
    /// Support `open` with a fresh step.
    AddStep {
        /// New step, scoped by the plan's next context.
        step: Step,
        /// Precondition being closed.
        open: OpenPrecondition,
        /// Bindings under which the new step establishes it.
        codenotation: CodenotationConstraints,
    },
    /// Resolve a threat by promotion or demotion.
    Order(PartialOrder),
    /// Resolve a threat by forbidding the bindings under which `step`
    /// undoes `link`.
    Separate {
        /// The threatening step.
        step: Step,
        /// The protected link.
        link: CausalLink,
        /// Bindings extended with the separation.
        codenotation: CodenotationConstraints,
    },
}

impl fmt::Display for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link { producer, open, .. } => {
                write!(f, "link {producer} -> {}", open.proposition().atom())
            }
            Self::AddStep {
                step,
                open,
                codenotation,
            } => write!(
                f,
                "add {} for {}",
                step.instance().build(codenotation),
                open.proposition().atom()
            ),
            Self::Order(order) => write!(f, "order {order}"),
            Self::Separate { step, link, .. } => {
                write!(f, "separate {step} from {}", link.proposition().atom())
            }
        }
    }
}

/// Builds a partial-order plan that makes the goal true from the initial
/// situation.
#[derive(Debug, Clone)]
pub struct PartialOrderProblem {
    initial: Situation,
    actions: Vec<Arc<Action>>,
    root: PlanSkeleton,
    heuristic: Heuristic,
    widest: usize,
    satisfied: bool,
}

impl PartialOrderProblem {
    /// Binds a problem to the partial-order strategy.
    pub fn new(
        initial: Situation,
        actions: Vec<Arc<Action>>,
        goal: &Goal,
    ) -> Result<Self, SchemaError> {
        let root = PlanSkeleton::new(&initial, goal)?;
        let widest = widest_effect(&actions);
        let satisfied = goal.is_satisfied_by(&initial);
        Ok(Self {
            initial,
            actions,
            root,
            heuristic: Heuristic::default(),
            widest,
            satisfied,
        })
    }

    /// Replaces the remaining-cost estimate.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Executable instances of a complete plan, grounded by its bindings.
    pub fn linearize(&self, plan: &PlanSkeleton) -> Vec<LogicalInstance> {
        plan.linearize()
            .iter()
            .map(|s| s.instance().ground(plan.codenotation()))
            .collect()
    }

    fn repairs_for_open(&self, plan: &PlanSkeleton, open: &OpenPrecondition) -> Vec<Refinement> {
        let proposition = open.proposition();
        let consumer = open.step();
        let mut options = Vec::new();
        for producer in plan.steps() {
            if !plan.can_order(producer, consumer) {
                continue;
            }
            let support = if producer == plan.start() && plan.start_denies(&self.initial, proposition) {
                Some(plan.codenotation().clone())
            } else {
                producer.establishing_codenotations(proposition, plan.codenotation())
            };
            if let Some(codenotation) = support {
                options.push(Refinement::Link {
                    producer: producer.clone(),
                    open: open.clone(),
                    codenotation,
                });
            }
        }
        let context = plan.next_context();
        for action in &self.actions {
            let step = Step::new(LogicalInstance::new(Arc::clone(action), context.clone()));
            let mut tried = Vec::new();
            for consequence in action
                .consequences()
                .iter()
                .filter(|c| c.is_negation() == proposition.is_negation())
            {
                let mut codenotation = plan.codenotation().clone();
                if codenotation.unify(
                    step.context(),
                    consequence.predicate(),
                    &proposition.scope(),
                    proposition.predicate(),
                ) && !tried.contains(&codenotation)
                {
                    tried.push(codenotation.clone());
                    options.push(Refinement::AddStep {
                        step: step.clone(),
                        open: open.clone(),
                        codenotation,
                    });
                }
            }
        }
        options
    }

    fn unsupported(&self, plan: &PlanSkeleton) -> usize {
        plan.open_preconditions()
            .iter()
            .filter(|open| {
                let p = open.proposition();
                !plan.start_denies(&self.initial, p)
                    && !plan
                        .steps()
                        .any(|s| s != open.step() && s.establishes(p, plan.codenotation()))
            })
            .count()
    }
}

impl SearchProblem for PartialOrderProblem {
    type State = PlanSkeleton;
    type Operator = Refinement;

    fn initial_state(&self) -> PlanSkeleton {
        self.root.clone()
    }

    fn is_final(&self, state: &PlanSkeleton) -> bool {
        // A step-free skeleton needs no repair when the goal already holds.
        state.is_complete() || (self.satisfied && state.actions().next().is_none())
    }

    fn options(&self, state: &PlanSkeleton) -> Vec<Refinement> {
        if let Some(threat) = state.threats().into_iter().next() {
            trace!(step = %threat.step(), link = %threat.link(), "repairing threat");
            let link = threat.link();
            let mut options = Vec::new();
            if state.can_order(threat.step(), link.producer()) {
                options.push(Refinement::Order(PartialOrder::new(
                    threat.step().clone(),
                    link.producer().clone(),
                )));
            }
            if state.can_order(link.consumer(), threat.step()) {
                options.push(Refinement::Order(PartialOrder::new(
                    link.consumer().clone(),
                    threat.step().clone(),
                )));
            }
            options.extend(
                threat
                    .step()
                    .separating_codenotations(link.proposition(), state.codenotation())
                    .into_iter()
                    .map(|codenotation| Refinement::Separate {
                        step: threat.step().clone(),
                        link: link.clone(),
                        codenotation,
                    }),
            );
            return options;
        }
        state
            .open_preconditions()
            .first()
            .map(|open| self.repairs_for_open(state, open))
            .unwrap_or_default()
    }

    fn apply(&self, operator: &Refinement, state: &PlanSkeleton) -> PlanSkeleton {
        match operator {
            Refinement::Link {
                producer,
                open,
                codenotation,
            } => state.link(producer, open, codenotation.clone()),
            Refinement::AddStep {
                step,
                open,
                codenotation,
            } => state.add_step(step, open, codenotation.clone()),
            Refinement::Order(order) => state.order(order.clone()),
            Refinement::Separate { codenotation, .. } => state.rebind(codenotation.clone()),
        }
    }

    fn is_valid(&self, state: &PlanSkeleton) -> bool {
        state.is_acyclic()
    }

    fn evaluate_state(&self, state: &PlanSkeleton) -> f64 {
        self.heuristic
            .scale(count(self.unsupported(state)), self.widest)
    }

    fn evaluate_operator(&self, operator: &Refinement) -> f64 {
        match operator {
            Refinement::AddStep { .. } => 1.0,
            Refinement::Link { .. } | Refinement::Order(_) | Refinement::Separate { .. } => 0.0,
        }
    }
}
