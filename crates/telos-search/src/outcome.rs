// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Search verdicts and plans.
use std::fmt;

/// An operator path from the root to a final state; non-empty whenever the
/// root itself was not final.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<S, O> {
    operators: Vec<O>,
    cost: f64,
    terminal: S,
}

impl<S, O> Plan<S, O> {
    /// Assembles a plan; `operators` are in application order.
    pub fn new(operators: Vec<O>, cost: f64, terminal: S) -> Self {
        Self {
            operators,
            cost,
            terminal,
        }
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns true when the plan has no operators.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operators in application order.
    pub fn operators(&self) -> &[O] {
        &self.operators
    }

    /// Sum of operator costs.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The final state the path reaches.
    pub fn terminal(&self) -> &S {
        &self.terminal
    }

    /// Drops the terminal state, keeping the operators.
    pub fn into_operators(self) -> Vec<O> {
        self.operators
    }
}

impl<S, O: fmt::Display> fmt::Display for Plan<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operators.iter().enumerate() {
            writeln!(f, "{:>3}. {op}", i + 1)?;
        }
        Ok(())
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<S, O> {
    /// The root was already final; the plan is empty.
    AlreadySatisfied,
    /// A final state was reached.
    Solved(Plan<S, O>),
    /// The frontier ran dry (or the root was invalid).
    Unreachable,
}

impl<S, O> Outcome<S, O> {
    /// Returns true unless the goal is unreachable; an already satisfied
    /// goal counts as reachable.
    pub fn is_reachable(&self) -> bool {
        !matches!(self, Self::Unreachable)
    }

    /// The plan, when one had to be found.
    pub fn plan(&self) -> Option<&Plan<S, O>> {
        match self {
            Self::Solved(plan) => Some(plan),
            Self::AlreadySatisfied | Self::Unreachable => None,
        }
    }

    /// Consumes the outcome, returning the plan.
    pub fn into_plan(self) -> Option<Plan<S, O>> {
        match self {
            Self::Solved(plan) => Some(plan),
            Self::AlreadySatisfied | Self::Unreachable => None,
        }
    }

    /// The operator sequence: empty when already satisfied, `None` when
    /// unreachable.
    pub fn operators(&self) -> Option<&[O]> {
        match self {
            Self::AlreadySatisfied => Some(&[]),
            Self::Solved(plan) => Some(plan.operators()),
            Self::Unreachable => None,
        }
    }
}
