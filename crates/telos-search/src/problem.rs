// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The search-state/operator contract every planning strategy implements.
use std::fmt::Debug;
use std::hash::Hash;

/// A search space explored by [`crate::Resolver`].
///
/// States are compared by value for closed-set deduplication, so `Eq` and
/// `Hash` must agree with the intended notion of "same state".
pub trait SearchProblem {
    /// Node of the search space.
    type State: Clone + Eq + Hash + Debug;
    /// Transition between states.
    type Operator: Clone + Debug;

    /// The search root.
    fn initial_state(&self) -> Self::State;

    /// Terminal test.
    fn is_final(&self, state: &Self::State) -> bool;

    /// Admissible transitions from `state`; may be empty.
    fn options(&self, state: &Self::State) -> Vec<Self::Operator>;

    /// Deterministic transition function.
    ///
    /// Only called with operators produced by [`SearchProblem::options`] for
    /// the same `state`.
    fn apply(&self, operator: &Self::Operator, state: &Self::State) -> Self::State;

    /// Domain-coherence filter; rejected states are pruned unexpanded.
    fn is_valid(&self, state: &Self::State) -> bool;

    /// Estimate of the remaining cost from `state`. Must be non-negative and,
    /// for optimal plans, never overestimate.
    fn evaluate_state(&self, state: &Self::State) -> f64;

    /// Edge cost of taking `operator`.
    fn evaluate_operator(&self, operator: &Self::Operator) -> f64;
}
