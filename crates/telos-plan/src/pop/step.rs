// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Steps of a partial-order plan and the threat predicates between them.
//!
//! Every predicate probes unification on a copy of the caller's binding set;
//! the caller's set is never extended.
use std::fmt;
use std::sync::Arc;

use telos_logic::{
    Action, Atom, CodenotationConstraints, Context, ContextualAtom, LogicalInstance,
};

/// An action instance placed in a partial-order plan.
///
/// Steps order by their scope id, which is the order they were added in.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Step {
    instance: LogicalInstance,
}

impl Step {
    /// Wraps an instance; its context must be owned by this step alone.
    pub fn new(instance: LogicalInstance) -> Self {
        Self { instance }
    }

    /// The underlying instance.
    pub fn instance(&self) -> &LogicalInstance {
        &self.instance
    }

    /// The step's variable scope.
    pub fn context(&self) -> &Context {
        self.instance.context()
    }

    /// The action schema.
    pub fn action(&self) -> &Arc<Action> {
        self.instance.action()
    }

    /// Schema preconditions.
    pub fn preconditions(&self) -> &[Atom] {
        self.action().preconditions()
    }

    /// Schema consequences.
    pub fn consequences(&self) -> &[Atom] {
        self.action().consequences()
    }

    /// Returns true when one of the step's preconditions, read in the step's
    /// scope, has the polarity of `proposition` and unifies with it under a
    /// copy of `constraints`.
    ///
    /// This inspects preconditions, not consequences: it answers whether
    /// `proposition` must already hold when the step starts. See
    /// [`Step::establishes`] for the effect-based question.
    pub fn asserts(
        &self,
        proposition: &ContextualAtom,
        constraints: &CodenotationConstraints,
    ) -> bool {
        self.asserting_codenotations(proposition, constraints)
            .is_some()
    }

    /// The extension of `constraints` under which [`Step::asserts`] holds.
    pub fn asserting_codenotations(
        &self,
        proposition: &ContextualAtom,
        constraints: &CodenotationConstraints,
    ) -> Option<CodenotationConstraints> {
        self.first_unifier(self.preconditions(), proposition, constraints)
    }

    /// Returns true when one of the step's consequences makes `proposition`
    /// true under some extension of `constraints`.
    pub fn establishes(
        &self,
        proposition: &ContextualAtom,
        constraints: &CodenotationConstraints,
    ) -> bool {
        self.establishing_codenotations(proposition, constraints)
            .is_some()
    }

    /// The extension of `constraints` under which [`Step::establishes`]
    /// holds, trying consequences in schema order.
    pub fn establishing_codenotations(
        &self,
        proposition: &ContextualAtom,
        constraints: &CodenotationConstraints,
    ) -> Option<CodenotationConstraints> {
        self.first_unifier(self.consequences(), proposition, constraints)
    }

    fn first_unifier(
        &self,
        atoms: &[Atom],
        proposition: &ContextualAtom,
        constraints: &CodenotationConstraints,
    ) -> Option<CodenotationConstraints> {
        let scope = proposition.scope();
        atoms
            .iter()
            .filter(|a| a.is_negation() == proposition.is_negation())
            .find_map(|a| {
                let mut trial = constraints.clone();
                trial
                    .unify(self.context(), a.predicate(), &scope, proposition.predicate())
                    .then_some(trial)
            })
    }

    /// Returns true when one of this step's consequences could undo one of
    /// `other`'s preconditions: same predicate name, opposite polarity, and
    /// unifiable across the two scopes with no prior bindings.
    pub fn is_threatening(&self, other: &Self) -> bool {
        self.consequences().iter().any(|consequence| {
            other
                .preconditions()
                .iter()
                .filter(|p| p.predicate().same_name(consequence.predicate()))
                .filter(|p| p.is_negation() != consequence.is_negation())
                .any(|p| {
                    CodenotationConstraints::new().unify(
                        self.context(),
                        consequence.predicate(),
                        other.context(),
                        p.predicate(),
                    )
                })
        })
    }

    /// Returns true when a negated consequence of this step unifies, under a
    /// copy of `constraints`, with the asserted `precondition` read in
    /// `context`.
    ///
    /// Always false for a negated `precondition`.
    pub fn destroys(
        &self,
        context: &Context,
        precondition: &Atom,
        constraints: &CodenotationConstraints,
    ) -> bool {
        !precondition.is_negation()
            && self.contradicts(context, precondition, constraints)
    }

    /// Polarity-agnostic form of [`Step::destroys`]: some consequence of the
    /// opposite polarity unifies with `proposition` under a copy of
    /// `constraints`.
    pub fn clobbers(
        &self,
        proposition: &ContextualAtom,
        constraints: &CodenotationConstraints,
    ) -> bool {
        self.contradicts(&proposition.scope(), proposition.atom(), constraints)
    }

    /// Extensions of `constraints` under which no consequence of this step
    /// can undo `proposition`: one per way of separating the terms of each
    /// clobbering effect.
    ///
    /// Empty when some consequence necessarily undoes it.
    pub fn separating_codenotations(
        &self,
        proposition: &ContextualAtom,
        constraints: &CodenotationConstraints,
    ) -> Vec<CodenotationConstraints> {
        let scope = proposition.scope();
        let mut branches = vec![constraints.clone()];
        for effect in self
            .consequences()
            .iter()
            .filter(|c| c.is_negation() != proposition.is_negation())
        {
            branches = branches
                .iter()
                .flat_map(|b| {
                    b.separations_of(self.context(), effect.predicate(), &scope, proposition.predicate())
                })
                .collect();
            branches.dedup();
        }
        branches
    }

    fn contradicts(
        &self,
        context: &Context,
        proposition: &Atom,
        constraints: &CodenotationConstraints,
    ) -> bool {
        self.consequences()
            .iter()
            .filter(|c| c.is_negation() != proposition.is_negation())
            .any(|c| {
                constraints.clone().unify(
                    self.context(),
                    c.predicate(),
                    context,
                    proposition.predicate(),
                )
            })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instance)
    }
}
