// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Concrete world states and matching against them.
//!
//! A situation is a closed-world set of positive ground facts: a negated atom
//! holds exactly when its positive counterpart is absent. Negated atoms that
//! still contain open variables after matching read as negation as failure
//! (no fact may unify with them).
use std::collections::BTreeSet;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::action::{Action, LogicalInstance};
use crate::atom::{Atom, ContextualAtom, Predicate};
use crate::codenotation::{CodenotationConstraints, Resolved, ScopedVar};
use crate::context::{Context, ContextId};
use crate::rule::{ResolvedAtom, Rule};
use crate::term::Symbol;

/// Callback invoked for every binding set under which a conjunction holds.
pub type MatchVisitor<'v> = dyn FnMut(CodenotationConstraints) -> ControlFlow<()> + 'v;

/// A concrete world state.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Situation {
    facts: BTreeSet<Predicate>,
}

impl Situation {
    /// Builds a situation from ground facts; non-ground predicates are dropped.
    pub fn new(facts: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            facts: facts.into_iter().filter(Predicate::is_ground).collect(),
        }
    }

    /// Builds a situation from atoms, keeping the asserted ground ones.
    pub fn from_atoms(atoms: impl IntoIterator<Item = Atom>) -> Self {
        Self::new(
            atoms
                .into_iter()
                .filter(|a| !a.is_negation())
                .map(|a| a.predicate().clone()),
        )
    }

    /// Facts in canonical order.
    pub fn facts(&self) -> impl Iterator<Item = &Predicate> {
        self.facts.iter()
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true when no fact holds.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Returns true when `fact` is present.
    pub fn contains(&self, fact: &Predicate) -> bool {
        self.facts.contains(fact)
    }

    /// Every constant mentioned by some fact.
    pub fn objects(&self) -> BTreeSet<Symbol> {
        self.facts
            .iter()
            .flat_map(|f| f.constants().cloned())
            .collect()
    }

    /// Truth of a ground atom under the closed-world reading.
    pub fn holds(&self, atom: &Atom) -> bool {
        self.facts.contains(atom.predicate()) != atom.is_negation()
    }

    /// Returns false when some rule is violated by the facts.
    pub fn is_coherent(&self, rules: &[Rule]) -> bool {
        if rules.is_empty() {
            return true;
        }
        let resolved: Vec<ResolvedAtom> = self
            .facts
            .iter()
            .map(|f| ResolvedAtom {
                negated: false,
                name: f.name().clone(),
                args: f.constants().cloned().map(Resolved::Constant).collect(),
            })
            .collect();
        !rules.iter().any(|rule| rule.is_violated_by(&resolved))
    }

    fn candidates<'a>(&'a self, pattern: &'a Predicate) -> impl Iterator<Item = &'a Predicate> {
        self.facts.iter().filter(move |f| f.same_signature(pattern))
    }

    /// Applies an instance's effects: deletions first, then additions.
    ///
    /// Consequences that do not ground under the instance scope are ignored.
    pub fn apply(&self, instance: &LogicalInstance) -> Self {
        let empty = CodenotationConstraints::new();
        let mut facts = self.facts.clone();
        let grounded = |a: &Atom| a.predicate().ground(instance.context(), &empty);
        let consequences = instance.action().consequences();
        for removed in consequences.iter().filter(|a| a.is_negation()).filter_map(grounded) {
            facts.remove(&removed);
        }
        for added in consequences.iter().filter(|a| !a.is_negation()).filter_map(grounded) {
            facts.insert(added);
        }
        Self { facts }
    }

    /// Returns true when every precondition of `instance` grounds under its
    /// own scope and holds here.
    pub fn is_applicable(&self, instance: &LogicalInstance) -> bool {
        let empty = CodenotationConstraints::new();
        instance.action().preconditions().iter().all(|p| {
            p.predicate()
                .ground(instance.context(), &empty)
                .is_some_and(|fact| self.facts.contains(&fact) != p.is_negation())
        })
    }

    /// Returns false only when `atom` cannot hold here under any extension of
    /// `constraints`, judged on the atom alone.
    pub fn could_hold(&self, atom: &ContextualAtom, constraints: &CodenotationConstraints) -> bool {
        let scope = atom.scope();
        if atom.is_negation() {
            return match atom.predicate().ground(&scope, constraints) {
                Some(fact) => !self.facts.contains(&fact),
                None => true,
            };
        }
        let ground = Context::ground();
        self.candidates(atom.predicate())
            .any(|fact| constraints.clone().unify(&scope, atom.predicate(), &ground, fact))
    }

    /// First extension of `constraints` under which every atom holds.
    pub fn first_match(
        &self,
        atoms: &[ContextualAtom],
        constraints: &CodenotationConstraints,
    ) -> Option<CodenotationConstraints> {
        let mut found = None;
        let _ = self.for_each_match(atoms, constraints, &mut |bindings| {
            found = Some(bindings);
            ControlFlow::Break(())
        });
        found
    }

    /// Enumerates, in canonical fact order, every extension of `constraints`
    /// under which all `atoms` hold. The visitor may stop the walk early.
    pub fn for_each_match(
        &self,
        atoms: &[ContextualAtom],
        constraints: &CodenotationConstraints,
        visit: &mut MatchVisitor<'_>,
    ) -> ControlFlow<()> {
        let positives: Vec<&ContextualAtom> = atoms.iter().filter(|a| !a.is_negation()).collect();
        let negatives: Vec<&ContextualAtom> = atoms.iter().filter(|a| a.is_negation()).collect();
        self.match_from(&positives, &negatives, constraints, visit)
    }

    fn match_from(
        &self,
        positives: &[&ContextualAtom],
        negatives: &[&ContextualAtom],
        constraints: &CodenotationConstraints,
        visit: &mut MatchVisitor<'_>,
    ) -> ControlFlow<()> {
        let Some((first, rest)) = positives.split_first() else {
            if negatives.iter().all(|n| self.absent(n, constraints)) {
                return visit(constraints.clone());
            }
            return ControlFlow::Continue(());
        };
        let scope = first.scope();
        let ground = Context::ground();
        for fact in self.candidates(first.predicate()) {
            let mut trial = constraints.clone();
            if trial.unify(&scope, first.predicate(), &ground, fact) {
                self.match_from(rest, negatives, &trial, visit)?;
            }
        }
        ControlFlow::Continue(())
    }

    fn absent(&self, atom: &ContextualAtom, constraints: &CodenotationConstraints) -> bool {
        let scope = atom.scope();
        match atom.predicate().ground(&scope, constraints) {
            Some(fact) => !self.facts.contains(&fact),
            None => {
                let ground = Context::ground();
                !self
                    .candidates(atom.predicate())
                    .any(|fact| constraints.clone().unify(&scope, atom.predicate(), &ground, fact))
            }
        }
    }

    /// Every ground instance of `action` whose preconditions hold here.
    ///
    /// Parameters not fixed by an asserted precondition range over
    /// [`Situation::objects`]. Instances are returned in canonical order.
    pub fn groundings(&self, action: &Arc<Action>, context: ContextId) -> Vec<LogicalInstance> {
        let lifted = LogicalInstance::new(Arc::clone(action), Context::new(context));
        let (negatives, positives): (Vec<ContextualAtom>, Vec<ContextualAtom>) = lifted
            .contextual_preconditions()
            .partition(ContextualAtom::is_negation);
        let objects: Vec<Symbol> = self.objects().into_iter().collect();
        let mut found = BTreeSet::new();
        let _ = self.for_each_match(&positives, &CodenotationConstraints::new(), &mut |bindings| {
            self.close_parameters(&lifted, bindings, &objects, &negatives, &mut found);
            ControlFlow::Continue(())
        });
        found.into_iter().collect()
    }

    fn close_parameters(
        &self,
        lifted: &LogicalInstance,
        bindings: CodenotationConstraints,
        objects: &[Symbol],
        negatives: &[ContextualAtom],
        found: &mut BTreeSet<LogicalInstance>,
    ) {
        let open = lifted
            .action()
            .parameters()
            .iter()
            .find(|p| bindings.value_of(lifted.context(), p).is_none());
        match open {
            Some(parameter) => {
                let var = ScopedVar::new(lifted.context().id(), parameter.clone());
                for object in objects {
                    let mut trial = bindings.clone();
                    if trial.bind(&var, object.clone()) {
                        self.close_parameters(lifted, trial, objects, negatives, found);
                    }
                }
            }
            None => {
                if negatives.iter().all(|n| self.absent(n, &bindings)) {
                    found.insert(lifted.ground(&bindings));
                }
            }
        }
    }
}

impl FromIterator<Predicate> for Situation {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, fact) in self.facts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{fact}")?;
        }
        write!(f, "}}")
    }
}
