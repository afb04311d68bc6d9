// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Goals: conjunctions of atoms, possibly with variables.
use std::collections::BTreeSet;
use std::fmt;

use crate::atom::{Atom, ContextualAtom};
use crate::codenotation::CodenotationConstraints;
use crate::context::ContextId;
use crate::situation::Situation;
use crate::term::Symbol;

/// Target condition. Variables are existential and live in
/// [`ContextId::GOAL`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    atoms: Vec<Atom>,
}

impl Goal {
    /// Builds a goal from its atoms.
    pub fn new(atoms: impl IntoIterator<Item = Atom>) -> Self {
        Self {
            atoms: atoms.into_iter().collect(),
        }
    }

    /// Goal atoms in declaration order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Goal atoms tagged with the goal scope.
    pub fn contextual_atoms(&self) -> Vec<ContextualAtom> {
        self.atoms
            .iter()
            .map(|a| ContextualAtom::new(ContextId::GOAL, a.clone()))
            .collect()
    }

    /// Variables mentioned by the goal.
    pub fn variables(&self) -> BTreeSet<Symbol> {
        self.atoms
            .iter()
            .flat_map(|a| a.predicate().variables().cloned())
            .collect()
    }

    /// Returns true when some substitution makes every atom hold.
    pub fn is_satisfied_by(&self, situation: &Situation) -> bool {
        situation
            .first_match(&self.contextual_atoms(), &CodenotationConstraints::new())
            .is_some()
    }

    /// Number of atoms that cannot hold in `situation` even when considered
    /// one at a time. Never exceeds the number of atoms left unsatisfied by
    /// the best substitution.
    pub fn unsatisfied_lower_bound(&self, situation: &Situation) -> usize {
        let none = CodenotationConstraints::new();
        self.contextual_atoms()
            .iter()
            .filter(|a| !situation.could_hold(a, &none))
            .count()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}
