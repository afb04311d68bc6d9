// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Domain coherence rules.
//!
//! Rules are checked by one-way matching: rule variables bind to whatever the
//! checked atoms resolve to, but the checked atoms are never specialised. A
//! rule therefore only fires on a contradiction that is already necessary.
use std::collections::BTreeMap;
use std::fmt;

use crate::atom::Atom;
use crate::codenotation::Resolved;
use crate::term::{Symbol, Term};

/// An atom after resolving its arguments in its own scope.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct ResolvedAtom {
    pub(crate) negated: bool,
    pub(crate) name: Symbol,
    pub(crate) args: Vec<Resolved>,
}

/// A domain coherence axiom.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rule {
    /// The listed atom patterns may never be required together.
    MutuallyExclusive {
        /// Human-readable name for logs.
        name: Symbol,
        /// Patterns; variables are shared across the patterns of one rule.
        atoms: Vec<Atom>,
    },
}

impl Rule {
    /// Builds a mutual-exclusion rule.
    pub fn mutually_exclusive(name: &str, atoms: Vec<Atom>) -> Self {
        Self::MutuallyExclusive {
            name: Symbol::from(name),
            atoms,
        }
    }

    /// Rule name.
    pub fn name(&self) -> &Symbol {
        match self {
            Self::MutuallyExclusive { name, .. } => name,
        }
    }

    pub(crate) fn is_violated_by(&self, atoms: &[ResolvedAtom]) -> bool {
        match self {
            Self::MutuallyExclusive { atoms: patterns, .. } => {
                matches_all(patterns, atoms, &BTreeMap::new())
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MutuallyExclusive { name, atoms } => {
                write!(f, "{name}: not all of [")?;
                for (i, atom) in atoms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{atom}")?;
                }
                write!(f, "]")
            }
        }
    }
}

fn matches_all(
    patterns: &[Atom],
    atoms: &[ResolvedAtom],
    bound: &BTreeMap<Symbol, Resolved>,
) -> bool {
    let Some((first, rest)) = patterns.split_first() else {
        return true;
    };
    atoms.iter().any(|candidate| {
        match_one(first, candidate, bound).is_some_and(|next| matches_all(rest, atoms, &next))
    })
}

fn match_one(
    pattern: &Atom,
    candidate: &ResolvedAtom,
    bound: &BTreeMap<Symbol, Resolved>,
) -> Option<BTreeMap<Symbol, Resolved>> {
    let p = pattern.predicate();
    if pattern.is_negation() != candidate.negated
        || *p.name() != candidate.name
        || p.arity() != candidate.args.len()
    {
        return None;
    }
    let mut next = bound.clone();
    for (term, value) in p.args().iter().zip(&candidate.args) {
        match term {
            Term::Constant(c) => {
                if value.as_constant() != Some(c) {
                    return None;
                }
            }
            Term::Variable(v) => match next.get(v) {
                Some(existing) if existing != value => return None,
                Some(_) => {}
                None => {
                    next.insert(v.clone(), value.clone());
                }
            },
        }
    }
    Some(next)
}
