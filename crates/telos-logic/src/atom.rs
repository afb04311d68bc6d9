// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Predicates, atoms and context-tagged atoms.
use std::fmt;
use std::sync::Arc;

use crate::codenotation::CodenotationConstraints;
use crate::context::{Context, ContextId};
use crate::term::{Symbol, Term};

/// A predicate application `name(arg, ...)`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Predicate {
    name: Symbol,
    args: Vec<Term>,
}

impl Predicate {
    /// Builds a predicate from already constructed terms.
    pub fn new(name: &str, args: Vec<Term>) -> Self {
        Self {
            name: Arc::from(name),
            args,
        }
    }

    /// Predicate name.
    pub fn name(&self) -> &Symbol {
        &self.name
    }

    /// Arguments in positional order.
    pub fn args(&self) -> &[Term] {
        &self.args
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Returns true when both predicates carry the same name.
    pub fn same_name(&self, other: &Self) -> bool {
        self.name == other.name
    }

    /// Returns true when name and arity both match.
    pub fn same_signature(&self, other: &Self) -> bool {
        self.same_name(other) && self.arity() == other.arity()
    }

    /// Returns true when no argument is a variable.
    pub fn is_ground(&self) -> bool {
        !self.args.iter().any(Term::is_variable)
    }

    /// Variables occurring in the arguments, in positional order.
    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.args.iter().filter_map(Term::as_variable)
    }

    /// Constants occurring in the arguments, in positional order.
    pub fn constants(&self) -> impl Iterator<Item = &Symbol> {
        self.args.iter().filter_map(|arg| match arg {
            Term::Constant(name) => Some(name),
            Term::Variable(_) => None,
        })
    }

    /// Attempts to unify `self` (read in `context`) with `other` (read in
    /// `other_context`), extending `constraints` on success.
    ///
    /// On failure `constraints` is left untouched.
    pub fn unify(
        &self,
        context: &Context,
        other: &Self,
        other_context: &Context,
        constraints: &mut CodenotationConstraints,
    ) -> bool {
        constraints.unify(context, self, other_context, other)
    }

    /// Substitutes every argument that resolves to a constant.
    ///
    /// Returns `None` when some argument stays unresolved.
    pub fn ground(&self, context: &Context, constraints: &CodenotationConstraints) -> Option<Self> {
        let args = self
            .args
            .iter()
            .map(|arg| constraints.resolve(context, arg).into_constant().map(Term::Constant))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            name: Arc::clone(&self.name),
            args,
        })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

/// A predicate with a polarity.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    negated: bool,
    predicate: Predicate,
}

impl Atom {
    /// Asserted atom.
    pub fn positive(predicate: Predicate) -> Self {
        Self {
            negated: false,
            predicate,
        }
    }

    /// Negated atom.
    pub fn negative(predicate: Predicate) -> Self {
        Self {
            negated: true,
            predicate,
        }
    }

    /// Returns true for a negated atom.
    pub fn is_negation(&self) -> bool {
        self.negated
    }

    /// Underlying predicate.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Same predicate, opposite polarity.
    pub fn negate(&self) -> Self {
        Self {
            negated: !self.negated,
            predicate: self.predicate.clone(),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "¬")?;
        }
        write!(f, "{}", self.predicate)
    }
}

/// An atom tagged with the scope its variables belong to.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ContextualAtom {
    context: ContextId,
    atom: Atom,
}

impl ContextualAtom {
    /// Tags `atom` with `context`.
    pub fn new(context: ContextId, atom: Atom) -> Self {
        Self { context, atom }
    }

    /// Owning scope.
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Lifted view of the owning scope.
    pub fn scope(&self) -> Context {
        Context::new(self.context)
    }

    /// The tagged atom.
    pub fn atom(&self) -> &Atom {
        &self.atom
    }

    /// Shortcut for the atom's predicate.
    pub fn predicate(&self) -> &Predicate {
        self.atom.predicate()
    }

    /// Shortcut for the atom's polarity.
    pub fn is_negation(&self) -> bool {
        self.atom.is_negation()
    }
}

impl fmt::Display for ContextualAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.atom, self.context)
    }
}

/// Empty argument list for nullary predicates in constructor notation.
pub const NO_ARGS: [&str; 0] = [];

/// Builds a predicate from constructor notation: `pred("on", ["?x", "B"])`.
pub fn pred<'a>(name: &str, args: impl IntoIterator<Item = &'a str>) -> Predicate {
    Predicate::new(name, args.into_iter().map(Term::parse).collect())
}

/// Builds an asserted atom from constructor notation.
pub fn atom<'a>(name: &str, args: impl IntoIterator<Item = &'a str>) -> Atom {
    Atom::positive(pred(name, args))
}

/// Builds a negated atom from constructor notation.
pub fn not<'a>(name: &str, args: impl IntoIterator<Item = &'a str>) -> Atom {
    Atom::negative(pred(name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_notation_round_trips_through_display() {
        assert_eq!(atom("on", ["?x", "B"]).to_string(), "on(?x, B)");
        assert_eq!(not("clear", ["A"]).to_string(), "¬clear(A)");
        assert_eq!(atom("handEmpty", NO_ARGS).to_string(), "handEmpty()");
    }

    #[test]
    fn negate_flips_polarity_only() {
        let a = atom("clear", ["A"]);
        let n = a.negate();
        assert!(n.is_negation());
        assert_eq!(n.predicate(), a.predicate());
        assert_eq!(n.negate(), a);
    }

    #[test]
    fn ground_substitutes_context_bindings() {
        let p = pred("on", ["?x", "B"]);
        let mut bindings = std::collections::BTreeMap::new();
        bindings.insert(Symbol::from("x"), Symbol::from("A"));
        let ctx = Context::with_bindings(ContextId(3), bindings);
        let grounded = p.ground(&ctx, &CodenotationConstraints::new());
        assert_eq!(grounded, Some(pred("on", ["A", "B"])));
        assert_eq!(p.ground(&Context::new(ContextId(3)), &CodenotationConstraints::new()), None);
    }
}
