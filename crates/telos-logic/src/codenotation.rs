// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Codenotation constraints: accumulated variable-equality bindings.
//!
//! The binding set is a union-find over scoped variables. Each class may carry
//! one constant. Classes are represented by their smallest member so the
//! structure (and therefore `Eq`/`Hash`) is independent of insertion order
//! for a given sequence of merges.
//!
//! Separations record pairs of terms that must never denote the same object.
//! They are re-read after every merge, and a merge that collapses one fails.
//!
//! Every mutation runs against a trial copy that replaces `self` only when the
//! whole attempt succeeds; an observable binding set is always consistent.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::atom::Predicate;
use crate::context::{Context, ContextId};
use crate::term::{Symbol, Term, VARIABLE_PREFIX};

/// A variable qualified by the scope that owns it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ScopedVar {
    context: ContextId,
    name: Symbol,
}

impl ScopedVar {
    /// Qualifies `name` with `context`.
    pub fn new(context: ContextId, name: Symbol) -> Self {
        Self { context, name }
    }

    /// Owning scope.
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Local variable name.
    pub fn name(&self) -> &Symbol {
        &self.name
    }
}

impl fmt::Display for ScopedVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{VARIABLE_PREFIX}{}{}", self.name, self.context)
    }
}

/// What a term denotes under a context and a binding set.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Resolved {
    /// The term denotes this object.
    Constant(Symbol),
    /// The term is still open; the payload is its class representative.
    Variable(ScopedVar),
}

impl Resolved {
    /// Consumes the value, keeping only a constant.
    pub fn into_constant(self) -> Option<Symbol> {
        match self {
            Self::Constant(value) => Some(value),
            Self::Variable(_) => None,
        }
    }

    /// Borrows the constant, if resolved.
    pub fn as_constant(&self) -> Option<&Symbol> {
        match self {
            Self::Constant(value) => Some(value),
            Self::Variable(_) => None,
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{value}"),
            Self::Variable(var) => write!(f, "{VARIABLE_PREFIX}{}", var.name()),
        }
    }
}

/// Accumulated variable-equality bindings produced by unification.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct CodenotationConstraints {
    /// Non-representative member -> parent in its class.
    parent: BTreeMap<ScopedVar, ScopedVar>,
    /// Class representative -> constant.
    values: BTreeMap<ScopedVar, Symbol>,
    /// Ordered pairs of resolved terms that must stay distinct; at least one
    /// side of each pair is a variable.
    separations: BTreeSet<(Resolved, Resolved)>,
}

impl CodenotationConstraints {
    /// Empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when nothing has been bound or separated yet.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty() && self.values.is_empty() && self.separations.is_empty()
    }

    /// Number of variables that are bound to a constant or to another variable.
    pub fn len(&self) -> usize {
        self.parent.len() + self.values.len()
    }

    fn representative(&self, var: &ScopedVar) -> ScopedVar {
        let mut current = var;
        while let Some(next) = self.parent.get(current) {
            current = next;
        }
        current.clone()
    }

    /// Resolves `term` as read in `context`.
    ///
    /// Fixed context bindings win over codenotation bindings.
    pub fn resolve(&self, context: &Context, term: &Term) -> Resolved {
        match term {
            Term::Constant(value) => Resolved::Constant(value.clone()),
            Term::Variable(name) => {
                if let Some(value) = context.binding(name) {
                    return Resolved::Constant(value.clone());
                }
                let root = self.representative(&ScopedVar::new(context.id(), name.clone()));
                match self.values.get(&root) {
                    Some(value) => Resolved::Constant(value.clone()),
                    None => Resolved::Variable(root),
                }
            }
        }
    }

    fn normalize(&self, term: &Resolved) -> Resolved {
        match term {
            Resolved::Constant(_) => term.clone(),
            Resolved::Variable(var) => {
                let root = self.representative(var);
                match self.values.get(&root) {
                    Some(value) => Resolved::Constant(value.clone()),
                    None => Resolved::Variable(root),
                }
            }
        }
    }

    /// Resolves every argument of `predicate`.
    pub fn resolve_args(&self, context: &Context, predicate: &Predicate) -> Vec<Resolved> {
        predicate
            .args()
            .iter()
            .map(|arg| self.resolve(context, arg))
            .collect()
    }

    /// Constant bound to `name` in `context`, if any.
    pub fn value_of(&self, context: &Context, name: &Symbol) -> Option<Symbol> {
        self.resolve(context, &Term::Variable(name.clone()))
            .into_constant()
    }

    /// Extends the binding set so that `a` (in `context_a`) and `b` (in
    /// `context_b`) denote the same term.
    ///
    /// Fails fast on a name or arity mismatch. On failure `self` is unchanged;
    /// unifying an already codesignated pair succeeds without mutation.
    pub fn unify(
        &mut self,
        context_a: &Context,
        a: &Predicate,
        context_b: &Context,
        b: &Predicate,
    ) -> bool {
        if !a.same_signature(b) {
            return false;
        }
        let mut trial = self.clone();
        for (x, y) in a.args().iter().zip(b.args()) {
            let left = trial.resolve(context_a, x);
            let right = trial.resolve(context_b, y);
            if !trial.merge(left, right) {
                return false;
            }
        }
        if !trial.settle() {
            return false;
        }
        *self = trial;
        true
    }

    /// Binds a scoped variable to a constant.
    ///
    /// Returns false (leaving `self` unchanged) when the variable's class is
    /// already bound to a different constant.
    pub fn bind(&mut self, var: &ScopedVar, value: Symbol) -> bool {
        let root = self.representative(var);
        let current = self
            .values
            .get(&root)
            .map_or_else(|| Resolved::Variable(root.clone()), |v| Resolved::Constant(v.clone()));
        let mut trial = self.clone();
        if !trial.merge(current, Resolved::Constant(value)) || !trial.settle() {
            return false;
        }
        *self = trial;
        true
    }

    /// Requires `a` (in `context_a`) and `b` (in `context_b`) to denote
    /// different objects under every later extension.
    ///
    /// Fails, leaving `self` unchanged, when the two already codesignate.
    /// Distinct constants need no record.
    pub fn separate(
        &mut self,
        context_a: &Context,
        a: &Term,
        context_b: &Context,
        b: &Term,
    ) -> bool {
        let left = self.resolve(context_a, a);
        let right = self.resolve(context_b, b);
        if left == right {
            return false;
        }
        if let (Resolved::Constant(_), Resolved::Constant(_)) = (&left, &right) {
            return true;
        }
        self.separations.insert(ordered(left, right));
        true
    }

    /// Returns true when `a` and `b` may never be unified under any
    /// extension of these bindings.
    pub fn are_separated(
        &self,
        context_a: &Context,
        a: &Term,
        context_b: &Context,
        b: &Term,
    ) -> bool {
        let pair = ordered(self.resolve(context_a, a), self.resolve(context_b, b));
        match &pair {
            (Resolved::Constant(x), Resolved::Constant(y)) => x != y,
            _ => self.separations.contains(&pair),
        }
    }

    /// Number of recorded separations.
    pub fn separation_count(&self) -> usize {
        self.separations.len()
    }

    /// Every minimal way of keeping `a` and `b` from ever denoting the same
    /// atom: one extension per argument position whose terms do not yet
    /// codesignate, each separating that position.
    ///
    /// Returns a single unchanged copy when the two can already never unify,
    /// and nothing when they already codesignate.
    pub fn separations_of(
        &self,
        context_a: &Context,
        a: &Predicate,
        context_b: &Context,
        b: &Predicate,
    ) -> Vec<Self> {
        if !self.clone().unify(context_a, a, context_b, b) {
            return vec![self.clone()];
        }
        let mut options: Vec<Self> = Vec::new();
        for (x, y) in a.args().iter().zip(b.args()) {
            let mut trial = self.clone();
            if trial.separate(context_a, x, context_b, y) && !options.contains(&trial) {
                options.push(trial);
            }
        }
        options
    }

    /// Re-reads every separation under the current classes. Returns false
    /// when one now relates a class to itself.
    fn settle(&mut self) -> bool {
        let mut settled = BTreeSet::new();
        for (a, b) in std::mem::take(&mut self.separations) {
            let (a, b) = (self.normalize(&a), self.normalize(&b));
            if a == b {
                return false;
            }
            if let (Resolved::Constant(_), Resolved::Constant(_)) = (&a, &b) {
                continue;
            }
            settled.insert(ordered(a, b));
        }
        self.separations = settled;
        true
    }

    /// Returns true when `a` and `b` already denote the same term, without
    /// requiring any new binding.
    pub fn codesignates(
        &self,
        context_a: &Context,
        a: &Predicate,
        context_b: &Context,
        b: &Predicate,
    ) -> bool {
        a.same_signature(b)
            && a.args()
                .iter()
                .zip(b.args())
                .all(|(x, y)| self.resolve(context_a, x) == self.resolve(context_b, y))
    }

    /// Merges two resolved terms; both variable payloads are representatives
    /// without a constant.
    fn merge(&mut self, left: Resolved, right: Resolved) -> bool {
        match (left, right) {
            (Resolved::Constant(x), Resolved::Constant(y)) => x == y,
            (Resolved::Variable(var), Resolved::Constant(value))
            | (Resolved::Constant(value), Resolved::Variable(var)) => {
                self.values.insert(var, value);
                true
            }
            (Resolved::Variable(v), Resolved::Variable(w)) => {
                if v != w {
                    let (root, child) = if v < w { (v, w) } else { (w, v) };
                    self.parent.insert(child, root);
                }
                true
            }
        }
    }
}

fn ordered(a: Resolved, b: Resolved) -> (Resolved, Resolved) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
