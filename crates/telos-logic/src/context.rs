// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-instance variable scopes.
//!
//! Every logical instance owns a [`Context`]. Variables are always interpreted
//! through a context, so `?x` in one instance and `?x` in another never alias:
//! bindings are keyed by `(ContextId, name)` pairs.
use std::collections::BTreeMap;
use std::fmt;

use crate::term::Symbol;

/// Identity of a variable scope.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextId(pub u32);

impl ContextId {
    /// Scope of goal atoms and of every atom handed to the planner by callers.
    pub const GOAL: Self = Self(0);
    /// Scope used when interpreting ground facts of a situation.
    pub const GROUND: Self = Self(u32::MAX);
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocator of fresh scopes, owned by the state that holds the instances.
///
/// The arena is a plain value: copying a state copies its arena, so two
/// branches of a search may reuse ids, but ids never repeat within one branch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ContextArena {
    next: u32,
}

impl Default for ContextArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextArena {
    /// Creates an arena whose first allocation follows [`ContextId::GOAL`].
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the id the next call to [`ContextArena::allocate`] will hand out.
    pub fn peek(&self) -> ContextId {
        ContextId(self.next)
    }

    /// Hands out a fresh scope id.
    pub fn allocate(&mut self) -> ContextId {
        let id = ContextId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Variable scope of one logical instance.
///
/// `bindings` holds the values fixed when the instance was grounded; variables
/// missing from it are unresolved and may still be constrained through
/// [`crate::CodenotationConstraints`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Context {
    id: ContextId,
    bindings: BTreeMap<Symbol, Symbol>,
}

impl Context {
    /// Creates a scope with no fixed bindings.
    pub fn new(id: ContextId) -> Self {
        Self {
            id,
            bindings: BTreeMap::new(),
        }
    }

    /// Scope for interpreting ground facts.
    pub fn ground() -> Self {
        Self::new(ContextId::GROUND)
    }

    /// Creates a scope with the given fixed bindings.
    pub fn with_bindings(id: ContextId, bindings: BTreeMap<Symbol, Symbol>) -> Self {
        Self { id, bindings }
    }

    /// Scope identity.
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Fixed value of a local variable, if any.
    pub fn binding(&self, variable: &str) -> Option<&Symbol> {
        self.bindings.get(variable)
    }

    /// All fixed bindings in variable order.
    pub fn bindings(&self) -> &BTreeMap<Symbol, Symbol> {
        &self.bindings
    }

    /// Returns true when no variable has a fixed value.
    pub fn is_lifted(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_never_reissues_an_id() {
        let mut arena = ContextArena::new();
        let first = arena.allocate();
        assert_eq!(arena.peek(), ContextId(first.0 + 1));
        let second = arena.allocate();
        assert_ne!(first, second);
        assert_ne!(first, ContextId::GOAL);
    }
}
