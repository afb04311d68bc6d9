// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! telos-logic: the logical substrate of the telos planners.
//!
//! Terms, predicates and atoms are plain values. Variables are always read
//! through a [`Context`] so that identically named variables of distinct
//! action instances never alias, and every binding decision is accumulated in
//! a [`CodenotationConstraints`] set that is copied before each speculative
//! unification.
#![forbid(unsafe_code)]

mod action;
mod atom;
mod codenotation;
mod constraint;
mod context;
mod goal;
mod rule;
mod situation;
mod term;

/// Action schemas, grounded instances and schema validation errors.
pub use action::{Action, LogicalInstance, SchemaError};
/// Predicates, atoms and constructor helpers.
pub use atom::{atom, not, pred, Atom, ContextualAtom, Predicate, NO_ARGS};
/// Variable-equality bindings and resolved terms.
pub use codenotation::{CodenotationConstraints, Resolved, ScopedVar};
/// Regression states and the regressions between them.
pub use constraint::{Constraint, Regression};
/// Variable scopes.
pub use context::{Context, ContextArena, ContextId};
/// Goals.
pub use goal::Goal;
/// Domain coherence rules.
pub use rule::Rule;
/// Concrete world states.
pub use situation::{MatchVisitor, Situation};
/// Symbols and terms.
pub use term::{Symbol, Term, VARIABLE_PREFIX};
