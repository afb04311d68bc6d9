// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Action schemas and their grounded instances.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::atom::{Atom, ContextualAtom};
use crate::codenotation::{CodenotationConstraints, Resolved};
use crate::context::Context;
use crate::term::{Symbol, Term, VARIABLE_PREFIX};

/// Errors raised while building an action schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The same parameter was declared twice.
    #[error("action {action}: duplicate parameter ?{parameter}")]
    DuplicateParameter {
        /// Offending action.
        action: String,
        /// Repeated parameter name.
        parameter: String,
    },
    /// An atom uses a variable that is not a declared parameter.
    #[error("action {action}: undeclared variable ?{variable} in {atom}")]
    UndeclaredVariable {
        /// Offending action.
        action: String,
        /// Variable name without prefix.
        variable: String,
        /// Atom that mentions the variable.
        atom: String,
    },
}

/// A parameterized action schema.
///
/// Negated consequences are deletions, asserted consequences are additions;
/// applying an instance deletes first, then adds.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    name: Symbol,
    parameters: Vec<Symbol>,
    preconditions: Vec<Atom>,
    consequences: Vec<Atom>,
}

impl Action {
    /// Builds and validates a schema. Parameters may be written with or
    /// without the `?` prefix.
    pub fn new<'a>(
        name: &str,
        parameters: impl IntoIterator<Item = &'a str>,
        preconditions: Vec<Atom>,
        consequences: Vec<Atom>,
    ) -> Result<Self, SchemaError> {
        let mut declared = BTreeSet::new();
        let mut params = Vec::new();
        for raw in parameters {
            let bare = raw.trim().trim_start_matches(VARIABLE_PREFIX);
            if !declared.insert(bare.to_owned()) {
                return Err(SchemaError::DuplicateParameter {
                    action: name.to_owned(),
                    parameter: bare.to_owned(),
                });
            }
            params.push(Symbol::from(bare));
        }
        for atom in preconditions.iter().chain(&consequences) {
            if let Some(variable) = atom
                .predicate()
                .variables()
                .find(|v| !declared.contains(&v.to_string()))
            {
                return Err(SchemaError::UndeclaredVariable {
                    action: name.to_owned(),
                    variable: variable.to_string(),
                    atom: atom.to_string(),
                });
            }
        }
        Ok(Self {
            name: Symbol::from(name),
            parameters: params,
            preconditions,
            consequences,
        })
    }

    /// Schema name.
    pub fn name(&self) -> &Symbol {
        &self.name
    }

    /// Parameter names, without prefix, in declaration order.
    pub fn parameters(&self) -> &[Symbol] {
        &self.parameters
    }

    /// Precondition atoms.
    pub fn preconditions(&self) -> &[Atom] {
        &self.preconditions
    }

    /// Consequence atoms.
    pub fn consequences(&self) -> &[Atom] {
        &self.consequences
    }
}

/// A grounded (or partially grounded) use of an action inside one scope.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LogicalInstance {
    context: Context,
    action: Arc<Action>,
}

impl LogicalInstance {
    /// Pairs a schema with the scope that interprets its variables.
    pub fn new(action: Arc<Action>, context: Context) -> Self {
        Self { context, action }
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        self.action.name()
    }

    /// The schema.
    pub fn action(&self) -> &Arc<Action> {
        &self.action
    }

    /// The instance scope.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Preconditions tagged with this instance's scope.
    pub fn contextual_preconditions(&self) -> impl Iterator<Item = ContextualAtom> + '_ {
        self.action
            .preconditions()
            .iter()
            .map(|atom| ContextualAtom::new(self.context.id(), atom.clone()))
    }

    /// Parameters as resolved under `constraints`.
    pub fn arguments(&self, constraints: &CodenotationConstraints) -> Vec<Resolved> {
        self.action
            .parameters()
            .iter()
            .map(|p| constraints.resolve(&self.context, &Term::Variable(p.clone())))
            .collect()
    }

    /// Copies every parameter that `constraints` resolves to a constant into
    /// the instance's own scope.
    pub fn ground(&self, constraints: &CodenotationConstraints) -> Self {
        let bindings: BTreeMap<Symbol, Symbol> = self
            .action
            .parameters()
            .iter()
            .filter_map(|p| {
                constraints
                    .value_of(&self.context, p)
                    .map(|value| (p.clone(), value))
            })
            .collect();
        Self {
            context: Context::with_bindings(self.context.id(), bindings),
            action: Arc::clone(&self.action),
        }
    }

    /// Returns true when every parameter has a fixed value.
    pub fn is_ground(&self) -> bool {
        self.action
            .parameters()
            .iter()
            .all(|p| self.context.binding(p).is_some())
    }

    /// Renders `name(arg, ...)` with arguments resolved under `constraints`;
    /// open arguments print as `?name`.
    pub fn build(&self, constraints: &CodenotationConstraints) -> String {
        let args: Vec<String> = self
            .arguments(constraints)
            .iter()
            .map(ToString::to_string)
            .collect();
        format!("{}({})", self.action.name(), args.join(", "))
    }
}

impl fmt::Display for LogicalInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build(&CodenotationConstraints::new()))
    }
}
