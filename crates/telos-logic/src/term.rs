// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Symbols and terms.
use std::fmt;
use std::sync::Arc;

/// Interned-by-sharing name used for predicates, constants and variables.
pub type Symbol = Arc<str>;

/// Prefix that marks a variable in the string constructors (`"?x"`).
pub const VARIABLE_PREFIX: char = '?';

/// A predicate argument: either a constant object or a variable local to the
/// context that interprets it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    /// A named object of the world (`A`, `table`).
    Constant(Symbol),
    /// A variable, stored without its `?` prefix.
    Variable(Symbol),
}

impl Term {
    /// Builds a constant term.
    pub fn constant(name: &str) -> Self {
        Self::Constant(Arc::from(name))
    }

    /// Builds a variable term; a leading `?` is stripped if present.
    pub fn variable(name: &str) -> Self {
        let bare = name.strip_prefix(VARIABLE_PREFIX).unwrap_or(name);
        Self::Variable(Arc::from(bare))
    }

    /// Parses the constructor notation: `?x` is a variable, anything else a
    /// constant.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.starts_with(VARIABLE_PREFIX) {
            Self::variable(token)
        } else {
            Self::constant(token)
        }
    }

    /// Returns true for [`Term::Variable`].
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns the variable name when this term is a variable.
    pub fn as_variable(&self) -> Option<&Symbol> {
        match self {
            Self::Variable(name) => Some(name),
            Self::Constant(_) => None,
        }
    }
}

impl From<&str> for Term {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(name) => write!(f, "{name}"),
            Self::Variable(name) => write!(f, "{VARIABLE_PREFIX}{name}"),
        }
    }
}
