// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The terminal states the three strategies produce, behind one type.
use std::fmt;

use telos_logic::{Constraint, Situation};

use crate::pop::PlanSkeleton;

/// Discriminant of a [`SearchState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKind {
    /// A concrete world state.
    Situation,
    /// A regression constraint.
    Constraint,
    /// A partial-order plan.
    PlanSkeleton,
}

/// A search node of any strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchState {
    /// Forward search node.
    Situation(Situation),
    /// Backward search node.
    Constraint(Constraint),
    /// Plan-repair node.
    PlanSkeleton(PlanSkeleton),
}

impl SearchState {
    /// Which strategy produced the state.
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Situation(_) => StateKind::Situation,
            Self::Constraint(_) => StateKind::Constraint,
            Self::PlanSkeleton(_) => StateKind::PlanSkeleton,
        }
    }

    /// The situation, for forward nodes.
    pub fn as_situation(&self) -> Option<&Situation> {
        match self {
            Self::Situation(s) => Some(s),
            Self::Constraint(_) | Self::PlanSkeleton(_) => None,
        }
    }

    /// The constraint, for backward nodes.
    pub fn as_constraint(&self) -> Option<&Constraint> {
        match self {
            Self::Constraint(c) => Some(c),
            Self::Situation(_) | Self::PlanSkeleton(_) => None,
        }
    }

    /// The partial plan, for plan-repair nodes.
    pub fn as_plan_skeleton(&self) -> Option<&PlanSkeleton> {
        match self {
            Self::PlanSkeleton(p) => Some(p),
            Self::Situation(_) | Self::Constraint(_) => None,
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Situation(s) => write!(f, "{s}"),
            Self::Constraint(c) => write!(f, "{c}"),
            Self::PlanSkeleton(p) => write!(f, "{p}"),
        }
    }
}
