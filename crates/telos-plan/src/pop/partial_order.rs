// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::fmt;

use super::step::Step;

/// A strict precedence: `first` must execute before `second`.
///
/// A single pair says nothing about acyclicity; the plan that collects pairs
/// owns that check.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PartialOrder {
    first: Step,
    second: Step,
}

impl PartialOrder {
    /// `first` before `second`.
    pub fn new(first: Step, second: Step) -> Self {
        Self { first, second }
    }

    /// The earlier step.
    pub fn first(&self) -> &Step {
        &self.first
    }

    /// The later step.
    pub fn second(&self) -> &Step {
        &self.second
    }
}

impl fmt::Display for PartialOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ≺ {}", self.first, self.second)
    }
}
