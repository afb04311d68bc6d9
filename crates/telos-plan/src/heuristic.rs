// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Remaining-cost estimates shared by the planning strategies.
use std::sync::Arc;

use telos_logic::Action;

/// How a strategy turns "atoms still missing" into a cost estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// `ceil(missing / k)` where `k` is the widest effect list among the
    /// candidate actions: one action changes at most `k` atoms.
    #[default]
    GoalCount,
    /// Always zero; turns A* into uniform-cost search.
    Blind,
}

impl Heuristic {
    /// Scales a count of missing atoms by the widest effect list `k`.
    pub fn scale(self, missing: f64, k: usize) -> f64 {
        match self {
            Self::Blind => 0.0,
            Self::GoalCount => (missing / count(k.max(1))).ceil(),
        }
    }
}

/// A count as a cost, saturating at `u32::MAX`.
pub(crate) fn count(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Largest number of consequences of any action in `actions`.
pub(crate) fn widest_effect(actions: &[Arc<Action>]) -> usize {
    actions
        .iter()
        .map(|a| a.consequences().len())
        .max()
        .unwrap_or(1)
}
