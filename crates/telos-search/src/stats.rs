// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use serde::Serialize;

/// Counters collected during one resolver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// States popped and expanded.
    pub expanded: u64,
    /// Successor states produced.
    pub generated: u64,
    /// Successors rejected by the validity filter.
    pub pruned_invalid: u64,
    /// Successors (or stale pops) dropped because a cheaper path was known.
    pub pruned_closed: u64,
    /// Closed states re-queued through a cheaper path.
    pub reopened: u64,
}
