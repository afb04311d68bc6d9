// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resolver errors.
use thiserror::Error;

/// Reasons a search stopped before reaching a verdict.
///
/// An exhausted frontier is not an error; it is reported as
/// [`crate::Outcome::Unreachable`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The configured expansion budget ran out.
    #[error("expansion budget exhausted after {expanded} expansions")]
    BudgetExhausted {
        /// Expansions performed.
        expanded: u64,
    },
    /// The cancellation flag was raised.
    #[error("search cancelled after {expanded} expansions")]
    Cancelled {
        /// Expansions performed.
        expanded: u64,
    },
}
