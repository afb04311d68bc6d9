// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! telos-search: a problem-agnostic best-first resolver.
//!
//! A planning strategy implements [`SearchProblem`]; [`Resolver`] explores it
//! in order of `g + h`, deduplicating states through a closed set and
//! reporting one of three [`Outcome`]s. Budget exhaustion and cancellation
//! are the only errors.
#![forbid(unsafe_code)]

mod config;
mod error;
mod frontier;
mod outcome;
mod problem;
mod resolver;
mod stats;

/// Resolver configuration.
pub use config::{ConfigError, SearchConfig, TieBreak};
/// Early-termination errors.
pub use error::SearchError;
/// Verdicts and plans.
pub use outcome::{Outcome, Plan};
/// The search-space contract.
pub use problem::SearchProblem;
/// The resolver and its cancellation switch.
pub use resolver::{CancelFlag, Resolver};
/// Run counters.
pub use stats::SearchStats;
