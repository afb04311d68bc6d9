// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use telos_logic::SchemaError;
use telos_search::SearchError;
use thiserror::Error;

/// Errors raised by [`crate::Problem::find_solution`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The resolver stopped early.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// The sentinel schemas of a partial-order plan could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
