// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! telos-plan: planning strategies over the telos resolver.
//!
//! Three strategies share [`telos_search::Resolver`]:
//!
//! - [`ForwardProblem`] progresses concrete situations,
//! - [`BackwardProblem`] regresses the goal into ever earlier constraints,
//! - [`pop::PartialOrderProblem`] repairs a partial-order plan, protecting
//!   causal links from threatening steps.
//!
//! [`Problem`] wraps the three behind one constructor and reports every plan
//! as grounded instances in execution order.
#![forbid(unsafe_code)]

mod backward;
mod error;
mod forward;
mod heuristic;
pub mod pop;
mod problem;
mod render;
mod state;

pub use backward::BackwardProblem;
pub use error::PlanError;
pub use forward::ForwardProblem;
pub use heuristic::Heuristic;
pub use problem::{Problem, Solution, Strategy};
pub use render::render_plan;
pub use state::{SearchState, StateKind};
