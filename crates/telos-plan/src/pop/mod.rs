// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Partial-order planning: steps, threats and plan repair.
mod partial_order;
mod problem;
mod skeleton;
mod step;

pub use partial_order::PartialOrder;
pub use problem::{PartialOrderProblem, Refinement};
pub use skeleton::{CausalLink, OpenPrecondition, PlanSkeleton, Threat, FINISH, START};
pub use step::Step;
