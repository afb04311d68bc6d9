// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::fmt::Write as _;

use telos_logic::LogicalInstance;
use telos_search::Outcome;

use crate::state::SearchState;

/// Text form of a planning outcome: one numbered grounded instance per line,
/// `(already satisfied)` for an empty plan and `(unreachable)` when no plan
/// exists.
pub fn render_plan(outcome: &Outcome<SearchState, LogicalInstance>) -> String {
    match outcome {
        Outcome::AlreadySatisfied => "(already satisfied)\n".to_owned(),
        Outcome::Unreachable => "(unreachable)\n".to_owned(),
        Outcome::Solved(plan) => {
            let mut out = String::new();
            for (i, instance) in plan.operators().iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {instance}", i + 1);
            }
            out
        }
    }
}
