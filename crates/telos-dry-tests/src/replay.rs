// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Step-by-step execution of returned plans.
use telos_logic::{Goal, LogicalInstance, Situation};

/// Why a plan failed to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// A step's preconditions do not hold when it is reached.
    Inapplicable {
        /// Zero-based position of the step.
        index: usize,
        /// The step as rendered.
        step: String,
        /// The situation it was tried in.
        situation: String,
    },
    /// Every step ran but the goal does not hold at the end.
    GoalUnmet {
        /// The final situation.
        situation: String,
    },
}

/// Runs `plan` from `initial`, checking every step's preconditions before
/// applying it, and returns the final situation when it satisfies `goal`.
pub fn replay(
    initial: &Situation,
    plan: &[LogicalInstance],
    goal: &Goal,
) -> Result<Situation, ReplayError> {
    let mut situation = initial.clone();
    for (index, step) in plan.iter().enumerate() {
        if !situation.is_applicable(step) {
            return Err(ReplayError::Inapplicable {
                index,
                step: step.to_string(),
                situation: situation.to_string(),
            });
        }
        situation = situation.apply(step);
    }
    if goal.is_satisfied_by(&situation) {
        Ok(situation)
    } else {
        Err(ReplayError::GoalUnmet {
            situation: situation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{a_on_b, stack, take, three_blocks_on_table};
    use telos_logic::{CodenotationConstraints, Context, ContextId, ScopedVar, Symbol};

    fn grounded(action: std::sync::Arc<telos_logic::Action>, id: u32, args: &[(&str, &str)]) -> LogicalInstance {
        let lifted = LogicalInstance::new(action, Context::new(ContextId(id)));
        let mut bindings = CodenotationConstraints::new();
        for (name, value) in args {
            assert!(bindings.bind(&ScopedVar::new(ContextId(id), Symbol::from(*name)), Symbol::from(*value)));
        }
        lifted.ground(&bindings)
    }

    #[test]
    fn executable_plan_reaches_the_goal() {
        let plan = [
            grounded(take(), 1, &[("x", "A")]),
            grounded(stack(), 2, &[("x", "A"), ("y", "B")]),
        ];
        assert!(replay(&three_blocks_on_table(), &plan, &a_on_b()).is_ok());
    }

    #[test]
    fn failing_precondition_names_the_step() {
        let plan = [grounded(stack(), 1, &[("x", "A"), ("y", "B")])];
        let err = replay(&three_blocks_on_table(), &plan, &a_on_b());
        assert!(matches!(
            err,
            Err(ReplayError::Inapplicable { index: 0, ref step, .. }) if step == "stack(A, B)"
        ));
    }

    #[test]
    fn unmet_goal_is_reported() {
        let plan = [grounded(take(), 1, &[("x", "A")])];
        assert!(matches!(
            replay(&three_blocks_on_table(), &plan, &a_on_b()),
            Err(ReplayError::GoalUnmet { .. })
        ));
    }
}
