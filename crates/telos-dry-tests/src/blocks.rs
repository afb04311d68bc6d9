// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Blocks world.
//!
//! Vocabulary: `on(x, y)`, `onTable(x)`, `clear(x)`, `holding(x)` and the
//! nullary `handEmpty`.
use std::sync::Arc;

use telos_logic::{atom, not, Action, Atom, Goal, Rule, Situation, NO_ARGS};

/// Name of the pick-up-from-table action.
pub const TAKE: &str = "take";
/// Name of the put-down-on-table action.
pub const PUT: &str = "put";
/// Name of the place-on-block action.
pub const STACK: &str = "stack";
/// Name of the lift-from-block action.
pub const UNSTACK: &str = "unstack";

fn hand_empty() -> Atom {
    atom("handEmpty", NO_ARGS)
}

#[allow(clippy::expect_used)]
fn schema(name: &str, params: &[&str], pre: Vec<Atom>, cons: Vec<Atom>) -> Arc<Action> {
    Arc::new(
        Action::new(name, params.iter().copied(), pre, cons).expect("blocks world schema is valid"),
    )
}

/// `take(x)`: lift a clear block off the table.
pub fn take() -> Arc<Action> {
    schema(
        TAKE,
        &["x"],
        vec![atom("onTable", ["?x"]), atom("clear", ["?x"]), hand_empty()],
        vec![
            not("onTable", ["?x"]),
            not("clear", ["?x"]),
            not("handEmpty", NO_ARGS),
            atom("holding", ["?x"]),
        ],
    )
}

/// `put(x)`: set the held block on the table.
pub fn put() -> Arc<Action> {
    schema(
        PUT,
        &["x"],
        vec![atom("holding", ["?x"])],
        vec![
            not("holding", ["?x"]),
            atom("onTable", ["?x"]),
            atom("clear", ["?x"]),
            hand_empty(),
        ],
    )
}

/// `stack(x, y)`: set the held block `x` on the clear block `y`.
pub fn stack() -> Arc<Action> {
    schema(
        STACK,
        &["x", "y"],
        vec![atom("holding", ["?x"]), atom("clear", ["?y"])],
        vec![
            not("holding", ["?x"]),
            not("clear", ["?y"]),
            atom("on", ["?x", "?y"]),
            atom("clear", ["?x"]),
            hand_empty(),
        ],
    )
}

/// `unstack(x, y)`: lift the clear block `x` off `y`.
pub fn unstack() -> Arc<Action> {
    schema(
        UNSTACK,
        &["x", "y"],
        vec![atom("on", ["?x", "?y"]), atom("clear", ["?x"]), hand_empty()],
        vec![
            not("on", ["?x", "?y"]),
            not("clear", ["?x"]),
            not("handEmpty", NO_ARGS),
            atom("holding", ["?x"]),
            atom("clear", ["?y"]),
        ],
    )
}

/// Every blocks world action.
pub fn all_actions() -> Vec<Arc<Action>> {
    vec![take(), put(), stack(), unstack()]
}

/// Physical impossibilities of the blocks world.
pub fn blocks_rules() -> Vec<Rule> {
    vec![
        Rule::mutually_exclusive(
            "held-and-on-table",
            vec![atom("holding", ["?x"]), atom("onTable", ["?x"])],
        ),
        Rule::mutually_exclusive(
            "hand-empty-and-holding",
            vec![hand_empty(), atom("holding", ["?x"])],
        ),
        Rule::mutually_exclusive(
            "covered-and-clear",
            vec![atom("on", ["?x", "?y"]), atom("clear", ["?y"])],
        ),
        Rule::mutually_exclusive(
            "stacked-and-on-table",
            vec![atom("on", ["?x", "?y"]), atom("onTable", ["?x"])],
        ),
    ]
}

/// `A`, `B` and `C` side by side on the table, hand empty.
pub fn three_blocks_on_table() -> Situation {
    Situation::from_atoms(
        ["A", "B", "C"]
            .into_iter()
            .flat_map(|b| [atom("onTable", [b]), atom("clear", [b])])
            .chain([hand_empty()]),
    )
}

/// `A` on `B` on `C`.
pub fn abc_stacked() -> Goal {
    Goal::new([atom("on", ["A", "B"]), atom("on", ["B", "C"])])
}

/// `A` directly on `B`.
pub fn a_on_b() -> Goal {
    Goal::new([atom("on", ["A", "B"])])
}

/// All three blocks on the table.
pub fn three_blocks_on_table_goal() -> Goal {
    Goal::new(["A", "B", "C"].into_iter().map(|b| atom("onTable", [b])))
}

/// Some tower of three blocks.
pub fn any_three_stacked() -> Goal {
    Goal::new([atom("on", ["?x", "?y"]), atom("on", ["?y", "?z"])])
}

/// A block resting on itself.
pub fn self_stacked() -> Goal {
    Goal::new([atom("on", ["A", "A"])])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_situation_is_coherent() {
        let s = three_blocks_on_table();
        assert_eq!(s.len(), 7);
        assert!(s.is_coherent(&blocks_rules()));
        assert!(three_blocks_on_table_goal().is_satisfied_by(&s));
        assert!(!abc_stacked().is_satisfied_by(&s));
    }
}
