// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
#![cfg(feature = "serde")]
use telos_logic::{atom, Goal, Situation};

#[test]
fn goals_load_from_json() {
    let json = r#"{
        "atoms": [
            { "negated": false, "predicate": { "name": "on", "args": [{ "Variable": "x" }, { "Constant": "B" }] } },
            { "negated": true, "predicate": { "name": "holding", "args": [{ "Variable": "x" }] } }
        ]
    }"#;
    let goal: Goal = serde_json::from_str(json).unwrap();
    assert_eq!(goal.to_string(), "on(?x, B) ∧ ¬holding(?x)");

    let situation = Situation::from_atoms([atom("on", ["A", "B"])]);
    assert!(goal.is_satisfied_by(&situation));
    let with_hand = Situation::from_atoms([atom("on", ["A", "B"]), atom("holding", ["A"])]);
    assert!(!goal.is_satisfied_by(&with_hand));
}

#[test]
fn situations_survive_serialization() {
    let situation = Situation::from_atoms([atom("clear", ["A"]), atom("handEmpty", telos_logic::NO_ARGS)]);
    let text = serde_json::to_string(&situation).unwrap();
    let back: Situation = serde_json::from_str(&text).unwrap();
    assert_eq!(back, situation);
}
