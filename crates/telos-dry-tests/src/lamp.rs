// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A lamp that must be used while it is on, then switched off.
use std::sync::Arc;

use telos_logic::{atom, not, Action, Goal, Situation};

/// `flip_off(x)`: on(x) becomes off(x).
#[allow(clippy::expect_used)]
pub fn flip_off() -> Arc<Action> {
    Arc::new(
        Action::new(
            "flip_off",
            ["x"],
            vec![atom("on", ["?x"])],
            vec![not("on", ["?x"]), atom("off", ["?x"])],
        )
        .expect("lamp schema is valid"),
    )
}

/// `use(x)`: requires on(x), yields used(x).
#[allow(clippy::expect_used)]
pub fn use_lamp() -> Arc<Action> {
    Arc::new(
        Action::new(
            "use",
            ["x"],
            vec![atom("on", ["?x"])],
            vec![atom("used", ["?x"])],
        )
        .expect("lamp schema is valid"),
    )
}

/// Both lamp actions.
pub fn lamp_actions() -> Vec<Arc<Action>> {
    vec![flip_off(), use_lamp()]
}

/// Lamp `L` switched on.
pub fn lamp_on() -> Situation {
    Situation::from_atoms([atom("on", ["L"])])
}

/// `L` used and left off.
pub fn used_and_off() -> Goal {
    Goal::new([atom("used", ["L"]), atom("off", ["L"])])
}
