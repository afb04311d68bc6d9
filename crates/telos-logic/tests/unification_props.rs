// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use proptest::prelude::*;
use telos_logic::{CodenotationConstraints, Context, ContextId, Predicate, Term};

fn term() -> impl Strategy<Value = Term> {
    prop_oneof![
        prop::sample::select(vec!["A", "B", "C"]).prop_map(Term::constant),
        prop::sample::select(vec!["x", "y", "z"]).prop_map(Term::variable),
    ]
}

fn predicate() -> impl Strategy<Value = Predicate> {
    (
        prop::sample::select(vec!["on", "near"]),
        prop::collection::vec(term(), 2),
    )
        .prop_map(|(name, args)| Predicate::new(name, args))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn successful_unification_is_idempotent(a in predicate(), b in predicate(), c in predicate()) {
        let (left, right, third) = (Context::new(ContextId(1)), Context::new(ContextId(2)), Context::new(ContextId(3)));
        let mut bindings = CodenotationConstraints::new();
        // Seed with an unrelated attempt so the property runs on non-empty sets.
        let _ = bindings.unify(&right, &b, &third, &c);
        if bindings.unify(&left, &a, &right, &b) {
            let settled = bindings.clone();
            prop_assert!(bindings.codesignates(&left, &a, &right, &b));
            prop_assert!(bindings.unify(&left, &a, &right, &b));
            prop_assert_eq!(bindings, settled);
        }
    }

    #[test]
    fn failed_unification_leaves_bindings_untouched(a in predicate(), b in predicate(), c in predicate()) {
        let (left, right) = (Context::new(ContextId(1)), Context::new(ContextId(2)));
        let mut bindings = CodenotationConstraints::new();
        let _ = bindings.unify(&left, &c, &right, &b);
        let before = bindings.clone();
        if !bindings.unify(&left, &a, &right, &b) {
            prop_assert_eq!(bindings, before);
        }
    }

    #[test]
    fn unification_is_symmetric(a in predicate(), b in predicate()) {
        let (left, right) = (Context::new(ContextId(1)), Context::new(ContextId(2)));
        let mut forward = CodenotationConstraints::new();
        let mut backward = CodenotationConstraints::new();
        prop_assert_eq!(
            forward.unify(&left, &a, &right, &b),
            backward.unify(&right, &b, &left, &a)
        );
    }

    #[test]
    fn unified_predicates_ground_identically(a in predicate(), b in predicate()) {
        let (left, right) = (Context::new(ContextId(1)), Context::new(ContextId(2)));
        let mut bindings = CodenotationConstraints::new();
        if bindings.unify(&left, &a, &right, &b) {
            prop_assert_eq!(
                bindings.resolve_args(&left, &a),
                bindings.resolve_args(&right, &b)
            );
        }
    }

    #[test]
    fn separation_options_keep_the_pair_apart(a in predicate(), b in predicate(), c in predicate()) {
        let (left, right, third) = (Context::new(ContextId(1)), Context::new(ContextId(2)), Context::new(ContextId(3)));
        let mut bindings = CodenotationConstraints::new();
        let _ = bindings.unify(&right, &b, &third, &c);
        let options = bindings.separations_of(&left, &a, &right, &b);
        prop_assert_eq!(options.is_empty(), bindings.codesignates(&left, &a, &right, &b));
        for mut option in options {
            prop_assert!(!option.unify(&left, &a, &right, &b));
        }
    }
}
