// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Regression states.
//!
//! A [`Constraint`] is a goal that has not yet been verified against the
//! initial situation. Each atom keeps the scope of the instance that required
//! it, and every regression step introduces a fresh scope from the
//! constraint's own [`ContextArena`].
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::action::{Action, LogicalInstance};
use crate::atom::ContextualAtom;
use crate::codenotation::CodenotationConstraints;
use crate::context::{Context, ContextArena};
use crate::goal::Goal;
use crate::rule::{ResolvedAtom, Rule};
use crate::situation::Situation;

/// One way of regressing a constraint through an action.
///
/// Carries the lifted instance, the constraint atoms it asserts and the
/// binding set under which it does so.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Regression {
    instance: LogicalInstance,
    asserted: BTreeSet<ContextualAtom>,
    codenotation: CodenotationConstraints,
}

impl Regression {
    /// The contributing instance.
    pub fn instance(&self) -> &LogicalInstance {
        &self.instance
    }

    /// Schema name of the contributing instance.
    pub fn name(&self) -> &str {
        self.instance.name()
    }

    /// Constraint atoms this instance asserts.
    pub fn asserted(&self) -> &BTreeSet<ContextualAtom> {
        &self.asserted
    }

    /// Bindings under which the assertion holds.
    pub fn codenotation(&self) -> &CodenotationConstraints {
        &self.codenotation
    }
}

impl fmt::Display for Regression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.instance.build(&self.codenotation))
    }
}

/// A not-yet-verified goal in backward search.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Constraint {
    atoms: BTreeSet<ContextualAtom>,
    codenotation: CodenotationConstraints,
    arena: ContextArena,
}

impl Constraint {
    /// The goal itself, unverified.
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            atoms: goal.contextual_atoms().into_iter().collect(),
            codenotation: CodenotationConstraints::new(),
            arena: ContextArena::new(),
        }
    }

    /// Required atoms in canonical order.
    pub fn atoms(&self) -> impl Iterator<Item = &ContextualAtom> {
        self.atoms.iter()
    }

    /// Number of required atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Returns true when nothing is required.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Bindings accumulated by the regressions so far.
    pub fn codenotation(&self) -> &CodenotationConstraints {
        &self.codenotation
    }

    /// Bindings under which `situation` verifies every atom, if any.
    pub fn verification(&self, situation: &Situation) -> Option<CodenotationConstraints> {
        let atoms: Vec<ContextualAtom> = self.atoms.iter().cloned().collect();
        situation.first_match(&atoms, &self.codenotation)
    }

    /// Returns true when `situation` verifies the constraint directly.
    pub fn is_verified(&self, situation: &Situation) -> bool {
        self.verification(situation).is_some()
    }

    /// Every lifted action instance that could have asserted at least one of
    /// the required atoms without undoing any other.
    ///
    /// Each candidate unifies against a copy of the binding set; the shared
    /// set is never touched. When an effect could undo a remaining atom under
    /// some binding, the candidate is kept once per way of separating the two,
    /// and dropped when they already codesignate.
    pub fn contributing_instances(&self, actions: &[Arc<Action>]) -> Vec<Regression> {
        let context = Context::new(self.arena.peek());
        let mut found: Vec<Regression> = Vec::new();
        for action in actions {
            let instance = LogicalInstance::new(Arc::clone(action), context.clone());
            for target in &self.atoms {
                for consequence in action
                    .consequences()
                    .iter()
                    .filter(|c| c.is_negation() == target.is_negation())
                {
                    let mut codenotation = self.codenotation.clone();
                    if !codenotation.unify(
                        &context,
                        consequence.predicate(),
                        &target.scope(),
                        target.predicate(),
                    ) {
                        continue;
                    }
                    let asserted: BTreeSet<ContextualAtom> = self
                        .atoms
                        .iter()
                        .filter(|a| *a == target || asserts_outright(&instance, a, &codenotation))
                        .cloned()
                        .collect();
                    // Additions win over deletions, so an asserted positive
                    // atom is safe; everything else must survive the effects.
                    let protected = self
                        .atoms
                        .iter()
                        .filter(|a| !asserted.contains(*a) || a.is_negation());
                    for codenotation in protect(&instance, protected, codenotation) {
                        let regression = Regression {
                            instance: instance.clone(),
                            asserted: asserted.clone(),
                            codenotation,
                        };
                        if !found.contains(&regression) {
                            found.push(regression);
                        }
                    }
                }
            }
        }
        found
    }

    /// Replaces the atoms asserted by `regression` with the preconditions of
    /// its instance.
    ///
    /// `regression` must come from [`Constraint::contributing_instances`] on
    /// this very constraint.
    pub fn revert_action(&self, regression: &Regression) -> Self {
        let codenotation = &regression.codenotation;
        let mut atoms: BTreeSet<ContextualAtom> =
            self.atoms.difference(&regression.asserted).cloned().collect();
        for precondition in regression.instance.contextual_preconditions() {
            let already_required = atoms.iter().any(|a| {
                a.is_negation() == precondition.is_negation()
                    && codenotation.codesignates(
                        &a.scope(),
                        a.predicate(),
                        &precondition.scope(),
                        precondition.predicate(),
                    )
            });
            if !already_required {
                atoms.insert(precondition);
            }
        }
        let mut arena = self.arena;
        arena.allocate();
        Self {
            atoms,
            codenotation: codenotation.clone(),
            arena,
        }
    }

    /// Number of atoms that `situation` cannot verify even one at a time.
    pub fn evaluate_completion(&self, situation: &Situation) -> f64 {
        let unreachable = self
            .atoms
            .iter()
            .filter(|a| !situation.could_hold(a, &self.codenotation))
            .count();
        f64::from(u32::try_from(unreachable).unwrap_or(u32::MAX))
    }

    /// Returns false when two required atoms necessarily contradict each
    /// other or some rule is necessarily violated.
    pub fn is_coherent(&self, rules: &[Rule]) -> bool {
        let resolved = self.resolved_atoms();
        let contradiction = resolved.iter().enumerate().any(|(i, a)| {
            resolved[i + 1..]
                .iter()
                .any(|b| a.negated != b.negated && a.name == b.name && a.args == b.args)
        });
        !contradiction && !rules.iter().any(|rule| rule.is_violated_by(&resolved))
    }

    fn resolved_atoms(&self) -> Vec<ResolvedAtom> {
        self.atoms
            .iter()
            .map(|a| ResolvedAtom {
                negated: a.is_negation(),
                name: a.predicate().name().clone(),
                args: self.codenotation.resolve_args(&a.scope(), a.predicate()),
            })
            .collect()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.resolved_atoms().iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            if atom.negated {
                write!(f, "¬")?;
            }
            let args: Vec<String> = atom.args.iter().map(ToString::to_string).collect();
            write!(f, "{}({})", atom.name, args.join(", "))?;
        }
        Ok(())
    }
}

fn asserts_outright(
    instance: &LogicalInstance,
    atom: &ContextualAtom,
    codenotation: &CodenotationConstraints,
) -> bool {
    instance.action().consequences().iter().any(|c| {
        c.is_negation() == atom.is_negation()
            && codenotation.codesignates(
                instance.context(),
                c.predicate(),
                &atom.scope(),
                atom.predicate(),
            )
    })
}

/// Extensions of `codenotation` under which no effect of `instance` undoes
/// one of `atoms`.
fn protect<'a>(
    instance: &LogicalInstance,
    atoms: impl Iterator<Item = &'a ContextualAtom>,
    codenotation: CodenotationConstraints,
) -> Vec<CodenotationConstraints> {
    let mut branches = vec![codenotation];
    for atom in atoms {
        for effect in instance
            .action()
            .consequences()
            .iter()
            .filter(|c| c.is_negation() != atom.is_negation())
            .filter(|c| c.predicate().same_signature(atom.predicate()))
        {
            branches = branches
                .iter()
                .flat_map(|b| {
                    b.separations_of(
                        instance.context(),
                        effect.predicate(),
                        &atom.scope(),
                        atom.predicate(),
                    )
                })
                .collect();
            branches.dedup();
            if branches.is_empty() {
                return branches;
            }
        }
    }
    branches
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::atom::{atom, not, pred, NO_ARGS};

    fn take() -> Arc<Action> {
        Arc::new(
            Action::new(
                "take",
                ["x"],
                vec![atom("onTable", ["?x"]), atom("clear", ["?x"]), atom("handEmpty", NO_ARGS)],
                vec![
                    not("onTable", ["?x"]),
                    not("clear", ["?x"]),
                    not("handEmpty", NO_ARGS),
                    atom("holding", ["?x"]),
                ],
            )
            .unwrap_or_else(|e| panic!("schema: {e}")),
        )
    }

    fn table() -> Situation {
        Situation::new([
            pred("onTable", ["A"]),
            pred("clear", ["A"]),
            pred("handEmpty", NO_ARGS),
        ])
    }

    #[test]
    fn regression_replaces_asserted_atoms_with_preconditions() {
        let goal = Constraint::from_goal(&Goal::new([atom("holding", ["A"])]));
        assert!(!goal.is_verified(&table()));
        let options = goal.contributing_instances(&[take()]);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].to_string(), "take(A)");
        let earlier = goal.revert_action(&options[0]);
        assert_eq!(earlier.len(), 3);
        assert!(earlier.is_verified(&table()));
        assert!(goal.codenotation().is_empty());
    }

    #[test]
    fn contributors_may_not_negate_remaining_atoms() {
        let goal = Constraint::from_goal(&Goal::new([atom("holding", ["A"]), atom("clear", ["A"])]));
        assert!(goal.contributing_instances(&[take()]).is_empty());
        let goal = Constraint::from_goal(&Goal::new([atom("holding", ["A"]), atom("clear", ["B"])]));
        assert_eq!(goal.contributing_instances(&[take()]).len(), 1);
    }

    #[test]
    fn fresh_scopes_keep_repeated_regressions_apart() {
        let goal = Constraint::from_goal(&Goal::new([atom("holding", ["?b"])]));
        let first = goal.revert_action(&goal.contributing_instances(&[take()])[0]);
        let scopes: BTreeSet<_> = first.atoms().map(ContextualAtom::context).collect();
        assert_eq!(scopes.len(), 1);
        assert!(!scopes.contains(&crate::context::ContextId::GOAL));
    }

    #[test]
    fn incoherent_constraints_are_detected() {
        let rule = Rule::mutually_exclusive(
            "held-or-on-table",
            vec![atom("holding", ["?x"]), atom("onTable", ["?x"])],
        );
        let bad = Constraint::from_goal(&Goal::new([atom("holding", ["A"]), atom("onTable", ["A"])]));
        assert!(!bad.is_coherent(&[rule.clone()]));
        assert!(bad.is_coherent(&[]));
        let fine = Constraint::from_goal(&Goal::new([atom("holding", ["A"]), atom("onTable", ["B"])]));
        assert!(fine.is_coherent(&[rule]));
        let contradiction = Constraint::from_goal(&Goal::new([atom("clear", ["A"]), not("clear", ["A"])]));
        assert!(!contradiction.is_coherent(&[]));
    }

    #[test]
    fn completion_counts_atoms_the_situation_cannot_supply() {
        let c = Constraint::from_goal(&Goal::new([atom("clear", ["A"]), atom("holding", ["A"])]));
        assert!((c.evaluate_completion(&table()) - 1.0).abs() < f64::EPSILON);
    }

    fn holding_target_with_open_block() -> Constraint {
        Constraint::from_goal(&Goal::new([atom("holding", ["A"]), atom("clear", ["?z"])]))
    }

    #[test]
    fn possible_clobbers_are_separated_rather_than_ignored() {
        let goal = holding_target_with_open_block();
        let options = goal.contributing_instances(&[take()]);
        assert_eq!(options.len(), 1);
        let scope = crate::context::Context::new(crate::context::ContextId::GOAL);
        assert!(options[0].codenotation().are_separated(
            &scope,
            &crate::term::Term::variable("z"),
            &scope,
            &crate::term::Term::constant("A"),
        ));
        // The initial facts offer clear(A) first, which the separation rules out.
        let situation = Situation::new([
            pred("onTable", ["A"]),
            pred("clear", ["A"]),
            pred("clear", ["B"]),
            pred("handEmpty", NO_ARGS),
        ]);
        let earlier = goal.revert_action(&options[0]);
        let bindings = earlier.verification(&situation);
        let value = bindings.and_then(|b| b.value_of(&scope, &crate::term::Symbol::from("z")));
        assert_eq!(value, Some(crate::term::Symbol::from("B")));
    }

    #[test]
    fn separation_can_make_verification_impossible() {
        let goal = holding_target_with_open_block();
        let options = goal.contributing_instances(&[take()]);
        let earlier = goal.revert_action(&options[0]);
        assert!(!earlier.is_verified(&table()));
    }
}
