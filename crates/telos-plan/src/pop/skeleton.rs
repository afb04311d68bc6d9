// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Partial plans.
//!
//! A [`PlanSkeleton`] holds the steps placed so far, the precedence pairs
//! between them, the causal links that protect each satisfied precondition,
//! the preconditions still open, and the bindings accumulated while closing
//! them. Two sentinel steps frame every plan: `start` asserts the initial
//! facts and `finish` requires the goal.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use telos_logic::{
    Action, Atom, CodenotationConstraints, Context, ContextArena, ContextualAtom, Goal,
    LogicalInstance, SchemaError, Situation,
};

use super::partial_order::PartialOrder;
use super::step::Step;

/// Name of the synthetic action that asserts the initial facts.
pub const START: &str = "start";
/// Name of the synthetic action that requires the goal.
pub const FINISH: &str = "finish";

/// `producer` makes `proposition` true for `consumer`, and nothing may undo
/// it in between.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CausalLink {
    producer: Step,
    proposition: ContextualAtom,
    consumer: Step,
}

impl CausalLink {
    /// Links `producer` to `consumer` through `proposition`, which is read in
    /// the consumer's scope.
    pub fn new(producer: Step, proposition: ContextualAtom, consumer: Step) -> Self {
        Self {
            producer,
            proposition,
            consumer,
        }
    }

    /// Step that makes the proposition true.
    pub fn producer(&self) -> &Step {
        &self.producer
    }

    /// Protected proposition.
    pub fn proposition(&self) -> &ContextualAtom {
        &self.proposition
    }

    /// Step that needs the proposition.
    pub fn consumer(&self) -> &Step {
        &self.consumer
    }
}

impl fmt::Display for CausalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --{}--> {}",
            self.producer,
            self.proposition.atom(),
            self.consumer
        )
    }
}

/// A precondition of `step` that no causal link supports yet.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OpenPrecondition {
    step: Step,
    proposition: ContextualAtom,
}

impl OpenPrecondition {
    /// Pairs a step with one of its preconditions.
    pub fn new(step: Step, proposition: ContextualAtom) -> Self {
        Self { step, proposition }
    }

    /// Step that needs the proposition.
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// The proposition, read in the step's scope.
    pub fn proposition(&self) -> &ContextualAtom {
        &self.proposition
    }
}

/// A step that could fall between the ends of a causal link and undo it.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Threat {
    step: Step,
    link: CausalLink,
}

impl Threat {
    /// The clobbering step.
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// The endangered link.
    pub fn link(&self) -> &CausalLink {
        &self.link
    }
}

/// A partial-order plan under construction.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct PlanSkeleton {
    start: Step,
    finish: Step,
    steps: BTreeSet<Step>,
    orderings: BTreeSet<PartialOrder>,
    links: BTreeSet<CausalLink>,
    open: Vec<OpenPrecondition>,
    codenotation: CodenotationConstraints,
    arena: ContextArena,
}

impl PlanSkeleton {
    /// The empty plan: `start ≺ finish`, every goal atom open.
    ///
    /// Fails only when the initial facts or goal cannot form a valid schema,
    /// which never happens for a ground situation.
    pub fn new(initial: &Situation, goal: &Goal) -> Result<Self, SchemaError> {
        let mut arena = ContextArena::new();
        let facts: Vec<Atom> = initial.facts().cloned().map(Atom::positive).collect();
        let start = Step::new(LogicalInstance::new(
            Arc::new(Action::new(START, std::iter::empty(), Vec::new(), facts)?),
            Context::new(arena.allocate()),
        ));
        let goal_variables = goal.variables();
        let finish_action = Action::new(
            FINISH,
            goal_variables.iter().map(|v| &**v),
            goal.atoms().to_vec(),
            Vec::new(),
        )?;
        let finish = Step::new(LogicalInstance::new(
            Arc::new(finish_action),
            Context::new(arena.allocate()),
        ));
        let open = finish
            .instance()
            .contextual_preconditions()
            .map(|p| OpenPrecondition::new(finish.clone(), p))
            .collect();
        let mut skeleton = Self {
            start: start.clone(),
            finish: finish.clone(),
            steps: BTreeSet::from([start.clone(), finish.clone()]),
            orderings: BTreeSet::new(),
            links: BTreeSet::new(),
            open,
            codenotation: CodenotationConstraints::new(),
            arena,
        };
        skeleton.orderings.insert(PartialOrder::new(start, finish));
        Ok(skeleton)
    }

    /// The sentinel that asserts the initial facts.
    pub fn start(&self) -> &Step {
        &self.start
    }

    /// The sentinel that requires the goal.
    pub fn finish(&self) -> &Step {
        &self.finish
    }

    /// Every step, sentinels included, in insertion order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Steps other than the sentinels.
    pub fn actions(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(move |s| **s != self.start && **s != self.finish)
    }

    /// Precedence pairs imposed so far.
    pub fn orderings(&self) -> impl Iterator<Item = &PartialOrder> {
        self.orderings.iter()
    }

    /// Causal links.
    pub fn links(&self) -> impl Iterator<Item = &CausalLink> {
        self.links.iter()
    }

    /// Open preconditions, oldest first.
    pub fn open_preconditions(&self) -> &[OpenPrecondition] {
        &self.open
    }

    /// Bindings accumulated by the links.
    pub fn codenotation(&self) -> &CodenotationConstraints {
        &self.codenotation
    }

    /// Scope id the next added step will receive.
    pub fn next_context(&self) -> Context {
        Context::new(self.arena.peek())
    }

    /// Returns true when `a` must execute before `b` under the transitive
    /// closure of the orderings.
    pub fn precedes(&self, a: &Step, b: &Step) -> bool {
        let mut successors: BTreeMap<&Step, Vec<&Step>> = BTreeMap::new();
        for order in &self.orderings {
            successors.entry(order.first()).or_default().push(order.second());
        }
        let mut stack = vec![a];
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            for &next in successors.get(current).into_iter().flatten() {
                if next == b {
                    return true;
                }
                if seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Returns true when `first ≺ second` can be added without a cycle.
    pub fn can_order(&self, first: &Step, second: &Step) -> bool {
        first != second && !self.precedes(second, first)
    }

    /// Returns true when no step transitively precedes itself.
    pub fn is_acyclic(&self) -> bool {
        self.steps.iter().all(|s| !self.precedes(s, s))
    }

    /// Links `step` could undo while sitting between producer and consumer.
    ///
    /// Detection is conservative: a step threatens a link when its effect
    /// could unify with the protected proposition under some extension of
    /// the current bindings. Separations in the bindings rule a pair out.
    pub fn threats(&self) -> Vec<Threat> {
        let mut found = Vec::new();
        for link in &self.links {
            for step in &self.steps {
                if *step == link.producer || *step == link.consumer {
                    continue;
                }
                if self.precedes(step, &link.producer) || self.precedes(&link.consumer, step) {
                    continue;
                }
                if step.clobbers(&link.proposition, &self.codenotation) {
                    found.push(Threat {
                        step: step.clone(),
                        link: link.clone(),
                    });
                }
            }
        }
        found
    }

    /// Returns true when nothing is open and nothing is threatened.
    pub fn is_complete(&self) -> bool {
        self.open.is_empty() && self.threats().is_empty()
    }

    /// Returns true when the initial facts make the negated `proposition`
    /// true: it grounds under the current bindings and the fact is absent.
    pub(crate) fn start_denies(&self, initial: &Situation, proposition: &ContextualAtom) -> bool {
        proposition.is_negation()
            && proposition
                .predicate()
                .ground(&proposition.scope(), &self.codenotation)
                .is_some_and(|fact| !initial.contains(&fact))
    }

    pub(crate) fn order(&self, order: PartialOrder) -> Self {
        let mut next = self.clone();
        next.orderings.insert(order);
        next
    }

    pub(crate) fn rebind(&self, codenotation: CodenotationConstraints) -> Self {
        let mut next = self.clone();
        next.codenotation = codenotation;
        next
    }

    pub(crate) fn link(
        &self,
        producer: &Step,
        open: &OpenPrecondition,
        codenotation: CodenotationConstraints,
    ) -> Self {
        let mut next = self.clone();
        next.close(open);
        next.codenotation = codenotation;
        if *producer != open.step {
            next.orderings
                .insert(PartialOrder::new(producer.clone(), open.step.clone()));
        }
        next.links.insert(CausalLink::new(
            producer.clone(),
            open.proposition.clone(),
            open.step.clone(),
        ));
        next
    }

    pub(crate) fn add_step(
        &self,
        step: &Step,
        open: &OpenPrecondition,
        codenotation: CodenotationConstraints,
    ) -> Self {
        let mut next = self.link(step, open, codenotation);
        next.arena.allocate();
        next.steps.insert(step.clone());
        next.orderings
            .insert(PartialOrder::new(next.start.clone(), step.clone()));
        next.orderings
            .insert(PartialOrder::new(step.clone(), next.finish.clone()));
        next.open.extend(
            step.instance()
                .contextual_preconditions()
                .map(|p| OpenPrecondition::new(step.clone(), p)),
        );
        next
    }

    fn close(&mut self, open: &OpenPrecondition) {
        if let Some(index) = self.open.iter().position(|o| o == open) {
            self.open.remove(index);
        }
    }

    /// Real steps in a deterministic execution order consistent with the
    /// orderings: among ready steps, the earliest added goes first.
    pub fn linearize(&self) -> Vec<Step> {
        let mut indegree: BTreeMap<&Step, usize> = self.steps.iter().map(|s| (s, 0)).collect();
        let mut successors: BTreeMap<&Step, BTreeSet<&Step>> = BTreeMap::new();
        for order in &self.orderings {
            if successors
                .entry(order.first())
                .or_default()
                .insert(order.second())
            {
                *indegree.entry(order.second()).or_default() += 1;
            }
        }
        let mut ready: BTreeSet<&Step> = indegree
            .iter()
            .filter(|&(_, &d)| d == 0)
            .map(|(&s, _)| s)
            .collect();
        let mut order = Vec::with_capacity(self.steps.len());
        while let Some(step) = ready.pop_first() {
            order.push(step);
            for &next in successors.get(step).into_iter().flatten() {
                if let Some(d) = indegree.get_mut(next) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(next);
                    }
                }
            }
        }
        order
            .into_iter()
            .filter(|s| **s != self.start && **s != self.finish)
            .cloned()
            .collect()
    }
}

impl fmt::Display for PlanSkeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "steps:")?;
        for step in self.actions() {
            writeln!(f, "  {}", step.instance().build(&self.codenotation))?;
        }
        writeln!(f, "links:")?;
        for link in &self.links {
            writeln!(f, "  {link}")?;
        }
        writeln!(f, "open:")?;
        for open in &self.open {
            writeln!(f, "  {} for {}", open.proposition.atom(), open.step)?;
        }
        Ok(())
    }
}
