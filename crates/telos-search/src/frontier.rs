// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Priority frontier ordered by estimated total cost.
//!
//! Ordering invariant: entries pop in ascending `(f, h, order)` where `order`
//! is the insertion sequence (FIFO) or its complement (LIFO). Costs compare
//! with `f64::total_cmp`, so the order is total and deterministic.
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::TieBreak;

#[derive(Debug, Clone, Copy)]
struct Entry {
    f: f64,
    h: f64,
    order: u64,
    node: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: `BinaryHeap` is a max-heap and the smallest key must pop first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[derive(Debug)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    pushed: u64,
    tie_break: TieBreak,
}

impl Frontier {
    pub(crate) fn new(tie_break: TieBreak) -> Self {
        Self {
            heap: BinaryHeap::new(),
            pushed: 0,
            tie_break,
        }
    }

    pub(crate) fn push(&mut self, f: f64, h: f64, node: usize) {
        let order = match self.tie_break {
            TieBreak::Fifo => self.pushed,
            TieBreak::Lifo => u64::MAX - self.pushed,
        };
        self.pushed += 1;
        self.heap.push(Entry { f, h, order, node });
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.node)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
