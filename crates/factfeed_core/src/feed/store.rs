//! In-memory filtered view of facts.
//!
//! # Invariants
//! - Holds at most `FEED_PAGE_SIZE` facts, newest first.
//! - Only whole-view replacement, front insertion and by-id patching mutate
//!   the view.

use crate::gateway::FEED_PAGE_SIZE;
use crate::model::fact::{Fact, FactId};

/// Ordered working set rendered by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactStore {
    facts: Vec<Fact>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps the entire view.
    pub fn replace(&mut self, mut facts: Vec<Fact>) {
        facts.truncate(page_size());
        self.facts = facts;
    }

    /// Inserts the newest fact at the front, dropping the oldest entry when
    /// the page is full.
    pub fn prepend(&mut self, fact: Fact) {
        self.facts.insert(0, fact);
        self.facts.truncate(page_size());
    }

    /// Replaces the entry with `fact_id` by `updated`.
    ///
    /// Returns `false` and leaves the view untouched when the id is not in
    /// the view.
    pub fn patch(&mut self, fact_id: FactId, updated: Fact) -> bool {
        match self.facts.iter_mut().find(|fact| fact.id == fact_id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, fact_id: FactId) -> Option<&Fact> {
        self.facts.iter().find(|fact| fact.id == fact_id)
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

fn page_size() -> usize {
    FEED_PAGE_SIZE as usize
}
