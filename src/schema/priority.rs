//! Explicit priority maintenance for a rule list.
//!
//! Rule order is carried by the `priority` field, not by list position. Every
//! edit below ends with a dense `1..=N` numbering so callers never have to
//! reason about gaps left behind by inserts and deletes.

use super::{EnhancedBranching, Rule};
use itertools::Itertools;

impl EnhancedBranching {
    /// Rules in evaluation order: ascending priority, ties broken by list position.
    pub fn rules_by_priority(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .enumerate()
            .sorted_by_key(|(index, rule)| (rule.priority, *index))
            .map(|(_, rule)| rule)
    }

    /// True when priorities form a permutation of `1..=N`.
    pub fn has_dense_priorities(&self) -> bool {
        self.rules
            .iter()
            .map(|r| r.priority)
            .sorted_unstable()
            .eq(1..=self.rules.len() as i64)
    }

    /// Reorders the list by evaluation order and rewrites priorities to `1..=N`.
    pub fn renumber_priorities(&mut self) {
        let ordered: Vec<Rule> = self
            .rules
            .drain(..)
            .enumerate()
            .sorted_by_key(|(index, rule)| (rule.priority, *index))
            .map(|(_, rule)| rule)
            .collect();
        self.rules = ordered;
        for (index, rule) in self.rules.iter_mut().enumerate() {
            rule.priority = index as i64 + 1;
        }
    }

    /// Appends a rule as the lowest-priority rule.
    pub fn push_rule(&mut self, mut rule: Rule) {
        self.renumber_priorities();
        rule.priority = self.rules.len() as i64 + 1;
        self.rules.push(rule);
    }

    /// Removes the rule with the given id. Returns it if it existed.
    pub fn remove_rule(&mut self, id: &str) -> Option<Rule> {
        let position = self.rules.iter().position(|r| r.id == id)?;
        let removed = self.rules.remove(position);
        self.renumber_priorities();
        Some(removed)
    }

    /// Moves a rule to a 1-based priority slot, shifting the others.
    /// Out-of-range targets are clamped. Returns false if the id is unknown.
    pub fn move_rule(&mut self, id: &str, priority: i64) -> bool {
        self.renumber_priorities();
        let Some(position) = self.rules.iter().position(|r| r.id == id) else {
            return false;
        };
        let rule = self.rules.remove(position);
        let slot = (priority.max(1) as usize - 1).min(self.rules.len());
        self.rules.insert(slot, rule);
        for (index, rule) in self.rules.iter_mut().enumerate() {
            rule.priority = index as i64 + 1;
        }
        true
    }
}
