// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Keyed configuration containers with a selection strategy: either a
//! fixed per-name lookup falling back to a default entry, or a uniform
//! random choice over all entries.

use rand::seq::IteratorRandom;
use std::collections::HashMap;

const DEFAULT_ID: &str = "default";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Look entries up by name; unknown names resolve to the `default`
    /// entry.
    Select,
    /// Ignore the name and pick uniformly at random.
    Random,
}

#[derive(Clone, Debug)]
pub struct SelectionContainer<T> {
    strategy: SelectionStrategy,
    entries: HashMap<String, T>,
}

impl<T> SelectionContainer<T> {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self {
            strategy,
            entries: HashMap::new(),
        }
    }

    pub fn with_default(strategy: SelectionStrategy, default: T) -> Self {
        let mut container = Self::new(strategy);
        container.update_default(default);
        container
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: T) {
        self.entries.insert(name.into(), entry);
    }

    pub fn update_default(&mut self, entry: T) {
        self.entries.insert(DEFAULT_ID.to_owned(), entry);
    }

    pub fn set_strategy(&mut self, strategy: SelectionStrategy) {
        self.strategy = strategy;
    }

    /// Resolves an entry for `name` under the configured strategy.
    pub fn select(&self, name: Option<&str>) -> Option<&T> {
        match self.strategy {
            SelectionStrategy::Select => name
                .and_then(|name| self.entries.get(name))
                .or_else(|| self.entries.get(DEFAULT_ID)),
            SelectionStrategy::Random => {
                self.entries.values().choose(&mut rand::thread_rng())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_prefers_exact_match() {
        let mut container = SelectionContainer::with_default(SelectionStrategy::Select, "fallback");
        container.insert("idp.example", "specific");

        assert_eq!(container.select(Some("idp.example")), Some(&"specific"));
        assert_eq!(container.select(Some("other.example")), Some(&"fallback"));
        assert_eq!(container.select(None), Some(&"fallback"));
    }

    #[test]
    fn select_without_default_yields_none_for_unknown() {
        let mut container = SelectionContainer::new(SelectionStrategy::Select);
        container.insert("known", 1);

        assert_eq!(container.select(Some("known")), Some(&1));
        assert_eq!(container.select(Some("unknown")), None);
    }

    #[test]
    fn random_draws_from_all_entries() {
        let mut container = SelectionContainer::new(SelectionStrategy::Random);
        container.insert("a", "a");
        container.insert("b", "b");

        for _ in 0..32 {
            let picked = container.select(None).unwrap();
            assert!(["a", "b"].contains(picked));
        }
    }

    #[test]
    fn random_over_empty_container_is_none() {
        let container: SelectionContainer<&str> = SelectionContainer::new(SelectionStrategy::Random);
        assert_eq!(container.select(None), None);
    }
}
