//! Service registries and pattern tables

use regex::Regex;
use std::collections::HashMap;

use crate::rule::MatchRule;

/// Mapping from service name to its match rule
///
/// Order is irrelevant. Once composed for a tool, a registry is only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    services: HashMap<String, MatchRule>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a service
    pub fn insert(&mut self, name: impl Into<String>, rule: MatchRule) {
        self.services.insert(name.into(), rule);
    }

    /// Look up a service
    pub fn get(&self, name: &str) -> Option<&MatchRule> {
        self.services.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut MatchRule> {
        self.services.get_mut(name)
    }

    /// Whether a service is registered
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Keep only the services for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.services.retain(|name, _| keep(name));
    }

    /// Number of services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry has no services
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Service names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Iterate over services and their rules
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchRule)> {
        self.services.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Project every rule's pattern into a [`PatternTable`]
    pub fn patterns(&self) -> PatternTable {
        PatternTable {
            patterns: self
                .services
                .iter()
                .map(|(name, rule)| (name.clone(), rule.pattern.clone()))
                .collect(),
        }
    }
}

/// Mapping from service name to the pattern that routes pastes to it
///
/// Handed to the host's paste interception so it can tag an incoming URL with
/// a service key before the block is notified.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: HashMap<String, Regex>,
}

impl PatternTable {
    /// Pattern for a service
    pub fn get(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(name)
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate over service names and patterns
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.patterns.iter().map(|(name, pattern)| (name.as_str(), pattern))
    }

    /// Find a service whose pattern matches the text
    ///
    /// Several patterns may match the same URL; the lexicographically smallest
    /// service name wins so routing is deterministic.
    pub fn route(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(name, _)| name.as_str())
            .min()
    }
}
