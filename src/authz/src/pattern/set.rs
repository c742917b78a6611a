//! Sorted, duplicate-free sets of authorization patterns
//!
//! The empty set is the sentinel for "no restriction". On the wire and in
//! configuration a set is written as one comma-joined string.

use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::types::{AuthorizationPattern, Matcher};
use crate::error::{AuthzError, Result};
use crate::path::AuthorizationPath;
use crate::LIST_SEPARATOR;

/// Set of required authorization patterns
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatternSet {
    patterns: BTreeSet<AuthorizationPattern>,
}

impl PatternSet {
    /// Creates an empty (unrestricted) set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single pattern
    pub fn single(pattern: AuthorizationPattern) -> Self {
        let mut set = Self::new();
        set.insert(pattern);
        set
    }

    /// Parses a comma-joined pattern list
    ///
    /// Each entry goes through
    /// [`AuthorizationPattern::parse_single`]; blank entries are skipped.
    pub fn parse(input: &str) -> Result<Self> {
        input
            .split(LIST_SEPARATOR)
            .filter(|token| !token.trim().is_empty())
            .map(AuthorizationPattern::parse_single)
            .collect()
    }

    /// Parses an optional pattern list; `None` yields the empty set
    pub fn parse_optional(input: Option<&str>) -> Result<Self> {
        input.map_or_else(|| Ok(Self::new()), Self::parse)
    }

    /// Adds a pattern, returning `false` if it was already present
    pub fn insert(&mut self, pattern: AuthorizationPattern) -> bool {
        self.patterns.insert(pattern)
    }

    pub fn contains(&self, pattern: &AuthorizationPattern) -> bool {
        self.patterns.contains(pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// An empty set places no restriction
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, AuthorizationPattern> {
        self.patterns.iter()
    }
}

impl Matcher for PatternSet {
    /// Any-of semantics; an empty set matches nothing
    fn matches(&self, path: &AuthorizationPath) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

impl FromIterator<AuthorizationPattern> for PatternSet {
    fn from_iter<I: IntoIterator<Item = AuthorizationPattern>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().collect(),
        }
    }
}

impl Extend<AuthorizationPattern> for PatternSet {
    fn extend<I: IntoIterator<Item = AuthorizationPattern>>(&mut self, iter: I) {
        self.patterns.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a AuthorizationPattern;
    type IntoIter = btree_set::Iter<'a, AuthorizationPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

impl IntoIterator for PatternSet {
    type Item = AuthorizationPattern;
    type IntoIter = btree_set::IntoIter<AuthorizationPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.into_iter()
    }
}

impl FromStr for PatternSet {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PatternSet {
    type Error = AuthzError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PatternSet> for String {
    fn from(set: PatternSet) -> Self {
        set.to_string()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .patterns
            .iter()
            .map(AuthorizationPattern::as_str)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}", joined)
    }
}
