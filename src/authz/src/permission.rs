//! Possessed permissions and the producers that supply them
//!
//! A request's [`PermissionSet`] is the union of the paths returned by every
//! [`PathProducer`] the session hands over, typically one per group
//! membership held by the caller.

use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::path::AuthorizationPath;

/// Supplies authorization paths for the current caller
pub trait PathProducer: Send + Sync {
    /// Paths this producer contributes
    fn paths(&self) -> PermissionSet;
}

impl<T: PathProducer + ?Sized> PathProducer for &T {
    fn paths(&self) -> PermissionSet {
        (**self).paths()
    }
}

impl<T: PathProducer + ?Sized> PathProducer for Arc<T> {
    fn paths(&self) -> PermissionSet {
        (**self).paths()
    }
}

impl<T: PathProducer + ?Sized> PathProducer for Box<T> {
    fn paths(&self) -> PermissionSet {
        (**self).paths()
    }
}

impl PathProducer for AuthorizationPath {
    fn paths(&self) -> PermissionSet {
        PermissionSet::single(self.clone())
    }
}

impl PathProducer for PermissionSet {
    fn paths(&self) -> PermissionSet {
        self.clone()
    }
}

/// Adapts a closure into a [`PathProducer`]
pub struct FnProducer<F>(F);

impl<F> FnProducer<F>
where
    F: Fn() -> PermissionSet + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> PathProducer for FnProducer<F>
where
    F: Fn() -> PermissionSet + Send + Sync,
{
    fn paths(&self) -> PermissionSet {
        (self.0)()
    }
}

/// Membership of a caller in an organisation group
///
/// Produces `organisation/group[/qualifier]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    path: AuthorizationPath,
}

impl GroupMembership {
    /// Creates a membership, validating the segments up front
    pub fn new(
        organisation: impl Into<String>,
        group: impl Into<String>,
        qualifier: Option<String>,
    ) -> Result<Self> {
        let builder = AuthorizationPath::builder()
            .realm(organisation)
            .group(group);
        let builder = match qualifier {
            Some(qualifier) => builder.qualifier(qualifier),
            None => builder,
        };
        Ok(Self {
            path: builder.build()?,
        })
    }

    pub fn organisation(&self) -> &str {
        self.path.realm()
    }

    pub fn path(&self) -> &AuthorizationPath {
        &self.path
    }
}

impl PathProducer for GroupMembership {
    fn paths(&self) -> PermissionSet {
        PermissionSet::single(self.path.clone())
    }
}

/// Sorted set of paths possessed by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionSet {
    paths: BTreeSet<AuthorizationPath>,
}

impl PermissionSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single path
    pub fn single(path: AuthorizationPath) -> Self {
        let mut set = Self::new();
        set.insert(path);
        set
    }

    /// Unions the paths of every producer
    pub fn from_producers<I>(producers: I) -> Self
    where
        I: IntoIterator,
        I::Item: PathProducer,
    {
        let mut set = Self::new();
        for producer in producers {
            set.extend(producer.paths());
        }
        set
    }

    /// Adds a path, returning `false` if it was already present
    pub fn insert(&mut self, path: AuthorizationPath) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &AuthorizationPath) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, AuthorizationPath> {
        self.paths.iter()
    }
}

impl FromIterator<AuthorizationPath> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = AuthorizationPath>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl Extend<AuthorizationPath> for PermissionSet {
    fn extend<I: IntoIterator<Item = AuthorizationPath>>(&mut self, iter: I) {
        self.paths.extend(iter);
    }
}

impl IntoIterator for PermissionSet {
    type Item = AuthorizationPath;
    type IntoIter = btree_set::IntoIter<AuthorizationPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a AuthorizationPath;
    type IntoIter = btree_set::Iter<'a, AuthorizationPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .paths
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> AuthorizationPath {
        AuthorizationPath::parse(s).unwrap()
    }

    #[test]
    fn test_union_of_producers() {
        let first = GroupMembership::new("mithlond", "members", None).unwrap();
        let second = path("forodrim/members/village_idiots");
        let third = FnProducer::new(|| {
            [path("mithlond/members"), path("mithlond/council")]
                .into_iter()
                .collect()
        });

        let producers: Vec<&dyn PathProducer> = vec![&first, &second, &third];
        let set = PermissionSet::from_producers(producers);

        assert_eq!(set.len(), 3);
        assert!(set.contains(&path("mithlond/members")));
        assert!(set.contains(&path("mithlond/council")));
        assert!(set.contains(&path("forodrim/members/village_idiots")));
    }

    #[test]
    fn test_no_producers() {
        let producers: Vec<Arc<dyn PathProducer>> = Vec::new();
        assert!(PermissionSet::from_producers(producers).is_empty());
    }

    #[test]
    fn test_group_membership() {
        let qualifier = Some("village_idiots".to_string());
        let membership = GroupMembership::new("forodrim", "members", qualifier).unwrap();
        assert_eq!(membership.organisation(), "forodrim");
        assert_eq!(membership.path().to_string(), "forodrim/members/village_idiots");
        assert!(GroupMembership::new("", "members", None).is_err());
    }

    #[test]
    fn test_display_sorted() {
        let set: PermissionSet = [path("b/x"), path("a/y"), path("a/x")].into_iter().collect();
        assert_eq!(set.to_string(), "a/x,a/y,b/x");
    }

    #[test]
    fn test_parse_concatenated_matches_display() {
        let set: PermissionSet = [path("b/x"), path("a/y/z")].into_iter().collect();
        let reparsed = AuthorizationPath::parse_concatenated(&set.to_string()).unwrap();
        assert_eq!(reparsed, set);
    }
}
