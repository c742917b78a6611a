//! Authorization paths possessed by callers
//!
//! A path is an ordered sequence of 1-3 literal segments
//! (`realm/group/qualifier`). The string form accepts an optional leading
//! separator and surrounding whitespace:
//!
//! ```
//! use mithlond_authz::AuthorizationPath;
//!
//! let path = AuthorizationPath::parse("/forodrim/members/village_idiots").unwrap();
//! assert_eq!(path.realm(), "forodrim");
//! assert_eq!(path.qualifier(), Some("village_idiots"));
//! assert_eq!(path.to_string(), "forodrim/members/village_idiots");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthzError, Result};
use crate::permission::PermissionSet;
use crate::{LIST_SEPARATOR, MAX_SEGMENTS, SEGMENT_SEPARATOR, WILDCARD};

/// Position of a segment within a path or pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Realm,
    Group,
    Qualifier,
}

impl Segment {
    /// All segments in order
    pub const ALL: [Segment; MAX_SEGMENTS] = [Segment::Realm, Segment::Group, Segment::Qualifier];

    /// Zero-based index of this segment
    pub fn index(self) -> usize {
        match self {
            Segment::Realm => 0,
            Segment::Group => 1,
            Segment::Qualifier => 2,
        }
    }
}

/// Splits a path or pattern string into raw, trimmed segments
///
/// Trims the input and discards a single leading separator. Does not
/// validate segment count or content.
pub(crate) fn split_segments(input: &str) -> Vec<&str> {
    let trimmed = input.trim();
    let effective = trimmed.strip_prefix(SEGMENT_SEPARATOR).unwrap_or(trimmed);
    effective.split(SEGMENT_SEPARATOR).map(str::trim).collect()
}

/// Immutable hierarchical permission identifier
///
/// Ordering compares segment by segment; a path that is a strict prefix
/// of another sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorizationPath {
    segments: Vec<String>,
}

impl AuthorizationPath {
    /// Creates a full 3-segment path
    pub fn new(
        realm: impl Into<String>,
        group: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> Result<Self> {
        Self::from_segments(vec![realm.into(), group.into(), qualifier.into()])
    }

    /// Returns a builder for paths with 1-3 segments
    pub fn builder() -> AuthorizationPathBuilder {
        AuthorizationPathBuilder::default()
    }

    /// Parses `[/]realm[/group[/qualifier]]`
    pub fn parse(input: &str) -> Result<Self> {
        if input.contains(LIST_SEPARATOR) {
            return Err(AuthzError::malformed_path(
                input,
                format!("a single path cannot contain '{}'", LIST_SEPARATOR),
            ));
        }

        let raw = split_segments(input);
        if raw.len() > MAX_SEGMENTS {
            return Err(AuthzError::malformed_path(
                input,
                format!("expected at most {} segments, got {}", MAX_SEGMENTS, raw.len()),
            ));
        }

        let segments = raw
            .into_iter()
            .map(|segment| validate_segment(input, segment).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// Parses a comma-joined list of paths into a [`PermissionSet`]
    ///
    /// Empty entries are skipped; an empty input yields an empty set.
    pub fn parse_concatenated(input: &str) -> Result<PermissionSet> {
        input
            .split(LIST_SEPARATOR)
            .filter(|token| !token.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    fn from_segments(segments: Vec<String>) -> Result<Self> {
        let rendered = segments.join("/");
        if segments.is_empty() || segments.len() > MAX_SEGMENTS {
            return Err(AuthzError::malformed_path(
                &rendered,
                format!("expected 1 to {} segments, got {}", MAX_SEGMENTS, segments.len()),
            ));
        }

        let segments = segments
            .iter()
            .map(|segment| {
                if segment.contains(SEGMENT_SEPARATOR) {
                    return Err(AuthzError::malformed_path(
                        &rendered,
                        format!("segment [{}] cannot contain '{}'", segment, SEGMENT_SEPARATOR),
                    ));
                }
                validate_segment(&rendered, segment.trim()).map(str::to_string)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// Returns the segments of this path
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments (1-3)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the segment at the given position, if present
    pub fn segment(&self, segment: Segment) -> Option<&str> {
        self.segments.get(segment.index()).map(String::as_str)
    }

    pub fn realm(&self) -> &str {
        // Parsing guarantees at least one segment
        &self.segments[0]
    }

    pub fn group(&self) -> Option<&str> {
        self.segment(Segment::Group)
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.segment(Segment::Qualifier)
    }
}

fn validate_segment<'a>(input: &str, segment: &'a str) -> Result<&'a str> {
    if segment.is_empty() {
        return Err(AuthzError::malformed_path(input, "segments cannot be empty"));
    }
    if segment.contains(LIST_SEPARATOR) {
        return Err(AuthzError::malformed_path(
            input,
            format!("segment [{}] cannot contain '{}'", segment, LIST_SEPARATOR),
        ));
    }
    if segment.contains(WILDCARD) {
        return Err(AuthzError::malformed_path(
            input,
            format!("segment [{}] cannot contain the wildcard '{}'", segment, WILDCARD),
        ));
    }
    Ok(segment)
}

impl FromStr for AuthorizationPath {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AuthorizationPath {
    type Error = AuthzError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<AuthorizationPath> for String {
    fn from(path: AuthorizationPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for AuthorizationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Builder for [`AuthorizationPath`]
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPathBuilder {
    realm: Option<String>,
    group: Option<String>,
    qualifier: Option<String>,
}

impl AuthorizationPathBuilder {
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Builds the path; a realm is required and a qualifier needs a group
    pub fn build(self) -> Result<AuthorizationPath> {
        let mut segments = Vec::with_capacity(MAX_SEGMENTS);
        match (self.realm, self.group, self.qualifier) {
            (None, _, _) => {
                return Err(AuthzError::malformed_path("", "a realm segment is required"));
            }
            (Some(_), None, Some(qualifier)) => {
                return Err(AuthzError::malformed_path(
                    &qualifier,
                    "a qualifier requires a group segment",
                ));
            }
            (Some(realm), group, qualifier) => {
                segments.push(realm);
                segments.extend(group);
                segments.extend(qualifier);
            }
        }
        AuthorizationPath::from_segments(segments)
    }
}
