/// Authorization pattern type definitions
///
/// A pattern always has exactly three segments. Each segment is either a
/// literal, compared case-sensitively against the corresponding path
/// segment, or the whole-segment wildcard `*`. Partial-string globbing
/// (`mem*`) is rejected at parse time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::set::PatternSet;
use crate::error::{AuthzError, Result};
use crate::path::{split_segments, AuthorizationPath, Segment};
use crate::{LIST_SEPARATOR, MAX_SEGMENTS, SEGMENT_SEPARATOR, WILDCARD};

/// Anything that can decide whether a path is permitted
pub trait Matcher {
    /// Returns `true` if `path` satisfies this matcher
    fn matches(&self, path: &AuthorizationPath) -> bool;
}

/// One compiled pattern segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentPattern {
    /// Matches any value of the corresponding path segment
    Any,
    /// Matches exactly this value
    Literal(String),
}

impl SegmentPattern {
    /// Compiles a raw segment; empty and `*` become [`SegmentPattern::Any`]
    fn compile(input: &str, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == WILDCARD {
            return Ok(SegmentPattern::Any);
        }
        if raw.contains(WILDCARD) {
            return Err(AuthzError::malformed_pattern(
                input,
                format!("wildcards must be standalone segments: '{}'", raw),
            ));
        }
        if raw.contains(SEGMENT_SEPARATOR) || raw.contains(LIST_SEPARATOR) {
            return Err(AuthzError::malformed_pattern(
                input,
                format!("segment [{}] contains a separator character", raw),
            ));
        }
        Ok(SegmentPattern::Literal(raw.to_string()))
    }

    /// A missing path segment only satisfies a wildcard
    fn matches(&self, value: Option<&str>) -> bool {
        match self {
            SegmentPattern::Any => true,
            SegmentPattern::Literal(literal) => value == Some(literal.as_str()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, SegmentPattern::Any)
    }
}

impl fmt::Display for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentPattern::Any => write!(f, "{}", WILDCARD),
            SegmentPattern::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

/// Immutable, compiled 3-segment authorization pattern
///
/// Equality, hashing and ordering use the canonical string form
/// `seg1/seg2/seg3`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorizationPattern {
    /// Compiled segments
    segments: [SegmentPattern; MAX_SEGMENTS],
    /// Canonical string form
    canonical: String,
}

impl AuthorizationPattern {
    /// Creates a pattern from three segment values
    ///
    /// An empty value or `*` is a wildcard.
    pub fn new(realm: &str, group: &str, qualifier: &str) -> Result<Self> {
        let input = format!("{}/{}/{}", realm, group, qualifier);
        Ok(Self::compiled([
            SegmentPattern::compile(&input, realm)?,
            SegmentPattern::compile(&input, group)?,
            SegmentPattern::compile(&input, qualifier)?,
        ]))
    }

    /// Creates a pattern with a wildcard qualifier
    pub fn realm_and_group(realm: &str, group: &str) -> Result<Self> {
        Self::new(realm, group, WILDCARD)
    }

    /// Pattern permitting any path
    pub fn any() -> Self {
        Self::compiled([SegmentPattern::Any, SegmentPattern::Any, SegmentPattern::Any])
    }

    /// Parses `[/]realm[/group[/qualifier]]`
    ///
    /// Empty or missing segments become wildcards. More than three
    /// segments, an embedded `,` or a partial wildcard is an error.
    pub fn parse_single(input: &str) -> Result<Self> {
        if input.contains(LIST_SEPARATOR) {
            return Err(AuthzError::malformed_pattern(
                input,
                format!(
                    "a single pattern cannot contain '{}'. Expected format: [/]realm/group/qualifier",
                    LIST_SEPARATOR
                ),
            ));
        }

        let raw = split_segments(input);
        if raw.len() > MAX_SEGMENTS {
            return Err(AuthzError::malformed_pattern(
                input,
                format!("expected at most {} segments, got {}", MAX_SEGMENTS, raw.len()),
            ));
        }

        let mut segments = [SegmentPattern::Any, SegmentPattern::Any, SegmentPattern::Any];
        for (slot, value) in segments.iter_mut().zip(raw) {
            *slot = SegmentPattern::compile(input, value)?;
        }

        Ok(Self::compiled(segments))
    }

    /// Parses a comma-joined pattern list into a sorted, duplicate-free set
    ///
    /// An empty input yields the empty set, meaning "no restriction".
    pub fn parse_concatenated(input: &str) -> Result<PatternSet> {
        PatternSet::parse(input)
    }

    fn compiled(segments: [SegmentPattern; MAX_SEGMENTS]) -> Self {
        let canonical = segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/");
        Self { segments, canonical }
    }

    /// Returns the compiled segments
    pub fn segments(&self) -> &[SegmentPattern; MAX_SEGMENTS] {
        &self.segments
    }

    /// Returns the pattern for a single segment position
    pub fn segment(&self, segment: Segment) -> &SegmentPattern {
        &self.segments[segment.index()]
    }

    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Returns whether every segment is a wildcard
    pub fn is_unrestricted(&self) -> bool {
        self.segments.iter().all(SegmentPattern::is_wildcard)
    }
}

impl Matcher for AuthorizationPattern {
    fn matches(&self, path: &AuthorizationPath) -> bool {
        Segment::ALL
            .iter()
            .all(|&segment| self.segment(segment).matches(path.segment(segment)))
    }
}

impl PartialEq for AuthorizationPattern {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for AuthorizationPattern {}

impl Hash for AuthorizationPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for AuthorizationPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AuthorizationPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Default for AuthorizationPattern {
    fn default() -> Self {
        Self::any()
    }
}

impl FromStr for AuthorizationPattern {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_single(s)
    }
}

impl TryFrom<String> for AuthorizationPattern {
    type Error = AuthzError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_single(&value)
    }
}

impl From<AuthorizationPattern> for String {
    fn from(pattern: AuthorizationPattern) -> Self {
        pattern.canonical
    }
}

impl fmt::Display for AuthorizationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical)
    }
}
