//! Integration tests for the authorization core
//!
//! Covers the unrestricted/empty-set rules, realm-scoped patterns and the
//! mixed-depth scenarios used by navigation templates.

use mithlond_authz::{
    AuthorizationPath, AuthorizationPattern, Authorizer, AuthzError, GroupMembership, Matcher,
    PathProducer, PatternSet, PermissionSet, SimpleAuthorizer,
};

fn paths(s: &str) -> PermissionSet {
    AuthorizationPath::parse_concatenated(s).unwrap()
}

// ============================================================================
// Unrestricted / Empty Sets
// ============================================================================

#[test]
fn test_empty_required_set_grants_everyone() {
    mithlond_core::telemetry::try_init_tracing("warn");
    let authorizer = SimpleAuthorizer;

    for possessed in [PermissionSet::new(), paths("a"), paths("a/b/c,d/e/f")] {
        assert!(authorizer.is_authorized(&PatternSet::new(), &possessed));
    }
}

#[test]
fn test_non_empty_required_set_denies_empty_possessed() {
    let authorizer = SimpleAuthorizer;

    for required in ["*/*/*", "/mithlond", "/a/b/c,/d"] {
        let required = PatternSet::parse(required).unwrap();
        assert!(!authorizer.is_authorized(&required, &PermissionSet::new()));
    }
}

// ============================================================================
// Pattern Semantics
// ============================================================================

#[test]
fn test_full_wildcard_matches_all_three_segment_paths() {
    let pattern = AuthorizationPattern::parse_single("*/*/*").unwrap();
    for raw in ["a/b/c", "mithlond/members/council", "x/y/z"] {
        assert!(pattern.matches(&AuthorizationPath::parse(raw).unwrap()));
    }
}

#[test]
fn test_realm_scoped_pattern() {
    let pattern = AuthorizationPattern::parse_single("realmA/*/*").unwrap();
    assert!(pattern.matches(&AuthorizationPath::new("realmA", "g", "q").unwrap()));
    assert!(!pattern.matches(&AuthorizationPath::new("realmB", "g", "q").unwrap()));
    assert!(!pattern.matches(&AuthorizationPath::new("realmAA", "g", "q").unwrap()));
}

#[test]
fn test_parse_concatenated_two_patterns() {
    let set =
        AuthorizationPattern::parse_concatenated("/forodrim/members,/mithlond/members").unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.iter().all(|p| p.to_string().ends_with("/*")));
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_third_segment_ignored_when_pattern_wildcards_it() {
    let required = PatternSet::parse("/mithlond/members,/forodrim/members").unwrap();
    let possessed = paths("/forodrim/members/village_idiots");
    assert!(SimpleAuthorizer.is_authorized(&required, &possessed));
}

#[test]
fn test_memberships_feed_authorization() {
    let memberships = vec![
        GroupMembership::new("forodrim", "members", None).unwrap(),
        GroupMembership::new("mithlond", "visitors", None).unwrap(),
    ];
    let possessed = PermissionSet::from_producers(&memberships);
    assert_eq!(possessed.len(), 2);

    let required = PatternSet::parse("/mithlond/members").unwrap();
    assert!(!SimpleAuthorizer.is_authorized(&required, &possessed));

    let required = PatternSet::parse("/mithlond").unwrap();
    assert!(SimpleAuthorizer.is_authorized(&required, &possessed));
}

#[test]
fn test_strict_validation_for_administrative_writes() {
    let required =
        PatternSet::single(AuthorizationPattern::realm_and_group("mithlond", "*").unwrap());
    let membership = GroupMembership::new("forodrim", "admins", None).unwrap();

    let result = SimpleAuthorizer.validate(
        &required,
        &membership.paths(),
        "MenuStructure for organisation [mithlond] could not be created/updated",
    );

    let err = result.unwrap_err();
    assert!(!err.is_parse_error());
    assert!(err.to_string().contains("mithlond/*/*"));
}

#[test]
fn test_parse_errors_are_flagged() {
    let err = PatternSet::parse("/a/b/c/d").unwrap_err();
    assert!(matches!(err, AuthzError::MalformedPattern { .. }));
    assert!(err.is_parse_error());

    let err = AuthorizationPath::parse("/a/b/c/d").unwrap_err();
    assert!(matches!(err, AuthzError::MalformedPath { .. }));
}
