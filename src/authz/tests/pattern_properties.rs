//! Property-based tests for pattern parsing and matching

use mithlond_authz::{
    AuthorizationPath, AuthorizationPattern, Authorizer, Matcher, PatternSet, PermissionSet,
    SimpleAuthorizer,
};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn pattern_segment() -> impl Strategy<Value = String> {
    prop_oneof![Just("*".to_string()), Just(String::new()), segment()]
}

fn path() -> impl Strategy<Value = AuthorizationPath> {
    (segment(), segment(), segment())
        .prop_map(|(r, g, q)| AuthorizationPath::new(r, g, q).unwrap())
}

proptest! {
    #[test]
    fn test_display_round_trip(
        realm in pattern_segment(),
        group in pattern_segment(),
        qualifier in pattern_segment()
    ) {
        let pattern = AuthorizationPattern::new(&realm, &group, &qualifier).unwrap();
        let reparsed = AuthorizationPattern::parse_single(&pattern.to_string()).unwrap();
        prop_assert_eq!(reparsed, pattern);
    }

    #[test]
    fn test_full_wildcard_matches_any_path(path in path()) {
        prop_assert!(AuthorizationPattern::any().matches(&path));
    }

    #[test]
    fn test_path_matches_its_own_literal_pattern(path in path()) {
        let pattern = AuthorizationPattern::parse_single(&path.to_string()).unwrap();
        prop_assert!(pattern.matches(&path));
    }

    #[test]
    fn test_unrestricted_grants_any_possessed(paths in prop::collection::vec(path(), 0..5)) {
        let possessed: PermissionSet = paths.into_iter().collect();
        prop_assert!(SimpleAuthorizer.is_authorized(&PatternSet::new(), &possessed));
    }

    #[test]
    fn test_restricted_denies_empty_possessed(
        patterns in prop::collection::vec(
            (pattern_segment(), pattern_segment(), pattern_segment()),
            1..5
        )
    ) {
        let required: PatternSet = patterns
            .iter()
            .map(|(r, g, q)| AuthorizationPattern::new(r, g, q).unwrap())
            .collect();
        prop_assert!(!SimpleAuthorizer.is_authorized(&required, &PermissionSet::new()));
    }
}
