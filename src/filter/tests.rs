//! Tests for filter module

use super::*;
use crate::error::Error;
use crate::types::{RequestRecord, RequestState, RequestType};
use pretty_assertions::assert_eq;
use test_case::test_case;

// ============================================================================
// Classification Tests
// ============================================================================

#[test_case("(requeststate=*)", PageableFilter::AnyState ; "any state")]
#[test_case("(REQUESTSTATE=*)", PageableFilter::AnyState ; "any state upper")]
#[test_case("(requestType=Enrollment)", PageableFilter::Enrollment ; "enrollment mixed case")]
#[test_case("(requesttype=recovery)", PageableFilter::Recovery ; "recovery")]
#[test_case("(requestState=Canceled)", PageableFilter::Canceled ; "canceled")]
#[test_case(
    "(&(requestState=canceled)(requestType=enrollment))",
    PageableFilter::CanceledEnrollment ;
    "canceled enrollment"
)]
#[test_case(
    "(&(REQUESTSTATE=REJECTED)(REQUESTTYPE=RECOVERY))",
    PageableFilter::RejectedRecovery ;
    "rejected recovery upper"
)]
#[test_case(
    "(&(requeststate=complete)(requesttype=enrollment))",
    PageableFilter::CompleteEnrollment ;
    "complete enrollment"
)]
fn test_classify_pageable(filter: &str, expected: PageableFilter) {
    assert_eq!(PageableFilter::classify(filter), Some(expected));
    assert!(is_pageable(filter));
}

#[test_case("" ; "empty")]
#[test_case("(requeststate=pending)" ; "state outside index")]
#[test_case("(requesttype=renewal)" ; "type outside index")]
#[test_case("requeststate=*" ; "missing parentheses")]
#[test_case(" (requeststate=*)" ; "leading whitespace")]
#[test_case("(requeststate=*) " ; "trailing whitespace")]
#[test_case("(&(requesttype=enrollment)(requeststate=canceled))" ; "reordered conjunction")]
#[test_case("(&(requeststate=complete)(requesttype=renewal))" ; "unsupported combination")]
#[test_case("(requeststate=comp*)" ; "partial value")]
#[test_case("(&(requeststate=complete" ; "malformed")]
fn test_classify_not_pageable(filter: &str) {
    assert_eq!(PageableFilter::classify(filter), None);
    assert!(!is_pageable(filter));
}

#[test]
fn test_all_shapes_classify_to_themselves() {
    for shape in PageableFilter::ALL {
        assert_eq!(PageableFilter::classify(shape.expression()), Some(shape));
        assert_eq!(
            PageableFilter::classify(&shape.expression().to_uppercase()),
            Some(shape)
        );
    }
}

#[test]
fn test_shapes_are_distinct() {
    let expressions: std::collections::HashSet<_> =
        PageableFilter::ALL.iter().map(|s| s.expression()).collect();
    assert_eq!(expressions.len(), PageableFilter::ALL.len());
}

#[test]
fn test_shape_constraints_match_expression() {
    // The canonical expression must select exactly the records its constraints describe
    let states = [
        RequestState::Pending,
        RequestState::Canceled,
        RequestState::Rejected,
        RequestState::Complete,
    ];
    let kinds = [
        RequestType::Enrollment,
        RequestType::Recovery,
        RequestType::Renewal,
    ];

    for shape in PageableFilter::ALL {
        let expr = FilterExpr::parse(shape.expression()).unwrap();
        for state in states {
            for kind in kinds {
                let record = RequestRecord::new(1, state, kind);
                let expected = shape.state().map_or(true, |s| s == state)
                    && shape.request_type().map_or(true, |k| k == kind);
                assert_eq!(expr.matches(&record), expected, "{shape} on {state}/{kind}");
            }
        }
    }
}

// ============================================================================
// Parser Tests
// ============================================================================

#[test]
fn test_parse_equality() {
    let expr = FilterExpr::parse("(requestState=complete)").unwrap();
    assert_eq!(
        expr,
        FilterExpr::Equals {
            attr: "requeststate".to_string(),
            value: "complete".to_string(),
        }
    );
}

#[test]
fn test_parse_presence_and_substring() {
    assert_eq!(
        FilterExpr::parse("(subject=*)").unwrap(),
        FilterExpr::Present {
            attr: "subject".to_string()
        }
    );
    assert_eq!(
        FilterExpr::parse("(subject=CN=A*x*)").unwrap(),
        FilterExpr::Substring {
            attr: "subject".to_string(),
            parts: vec!["cn=a".to_string(), "x".to_string(), String::new()],
        }
    );
}

#[test]
fn test_parse_nested() {
    let expr =
        FilterExpr::parse("(&(requeststate=complete)(|(requesttype=enrollment)(!(owner=bob))))")
            .unwrap();

    let attrs: Vec<_> = expr.attributes().into_iter().collect();
    assert_eq!(attrs, vec!["owner", "requeststate", "requesttype"]);

    match expr {
        FilterExpr::And(items) => {
            assert_eq!(items.len(), 2);
            assert!(matches!(items[1], FilterExpr::Or(ref inner) if inner.len() == 2));
        }
        other => panic!("Expected And, got {other:?}"),
    }
}

#[test]
fn test_parse_hex_escape() {
    let expr = FilterExpr::parse(r"(subject=a\28b\29)").unwrap();
    assert_eq!(
        expr,
        FilterExpr::Equals {
            attr: "subject".to_string(),
            value: "a(b)".to_string(),
        }
    );
}

#[test_case("" ; "empty")]
#[test_case("requeststate=complete" ; "no parentheses")]
#[test_case("(requeststate=complete" ; "unterminated")]
#[test_case("(=complete)" ; "missing attribute")]
#[test_case("(requeststate)" ; "missing equals")]
#[test_case("(&)" ; "empty conjunction")]
#[test_case("(a=b)(c=d)" ; "trailing filter")]
#[test_case("(a=b(c)" ; "unescaped parenthesis")]
#[test_case(r"(a=\zz)" ; "bad escape")]
fn test_parse_rejects_malformed(filter: &str) {
    match FilterExpr::parse(filter) {
        Err(Error::InvalidFilter { filter: f, .. }) => assert_eq!(f, filter),
        other => panic!("Expected InvalidFilter, got {other:?}"),
    }
}

#[test]
fn test_matches_attributes() {
    let record = RequestRecord::new(9, RequestState::Pending, RequestType::Renewal)
        .with_attribute("subject", "CN=Alice,O=Example");

    let cases = [
        ("(subject=cn=alice,o=example)", true),
        ("(subject=cn=alice*)", true),
        ("(subject=*o=example)", true),
        ("(subject=cn=*,*example)", true),
        ("(subject=cn=bob*)", false),
        ("(owner=*)", false),
        ("(!(owner=*))", true),
        ("(|(requeststate=complete)(requesttype=renewal))", true),
        ("(&(requeststate=pending)(requestid=9))", true),
        ("(&(requeststate=pending)(requestid=10))", false),
    ];

    for (filter, expected) in cases {
        let expr = FilterExpr::parse(filter).unwrap();
        assert_eq!(expr.matches(&record), expected, "{filter}");
    }
}
