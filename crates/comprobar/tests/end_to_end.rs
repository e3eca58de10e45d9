//! End-to-end tests for comprobar
//!
//! Drive the public `Assert` surface and check the exact rendered text.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use comprobar::prelude::*;
use pretty_assertions::assert_eq;

fn failure(result: AssertResult<()>) -> String {
    match result {
        Err(AssertionError::Failed { message }) => message,
        other => panic!("expected a failure, got {other:?}"),
    }
}

// ============================================================================
// String diagnostics
// ============================================================================

#[test]
fn test_string_caret_under_first_difference() {
    let text = failure(Assert::that("Hello World", Is::equal_to("Hello Word")));
    assert_eq!(
        text,
        "  Expected string length 10 but was 11. Strings differ at index 9.\n\
         \x20 Expected: \"Hello Word\"\n\
         \x20 But was:  \"Hello World\"\n\
         \x20 --------------------^"
    );
}

#[test]
fn test_string_ignore_case() {
    Assert::that("HELLO", Is::equal_to("hello").ignore_case()).unwrap();
    let text = failure(Assert::that("HELLO", Is::equal_to("help").ignore_case()));
    assert!(text.contains("  Expected: \"help\", ignoring case\n"));
}

#[test]
fn test_long_strings_stay_within_line() {
    let expected = "x".repeat(150);
    let actual = format!("{}y{}", "x".repeat(75), "x".repeat(74));
    let text = failure(Assert::that(actual, Is::equal_to(expected)));
    for line in text.lines() {
        assert!(line.chars().count() <= 78, "line too long: {line}");
    }
    assert!(text.contains("Strings differ at index 75."));
}

// ============================================================================
// Collection diagnostics
// ============================================================================

#[test]
fn test_equivalent_permutation() {
    Assert::that(vec![1, 2, 3], Is::equivalent_to([3, 2, 1])).unwrap();
}

#[test]
fn test_equivalent_reports_missing_and_extra() {
    let text = failure(Assert::that(vec![1, 2, 2], Is::equivalent_to([1, 2, 3])));
    assert_eq!(
        text,
        "  Expected: equivalent to < 1, 2, 3 >\n\
         \x20 But was:  < 1, 2, 2 >\n\
         \x20 Missing:  < 3 >\n\
         \x20 Extra:    < 2 >"
    );
}

#[test]
fn test_list_element_mismatch() {
    let text = failure(Assert::are_equal(vec![1, 2, 3], vec![1, 9, 3]));
    assert_eq!(
        text,
        "  Expected and actual are both <List with 3 elements>\n\
         \x20 Values differ at index [1]\n\
         \x20 Expected: 2\n\
         \x20 But was:  9"
    );
}

#[test]
fn test_all_items() {
    Assert::that(vec![2, 4, 6], Has::all(Is::greater_than(0))).unwrap();
    let text = failure(Assert::that(vec![2, -4, 6], Has::all(Is::greater_than(0))));
    assert!(text.starts_with("  Expected: all items greater than 0\n"));
    assert!(text.ends_with("  First non-matching item at index [1]: -4"));
}

#[test]
fn test_contains_and_unique() {
    Assert::contains("b", vec!["a", "b"]).unwrap();
    let text = failure(Assert::that(vec![1, 2, 1], Is::unique()));
    assert!(text.ends_with("  Duplicate item at index [2]: 1"));
}

// ============================================================================
// Numeric tolerance
// ============================================================================

#[test]
fn test_tolerance_rendering() {
    let text = failure(Assert::that(5.3, Is::equal_to(5.0).within(0.1)));
    assert_eq!(text, "  Expected: 5.0 +/- 0.1\n  But was:  5.3");
}

#[test]
fn test_cross_type_numbers() {
    Assert::are_equal(5u8, 5i64).unwrap();
    Assert::are_equal(5.0f32, 5).unwrap();
    Assert::that(f64::INFINITY, Is::equal_to(f64::INFINITY).within(1.0)).unwrap();
    assert!(Assert::that(f64::MAX, Is::equal_to(f64::INFINITY).within(1.0)).is_err());
}

// ============================================================================
// Combinators and usage errors
// ============================================================================

#[test]
fn test_not() {
    assert!(Assert::that(5, Is::not(Is::equal_to(5))).is_err());
    Assert::that(6, Is::not(Is::equal_to(5))).unwrap();
    let text = failure(Assert::that(5, Is::equal_to(5).not()));
    assert_eq!(text, "  Expected: not 5\n  But was:  5");
}

#[test]
fn test_range_and_regex_usage_errors() {
    assert!(Is::in_range(5, 1).unwrap_err().is_invalid_usage());
    assert!(Text::matches("(").unwrap_err().is_invalid_usage());
    Assert::that(3, Is::in_range(1, 5).unwrap()).unwrap();
}

#[test]
fn test_incompatible_actual() {
    let text = failure(Assert::that(42, Text::starts_with("4")));
    assert!(text.ends_with("  Actual value must be a string"));
}

#[test]
fn test_custom_comparer() {
    let by_len = Comparer::equality(|e: &Value, a: &Value| {
        e.as_str().map(str::len) == a.as_str().map(str::len)
    });
    Assert::that("abc", Is::equal_to("xyz").using(by_len)).unwrap();
}

#[test]
fn test_object_field_mismatch() {
    let expected = ObjectValue::new("Point").field("x", 1).field("y", 2);
    let actual = ObjectValue::new("Point").field("x", 1).field("y", 3);
    let text = failure(Assert::that(actual, Is::equal_to(expected)));
    assert!(text.starts_with("  Values differ at field y\n"));
}

// ============================================================================
// Counter, context and macro
// ============================================================================

#[test]
fn test_counter_counts_every_evaluation() {
    let _ = Assert::counter();
    Assert::is_true(true).unwrap();
    let _ = Assert::is_true(false);
    let _ = Assert::that(1, Is::equal_to(1).within(-1.0));
    assert_eq!(Assert::counter(), 3);
}

#[test]
fn test_soft_assertions_from_json_config() {
    let config = AssertConfig::from_json(r#"{"mode": "collect"}"#).unwrap();
    let mut ctx = AssertionContext::with_config(config);
    ctx.that(1, Is::equal_to(2)).unwrap();
    ctx.that_with("b", Is::equal_to("a"), Some("letter {0}"), &[Value::from(2)])
        .unwrap();
    let err = ctx.verify().unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.starts_with("2 assertion(s) failed:\n"));
    assert!(rendered.contains("  letter 2\n"));
}

#[test]
#[should_panic(expected = "Expected: \"abc\"")]
fn test_macro_panics_with_rendered_message() {
    assert_that!("abd", Is::equal_to("abc"));
}

#[test]
fn test_panics() {
    let message = Assert::panics(|| panic!("index out of range")).unwrap();
    assert_eq!(message, "index out of range");
}
