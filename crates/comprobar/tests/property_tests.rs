//! Property-based tests for comprobar.
//!
//! Uses proptest to verify invariants hold for arbitrary inputs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use comprobar::diff::{clip_expected_and_actual, clip_start_for, find_mismatch_position};
use comprobar::prelude::*;
use proptest::prelude::*;

fn holds(constraint: impl Into<Constraint>, actual: impl Into<Value>) -> bool {
    constraint.into().matches(&actual.into())
}

// === Numeric Tolerance ===

proptest! {
    /// A float matches exactly when it lies within the tolerance.
    #[test]
    fn prop_tolerance_window(
        expected in -1.0e6f64..1.0e6,
        actual in -1.0e6f64..1.0e6,
        tolerance in 0.0f64..1.0e3
    ) {
        let within = (expected - actual).abs() <= tolerance;
        prop_assert_eq!(holds(Is::equal_to(expected).within(tolerance), actual), within);
    }

    /// Infinite expected values ignore the tolerance.
    #[test]
    fn prop_infinity_needs_exact_match(
        actual in -1.0e300f64..1.0e300,
        tolerance in 0.0f64..1.0e300
    ) {
        prop_assert!(!holds(Is::equal_to(f64::INFINITY).within(tolerance), actual));
        prop_assert!(!holds(Is::equal_to(f64::NAN).within(tolerance), actual));
        prop_assert!(holds(Is::equal_to(f64::INFINITY).within(tolerance), f64::INFINITY));
    }

    /// Negation flips the outcome.
    #[test]
    fn prop_not_equal_inverts(expected in any::<i32>(), actual in any::<i32>()) {
        prop_assert_eq!(
            holds(Is::not(Is::equal_to(expected)), actual),
            expected != actual
        );
    }
}

// === Collection Equivalence ===

fn permuted() -> impl Strategy<Value = (Vec<i32>, Vec<i32>)> {
    proptest::collection::vec(0i32..5, 0..12)
        .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle()))
}

proptest! {
    /// Every permutation is equivalent.
    #[test]
    fn prop_permutation_equivalent((items, shuffled) in permuted()) {
        prop_assert!(holds(Is::equivalent_to(items), shuffled));
    }

    /// Changing one multiplicity breaks equivalence.
    #[test]
    fn prop_extra_item_not_equivalent(
        (items, mut shuffled) in permuted(),
        extra in 0i32..5
    ) {
        shuffled.push(extra);
        prop_assert!(!holds(Is::equivalent_to(items.clone()), shuffled.clone()));
        prop_assert!(holds(Is::subset_of(shuffled), items));
    }
}

// === String Mismatch ===

proptest! {
    /// Identical strings have no mismatch.
    #[test]
    fn prop_identical_strings(s in "\\PC{0,40}") {
        prop_assert_eq!(find_mismatch_position(&s, &s, 0, false), None);
    }

    /// The reported index is the first differing char.
    #[test]
    fn prop_first_difference(prefix in "[a-z]{0,20}", tail in "[a-z]{1,10}") {
        let expected = format!("{prefix}A{tail}");
        let actual = format!("{prefix}B{tail}");
        prop_assert_eq!(
            find_mismatch_position(&expected, &actual, 0, false),
            Some(prefix.chars().count())
        );
    }

    /// Clipping respects the width and keeps the mismatch in view.
    #[test]
    fn prop_clip_keeps_mismatch(
        prefix in "[a-z]{0,80}",
        e_tail in "[a-z]{0,80}",
        a_tail in "[a-z]{0,80}",
        max in 7usize..60
    ) {
        let expected = format!("{prefix}X{e_tail}");
        let actual = format!("{prefix}Y{a_tail}");
        let mismatch = prefix.chars().count();
        let (e, a) = clip_expected_and_actual(&expected, &actual, max, mismatch);
        prop_assert!(e.chars().count() <= max);
        prop_assert!(a.chars().count() <= max);

        let e_len = expected.chars().count();
        let a_len = actual.chars().count();
        let (start, lead) = if e_len.max(a_len) <= max {
            (0, 0)
        } else {
            let start = clip_start_for(e_len, a_len, max, mismatch);
            (start, if start > 0 { 3 } else { 0 })
        };
        prop_assert!(start <= mismatch);
        let column = mismatch - start + lead;
        prop_assert_eq!(e.chars().nth(column), Some('X'));
        prop_assert_eq!(a.chars().nth(column), Some('Y'));
    }
}

#[test]
fn test_known_mismatch() {
    assert_eq!(find_mismatch_position("abc", "abx", 0, false), Some(2));
    assert_eq!(find_mismatch_position("abc", "ABC", 0, true), None);
}
