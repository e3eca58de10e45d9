//! Factories for building constraints.
//!
//! ```
//! use comprobar::prelude::*;
//!
//! Assert::that(4, Is::greater_than(3).and(Is::less_than(5))).unwrap();
//! Assert::that(vec![3, 1, 2], Is::equivalent_to([1, 2, 3])).unwrap();
//! Assert::that("Hello", Text::starts_with("he").ignore_case()).unwrap();
//! ```

use crate::constraint::{
    CollectionConstraint, CollectionKind, ComparisonConstraint, ComparisonKind, Constraint,
    EqualConstraint, PredicateConstraint, RangeConstraint, RegexConstraint, TextConstraint,
    TextKind, TypeConstraint, TypeKind,
};
use crate::result::AssertResult;
use crate::value::{TypeDescriptor, Value};

/// Value constraints
#[derive(Debug, Clone, Copy)]
pub struct Is;

impl Is {
    /// Equal to `expected`
    #[must_use]
    pub fn equal_to(expected: impl Into<Value>) -> EqualConstraint {
        EqualConstraint::new(expected)
    }

    /// Negate `constraint`
    #[must_use]
    pub fn not(constraint: impl Into<Constraint>) -> Constraint {
        Constraint::Not(Box::new(constraint.into()))
    }

    /// Null
    #[must_use]
    pub const fn null() -> Constraint {
        Constraint::Null
    }

    /// Anything but null
    #[must_use]
    pub fn not_null() -> Constraint {
        Self::not(Constraint::Null)
    }

    /// `true`
    #[must_use]
    pub const fn true_() -> Constraint {
        Constraint::True
    }

    /// `false`
    #[must_use]
    pub const fn false_() -> Constraint {
        Constraint::False
    }

    /// Floating-point NaN
    #[must_use]
    pub const fn nan() -> Constraint {
        Constraint::NaN
    }

    /// Empty string or collection
    #[must_use]
    pub const fn empty() -> Constraint {
        Constraint::Empty
    }

    /// Non-empty string or collection
    #[must_use]
    pub fn not_empty() -> Constraint {
        Self::not(Constraint::Empty)
    }

    /// Collection without repeated items
    #[must_use]
    pub fn unique() -> CollectionConstraint {
        CollectionConstraint::new(CollectionKind::Unique)
    }

    /// Greater than `bound`
    #[must_use]
    pub fn greater_than(bound: impl Into<Value>) -> ComparisonConstraint {
        ComparisonConstraint::new(ComparisonKind::GreaterThan, bound)
    }

    /// Greater than or equal to `bound`
    #[must_use]
    pub fn greater_than_or_equal_to(bound: impl Into<Value>) -> ComparisonConstraint {
        ComparisonConstraint::new(ComparisonKind::GreaterThanOrEqual, bound)
    }

    /// Less than `bound`
    #[must_use]
    pub fn less_than(bound: impl Into<Value>) -> ComparisonConstraint {
        ComparisonConstraint::new(ComparisonKind::LessThan, bound)
    }

    /// Less than or equal to `bound`
    #[must_use]
    pub fn less_than_or_equal_to(bound: impl Into<Value>) -> ComparisonConstraint {
        ComparisonConstraint::new(ComparisonKind::LessThanOrEqual, bound)
    }

    /// Same as [`greater_than_or_equal_to`](Self::greater_than_or_equal_to)
    #[must_use]
    pub fn at_least(bound: impl Into<Value>) -> ComparisonConstraint {
        Self::greater_than_or_equal_to(bound)
    }

    /// Same as [`less_than_or_equal_to`](Self::less_than_or_equal_to)
    #[must_use]
    pub fn at_most(bound: impl Into<Value>) -> ComparisonConstraint {
        Self::less_than_or_equal_to(bound)
    }

    /// Between `low` and `high` inclusive
    pub fn in_range(
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> AssertResult<RangeConstraint> {
        RangeConstraint::new(low, high)
    }

    /// Of type `expected` or one of its descendants
    #[must_use]
    pub const fn instance_of(expected: TypeDescriptor) -> TypeConstraint {
        TypeConstraint::new(TypeKind::InstanceOf, expected)
    }

    /// Of the type Rust values of `T` convert into
    #[must_use]
    pub fn instance_of_type<T>() -> TypeConstraint
    where
        T: Default + Into<Value>,
    {
        Self::instance_of(TypeDescriptor::of::<T>())
    }

    /// Of a type `expected` can be used as
    #[must_use]
    pub const fn assignable_from(expected: TypeDescriptor) -> TypeConstraint {
        TypeConstraint::new(TypeKind::AssignableFrom, expected)
    }

    /// Same items as `expected` with the same multiplicities, in any order
    #[must_use]
    pub fn equivalent_to<T: Into<Value>>(
        expected: impl IntoIterator<Item = T>,
    ) -> CollectionConstraint {
        CollectionConstraint::new(CollectionKind::Equivalent(collect(expected)))
    }

    /// Every item matched by a distinct item of `superset`
    #[must_use]
    pub fn subset_of<T: Into<Value>>(
        superset: impl IntoIterator<Item = T>,
    ) -> CollectionConstraint {
        CollectionConstraint::new(CollectionKind::Subset(collect(superset)))
    }

    /// Accepted by `predicate`, described as `description`
    #[must_use]
    pub fn matching<F>(description: impl Into<String>, predicate: F) -> Constraint
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        PredicateConstraint::new(description, predicate).into()
    }
}

/// Collection membership constraints
#[derive(Debug, Clone, Copy)]
pub struct Has;

impl Has {
    /// Collection containing `item`
    #[must_use]
    pub fn member(item: impl Into<Value>) -> CollectionConstraint {
        CollectionConstraint::new(CollectionKind::Contains(item.into()))
    }

    /// Collection whose items all satisfy `constraint`
    #[must_use]
    pub fn all(constraint: impl Into<Constraint>) -> Constraint {
        Constraint::AllItems(Box::new(constraint.into()))
    }
}

/// String constraints
#[derive(Debug, Clone, Copy)]
pub struct Text;

impl Text {
    /// String containing `expected`
    #[must_use]
    pub fn contains(expected: impl Into<String>) -> TextConstraint {
        TextConstraint::new(TextKind::Contains, expected)
    }

    /// String starting with `expected`
    #[must_use]
    pub fn starts_with(expected: impl Into<String>) -> TextConstraint {
        TextConstraint::new(TextKind::StartsWith, expected)
    }

    /// String ending with `expected`
    #[must_use]
    pub fn ends_with(expected: impl Into<String>) -> TextConstraint {
        TextConstraint::new(TextKind::EndsWith, expected)
    }

    /// String matched by the regular expression `pattern`
    pub fn matches(pattern: &str) -> AssertResult<RegexConstraint> {
        RegexConstraint::new(pattern)
    }

    /// String matched case-insensitively by `pattern`
    pub fn matches_ignoring_case(pattern: &str) -> AssertResult<RegexConstraint> {
        RegexConstraint::ignoring_case(pattern)
    }
}

fn collect<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Vec<Value> {
    items.into_iter().map(Into::into).collect()
}
