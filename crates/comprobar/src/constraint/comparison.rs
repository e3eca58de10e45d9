//! Ordering constraints.

use super::{Constraint, ConstraintResult};
use crate::equality::{Comparer, ComparisonContext};
use crate::result::{AssertResult, AssertionError};
use crate::value::Value;
use crate::writer::TextMessageWriter;
use std::cmp::Ordering;

const UNORDERED: &str = "comparable with the expected bound";

/// Which side of the bound the actual value must be on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonKind {
    /// `actual > bound`
    GreaterThan,
    /// `actual >= bound`
    GreaterThanOrEqual,
    /// `actual < bound`
    LessThan,
    /// `actual <= bound`
    LessThanOrEqual,
}

impl ComparisonKind {
    /// Words used in the description
    #[must_use]
    pub const fn predicate(self) -> &'static str {
        match self {
            Self::GreaterThan => "greater than",
            Self::GreaterThanOrEqual => "greater than or equal to",
            Self::LessThan => "less than",
            Self::LessThanOrEqual => "less than or equal to",
        }
    }

    /// Whether `actual.cmp(bound)` satisfies this kind
    #[must_use]
    pub const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::GreaterThan => matches!(ordering, Ordering::Greater),
            Self::GreaterThanOrEqual => !matches!(ordering, Ordering::Less),
            Self::LessThan => matches!(ordering, Ordering::Less),
            Self::LessThanOrEqual => !matches!(ordering, Ordering::Greater),
        }
    }
}

/// Actual must be ordered against a bound
#[derive(Debug, Clone)]
pub struct ComparisonConstraint {
    kind: ComparisonKind,
    bound: Value,
    context: ComparisonContext,
}

impl ComparisonConstraint {
    /// Compare against `bound`
    #[must_use]
    pub fn new(kind: ComparisonKind, bound: impl Into<Value>) -> Self {
        Self {
            kind,
            bound: bound.into(),
            context: ComparisonContext::new(),
        }
    }

    /// Order values with a custom comparer
    #[must_use]
    pub fn using(mut self, comparer: Comparer) -> Self {
        self.context = self.context.with_comparer(comparer);
        self
    }

    /// Comparison kind
    #[must_use]
    pub const fn kind(&self) -> ComparisonKind {
        self.kind
    }

    /// Bound
    #[must_use]
    pub const fn bound(&self) -> &Value {
        &self.bound
    }

    pub(crate) fn validate(&self) -> AssertResult<()> {
        require_ordering(&self.context)
    }

    pub(crate) fn evaluate<'a>(
        &self,
        constraint: &'a Constraint,
        actual: &'a Value,
    ) -> ConstraintResult<'a> {
        match self.context.compare(actual, &self.bound) {
            Some(ordering) => {
                ConstraintResult::from_bool(constraint, actual, self.kind.accepts(ordering))
            }
            None => unordered(constraint, actual, &self.bound),
        }
    }

    pub(crate) fn write_description_to(&self, writer: &mut TextMessageWriter) {
        writer.write_predicate(self.kind.predicate());
        writer.write_expected_value(&self.bound);
    }
}

/// Actual must lie between two bounds, both inclusive
#[derive(Debug, Clone)]
pub struct RangeConstraint {
    low: Value,
    high: Value,
    context: ComparisonContext,
}

impl RangeConstraint {
    /// Range `[low, high]`; the bounds must be ordered and `low <= high`
    pub fn new(low: impl Into<Value>, high: impl Into<Value>) -> AssertResult<Self> {
        let (low, high) = (low.into(), high.into());
        let context = ComparisonContext::new();
        match context.compare(&low, &high) {
            Some(Ordering::Greater) => Err(AssertionError::invalid_usage(format!(
                "range lower bound {low} is greater than upper bound {high}"
            ))),
            Some(_) => Ok(Self { low, high, context }),
            None => Err(AssertionError::invalid_usage(format!(
                "range bounds {low} and {high} cannot be ordered"
            ))),
        }
    }

    /// Order values with a custom comparer
    #[must_use]
    pub fn using(mut self, comparer: Comparer) -> Self {
        self.context = self.context.with_comparer(comparer);
        self
    }

    /// Lower bound
    #[must_use]
    pub const fn low(&self) -> &Value {
        &self.low
    }

    /// Upper bound
    #[must_use]
    pub const fn high(&self) -> &Value {
        &self.high
    }

    pub(crate) fn validate(&self) -> AssertResult<()> {
        require_ordering(&self.context)
    }

    pub(crate) fn evaluate<'a>(
        &self,
        constraint: &'a Constraint,
        actual: &'a Value,
    ) -> ConstraintResult<'a> {
        let above = self.context.compare(actual, &self.low);
        let below = self.context.compare(actual, &self.high);
        match (above, below) {
            (Some(above), Some(below)) => ConstraintResult::from_bool(
                constraint,
                actual,
                above != Ordering::Less && below != Ordering::Greater,
            ),
            _ => unordered(constraint, actual, &self.low),
        }
    }

    pub(crate) fn write_description_to(&self, writer: &mut TextMessageWriter) {
        writer.write_predicate("in range");
        writer.write("(");
        writer.write_expected_value(&self.low);
        writer.write(", ");
        writer.write_expected_value(&self.high);
        writer.write(")");
    }
}

// An equality comparer has no notion of order.
fn require_ordering(context: &ComparisonContext) -> AssertResult<()> {
    match context.comparer() {
        Some(Comparer::Equality(_)) => Err(AssertionError::invalid_usage(
            "ordering constraints need an ordering comparer, not an equality comparer",
        )),
        _ => Ok(()),
    }
}

// NaN against a number is a plain failure; anything else cannot be ordered at all.
fn unordered<'a>(
    constraint: &'a Constraint,
    actual: &'a Value,
    reference: &Value,
) -> ConstraintResult<'a> {
    if actual.as_number().is_some() && reference.as_number().is_some() {
        ConstraintResult::from_bool(constraint, actual, false)
    } else {
        ConstraintResult::incompatible(constraint, actual, reference, UNORDERED)
    }
}

impl From<ComparisonConstraint> for Constraint {
    fn from(c: ComparisonConstraint) -> Self {
        Self::Comparison(c)
    }
}

impl From<RangeConstraint> for Constraint {
    fn from(c: RangeConstraint) -> Self {
        Self::Range(c)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::constraint::ResultDetail;
    use crate::syntax::Is;

    fn holds(c: impl Into<Constraint>, actual: impl Into<Value>) -> bool {
        c.into().matches(&actual.into())
    }

    mod comparison_tests {
        use super::*;

        #[test]
        fn test_kinds() {
            let five = |kind| ComparisonConstraint::new(kind, 5);
            assert!(holds(five(ComparisonKind::GreaterThan), 6));
            assert!(!holds(five(ComparisonKind::GreaterThan), 5));
            assert!(holds(five(ComparisonKind::GreaterThanOrEqual), 5));
            assert!(holds(five(ComparisonKind::LessThan), 4.5));
            assert!(holds(five(ComparisonKind::LessThanOrEqual), 5u8));
            assert!(!holds(five(ComparisonKind::LessThanOrEqual), 6));
        }

        #[test]
        fn test_strings() {
            assert!(holds(ComparisonConstraint::new(ComparisonKind::LessThan, "b"), "a"));
        }

        #[test]
        fn test_nan_fails_plainly() {
            let c = Constraint::from(ComparisonConstraint::new(ComparisonKind::GreaterThan, 0));
            let actual = Value::from(f64::NAN);
            let result = c.evaluate(&actual);
            assert!(!result.is_success());
            assert_eq!(result.detail(), &ResultDetail::None);
        }

        #[test]
        fn test_incomparable_is_type_mismatch() {
            let c = Constraint::from(ComparisonConstraint::new(ComparisonKind::GreaterThan, 0));
            let actual = Value::from("zero");
            let result = c.evaluate(&actual);
            assert!(matches!(result.detail(), ResultDetail::Incompatible { .. }));
        }

        #[test]
        fn test_using_ordering_comparer() {
            let by_len = Comparer::ordering(|a, b| a.len().cmp(&b.len()));
            let c = ComparisonConstraint::new(ComparisonKind::GreaterThan, "abc").using(by_len);
            assert!(holds(c, "wxyz"));
        }

        #[test]
        fn test_equality_comparer_is_invalid_usage() {
            let same = Comparer::equality(|a, b| a == b);
            let c = Constraint::from(
                ComparisonConstraint::new(ComparisonKind::GreaterThan, 5).using(same),
            );
            assert!(c.validate().unwrap_err().is_invalid_usage());
            assert!(Is::not(c).validate().unwrap_err().is_invalid_usage());
        }

        #[test]
        fn test_descriptions() {
            let c = Constraint::from(ComparisonConstraint::new(
                ComparisonKind::GreaterThanOrEqual,
                5,
            ));
            assert_eq!(c.description(), "greater than or equal to 5");
        }
    }

    mod range_tests {
        use super::*;

        #[test]
        fn test_inclusive() {
            let range = RangeConstraint::new(1, 5).unwrap();
            assert!(holds(range.clone(), 1));
            assert!(holds(range.clone(), 5));
            assert!(holds(range.clone(), 3.5));
            assert!(!holds(range.clone(), 0));
            assert!(!holds(range, 5.01));
        }

        #[test]
        fn test_inverted_bounds() {
            let err = RangeConstraint::new(5, 1).unwrap_err();
            assert!(err.is_invalid_usage());
        }

        #[test]
        fn test_unordered_bounds() {
            assert!(RangeConstraint::new("a", 1).unwrap_err().is_invalid_usage());
        }

        #[test]
        fn test_equality_comparer_is_invalid_usage() {
            let same = Comparer::equality(|a, b| a == b);
            let c = Constraint::from(RangeConstraint::new(1, 5).unwrap().using(same));
            assert!(c.validate().unwrap_err().is_invalid_usage());
            let by_len = Comparer::ordering(|a, b| a.len().cmp(&b.len()));
            let c = Constraint::from(RangeConstraint::new(1, 5).unwrap().using(by_len));
            assert!(c.validate().is_ok());
        }

        #[test]
        fn test_description() {
            let c = Constraint::from(RangeConstraint::new(1, 5).unwrap());
            assert_eq!(c.description(), "in range (1, 5)");
        }
    }
}
