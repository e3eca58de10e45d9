//! Collection constraints.
//!
//! Containment, subset and equivalence are multiset checks: order does not
//! matter but the number of occurrences does. Element equality goes through
//! the constraint's [`ComparisonContext`], so a custom comparer or case
//! folding applies to every element.

use super::{Constraint, ConstraintResult, ResultDetail};
use crate::equality::{Comparer, ComparisonContext};
use crate::value::{indices_for, Value};
use crate::writer::TextMessageWriter;

const REQUIRED: &str = "a collection";

/// Which collection property is checked
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionKind {
    /// No two items are equal
    Unique,
    /// At least one item equals the given value
    Contains(Value),
    /// Every item can be matched against a distinct item of the superset
    Subset(Vec<Value>),
    /// Same items with the same multiplicities, in any order
    Equivalent(Vec<Value>),
}

/// Actual must be a collection with the given property
#[derive(Debug, Clone)]
pub struct CollectionConstraint {
    kind: CollectionKind,
    context: ComparisonContext,
}

impl CollectionConstraint {
    /// Check `kind` with the built-in equality rules
    #[must_use]
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            context: ComparisonContext::new(),
        }
    }

    /// Compare items with a custom comparer
    #[must_use]
    pub fn using(mut self, comparer: Comparer) -> Self {
        self.context = self.context.with_comparer(comparer);
        self
    }

    /// Compare string and char items case-insensitively
    #[must_use]
    pub fn ignore_case(mut self) -> Self {
        self.context = self.context.with_ignore_case(true);
        self
    }

    /// Property being checked
    #[must_use]
    pub const fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    pub(crate) fn evaluate<'a>(
        &self,
        constraint: &'a Constraint,
        actual: &'a Value,
    ) -> ConstraintResult<'a> {
        let (Some(items), Some(shape)) = (actual.items(), actual.shape()) else {
            let reference = match &self.kind {
                CollectionKind::Subset(items) | CollectionKind::Equivalent(items) => {
                    Value::List(items.clone())
                }
                _ => Value::List(Vec::new()),
            };
            return ConstraintResult::incompatible(constraint, actual, &reference, REQUIRED);
        };

        match &self.kind {
            CollectionKind::Unique => {
                let mut seen: Vec<&Value> = Vec::with_capacity(items.len());
                let mut duplicate = None;
                for (i, item) in items.iter().enumerate() {
                    if seen.iter().any(|s| self.context.equals(s, item)) {
                        duplicate.get_or_insert(i);
                    } else {
                        seen.push(item);
                    }
                }
                match duplicate {
                    Some(i) => ConstraintResult::new(
                        constraint,
                        actual,
                        false,
                        ResultDetail::Duplicate {
                            index: indices_for(&shape, i),
                            item: items[i].clone(),
                        },
                    ),
                    None => ConstraintResult::from_bool(constraint, actual, true),
                }
            }
            CollectionKind::Contains(expected) => {
                let found = items.iter().any(|item| self.context.equals(expected, item));
                ConstraintResult::from_bool(constraint, actual, found)
            }
            CollectionKind::Subset(superset) => {
                let mut tally = CollectionTally::new(&self.context, superset.iter().cloned());
                let extra = tally.unmatched(items);
                let passed = extra.is_empty();
                tally_result(constraint, actual, passed, Vec::new(), extra)
            }
            CollectionKind::Equivalent(expected) => {
                let mut tally = CollectionTally::new(&self.context, expected.iter().cloned());
                let extra = tally.unmatched(items);
                let missing = tally.into_remaining();
                let passed = extra.is_empty() && missing.is_empty();
                tally_result(constraint, actual, passed, missing, extra)
            }
        }
    }

    pub(crate) fn write_description_to(&self, writer: &mut TextMessageWriter) {
        let max = writer.config().max_collection_items;
        match &self.kind {
            CollectionKind::Unique => writer.write("all items unique"),
            CollectionKind::Contains(item) => {
                writer.write_predicate("collection containing");
                writer.write_expected_value(item);
            }
            CollectionKind::Subset(items) => {
                writer.write_predicate("subset of");
                writer.write_collection_elements(items, 0, max);
            }
            CollectionKind::Equivalent(items) => {
                writer.write_predicate("equivalent to");
                writer.write_collection_elements(items, 0, max);
            }
        }
        if self.context.ignore_case() {
            writer.write_modifier("ignoring case");
        }
    }
}

fn tally_result<'a>(
    constraint: &'a Constraint,
    actual: &'a Value,
    passed: bool,
    missing: Vec<Value>,
    extra: Vec<Value>,
) -> ConstraintResult<'a> {
    if passed {
        ConstraintResult::from_bool(constraint, actual, true)
    } else {
        ConstraintResult::new(
            constraint,
            actual,
            false,
            ResultDetail::Tally { missing, extra },
        )
    }
}

/// Multiset of reference items keyed by comparator equality
///
/// Each successful [`try_remove`](Self::try_remove) consumes one occurrence.
#[derive(Debug, Clone)]
pub struct CollectionTally<'c> {
    context: &'c ComparisonContext,
    remaining: Vec<Value>,
}

impl<'c> CollectionTally<'c> {
    /// Tally `items` using `context` for equality
    pub fn new(context: &'c ComparisonContext, items: impl IntoIterator<Item = Value>) -> Self {
        Self {
            context,
            remaining: items.into_iter().collect(),
        }
    }

    /// Consume one occurrence of `item`; `false` when none is left
    pub fn try_remove(&mut self, item: &Value) -> bool {
        match self
            .remaining
            .iter()
            .position(|r| self.context.equals(r, item))
        {
            Some(i) => {
                self.remaining.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove each of `items`, returning those that found no match
    pub fn unmatched(&mut self, items: &[Value]) -> Vec<Value> {
        items
            .iter()
            .filter(|item| !self.try_remove(item))
            .cloned()
            .collect()
    }

    /// Occurrences not consumed yet
    #[must_use]
    pub fn remaining(&self) -> &[Value] {
        &self.remaining
    }

    /// Number of occurrences not consumed yet
    #[must_use]
    pub fn count(&self) -> usize {
        self.remaining.len()
    }

    /// Take the occurrences not consumed yet
    #[must_use]
    pub fn into_remaining(self) -> Vec<Value> {
        self.remaining
    }
}

impl From<CollectionConstraint> for Constraint {
    fn from(c: CollectionConstraint) -> Self {
        Self::Collection(c)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Vec<Value> {
        items.into_iter().map(Into::into).collect()
    }

    fn collection(kind: CollectionKind) -> Constraint {
        CollectionConstraint::new(kind).into()
    }

    fn equivalent<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Constraint {
        collection(CollectionKind::Equivalent(values(items)))
    }

    mod tally_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_multiplicity() {
            let context = ComparisonContext::new();
            let mut tally = CollectionTally::new(&context, values([1, 2, 2]));
            assert!(tally.try_remove(&Value::from(2)));
            assert!(tally.try_remove(&Value::from(2)));
            assert!(!tally.try_remove(&Value::from(2)));
            assert_eq!(tally.count(), 1);
            assert_eq!(tally.remaining(), &[Value::from(1)]);
        }

        #[test]
        fn test_comparer_keyed() {
            let context = ComparisonContext::new().with_ignore_case(true);
            let mut tally = CollectionTally::new(&context, values(["A", "b"]));
            assert_eq!(tally.unmatched(&values(["a", "B", "c"])), values(["c"]));
        }
    }

    mod equivalence_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_permutation() {
            assert!(equivalent([1, 2, 3]).matches(&Value::from(vec![3, 2, 1])));
            assert!(equivalent([1, 2, 2]).matches(&Value::from(vec![2, 1, 2])));
        }

        #[test]
        fn test_multiplicity_differs() {
            let c = equivalent([1, 2, 3]);
            let actual = Value::from(vec![1, 2, 2]);
            let result = c.evaluate(&actual);
            assert_eq!(
                result.detail(),
                &ResultDetail::Tally {
                    missing: values([3]),
                    extra: values([2]),
                }
            );
        }

        #[test]
        fn test_message() {
            let c = equivalent([1, 2, 3]);
            let actual = Value::from(vec![1, 2, 2]);
            let mut writer = TextMessageWriter::new();
            c.evaluate(&actual).write_message_to(&mut writer);
            assert_eq!(
                writer.finish(),
                "  Expected: equivalent to < 1, 2, 3 >\n\
                 \x20 But was:  < 1, 2, 2 >\n\
                 \x20 Missing:  < 3 >\n\
                 \x20 Extra:    < 2 >"
            );
        }

        #[test]
        fn test_different_lengths() {
            assert!(!equivalent([1, 2]).matches(&Value::from(vec![1, 2, 2])));
            assert!(!equivalent([1, 2, 2]).matches(&Value::from(vec![1, 2])));
        }

        #[test]
        fn test_ignore_case() {
            let c: Constraint = CollectionConstraint::new(CollectionKind::Equivalent(values(["A"])))
                .ignore_case()
                .into();
            assert!(c.matches(&Value::from(vec!["a"])));
            assert_eq!(c.description(), "equivalent to < \"A\" >, ignoring case");
        }
    }

    mod subset_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_subset() {
            let c = collection(CollectionKind::Subset(values([1, 2, 3])));
            assert!(c.matches(&Value::from(vec![3, 1])));
            assert!(c.matches(&Value::from(Vec::<i32>::new())));
            assert!(!c.matches(&Value::from(vec![1, 1])));
            assert!(!c.matches(&Value::from(vec![4])));
        }
    }

    mod unique_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_unique() {
            let c = collection(CollectionKind::Unique);
            assert!(c.matches(&Value::from(vec![1, 2, 3])));
            let actual = Value::from(vec![1, 2, 1, 2]);
            let result = c.evaluate(&actual);
            assert_eq!(
                result.detail(),
                &ResultDetail::Duplicate {
                    index: vec![2],
                    item: Value::from(1)
                }
            );
        }

        #[test]
        fn test_unique_with_tolerance_free_numbers() {
            let c = collection(CollectionKind::Unique);
            assert!(!c.matches(&Value::from(vec![Value::from(1u8), Value::from(1i64)])));
        }
    }

    mod contains_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_contains() {
            let c = collection(CollectionKind::Contains(Value::from(3)));
            assert!(c.matches(&Value::from([1, 2, 3])));
            assert!(!c.matches(&Value::from([1, 2])));
            assert_eq!(c.description(), "collection containing 3");
        }

        #[test]
        fn test_not_a_collection() {
            let c = collection(CollectionKind::Contains(Value::from(3)));
            let actual = Value::from(3);
            let result = c.evaluate(&actual);
            assert!(matches!(
                result.detail(),
                ResultDetail::Incompatible { required: "a collection", .. }
            ));
        }
    }
}
