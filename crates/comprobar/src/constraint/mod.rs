//! Constraints: composable conditions an actual value is checked against.
//!
//! Evaluation is a pure function of the constraint and the actual value. The
//! returned [`ConstraintResult`] carries everything needed to explain a
//! failure, so rendering never evaluates anything again.

mod collection;
mod comparison;
mod equal;
mod text;
mod types;

pub use collection::{CollectionConstraint, CollectionKind, CollectionTally};
pub use comparison::{ComparisonConstraint, ComparisonKind, RangeConstraint};
pub use equal::EqualConstraint;
pub use text::{RegexConstraint, TextConstraint, TextKind};
pub use types::{TypeConstraint, TypeKind};

use crate::equality::{MismatchKind, MismatchReport};
use crate::result::AssertResult;
use crate::value::{format_indices, indices_for, Value};
use crate::writer::TextMessageWriter;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied check used by [`PredicateConstraint`]
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A condition described in words and decided by a caller-supplied function
#[derive(Clone)]
pub struct PredicateConstraint {
    description: String,
    predicate: Arc<PredicateFn>,
}

impl PredicateConstraint {
    /// Create a predicate constraint; `description` is shown as the expectation
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Expectation text
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    fn test(&self, actual: &Value) -> bool {
        (self.predicate)(actual)
    }
}

impl fmt::Debug for PredicateConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateConstraint")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Every condition the engine can check
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Equality with an expected value
    Equal(EqualConstraint),
    /// Ordering against a bound
    Comparison(ComparisonConstraint),
    /// Inclusive range
    Range(RangeConstraint),
    /// Multiset checks over a collection
    Collection(CollectionConstraint),
    /// Substring, prefix or suffix
    Text(TextConstraint),
    /// Regular expression match
    Regex(RegexConstraint),
    /// Type relationship
    Type(TypeConstraint),
    /// Caller-supplied predicate
    Predicate(PredicateConstraint),
    /// Actual is null
    Null,
    /// Actual is `true`
    True,
    /// Actual is `false`
    False,
    /// Actual is a floating-point NaN
    NaN,
    /// Actual is an empty string or collection
    Empty,
    /// Negation
    Not(Box<Constraint>),
    /// Both must hold
    And(Box<Constraint>, Box<Constraint>),
    /// Either must hold
    Or(Box<Constraint>, Box<Constraint>),
    /// Every item of a collection satisfies the inner constraint
    AllItems(Box<Constraint>),
}

/// Why a constraint failed, beyond the expected and actual lines
#[derive(Debug, Clone, PartialEq)]
pub enum ResultDetail {
    /// Nothing beyond the description and actual value
    None,
    /// Equality mismatch located by the comparator
    Mismatch(MismatchReport),
    /// Items the collection lacked and items it had too many of
    Tally {
        /// Expected items with no match in the actual collection
        missing: Vec<Value>,
        /// Actual items with no match in the expected collection
        extra: Vec<Value>,
    },
    /// First item that failed an all-items constraint
    Item {
        /// Position of the item
        index: Vec<usize>,
        /// The item itself
        item: Value,
    },
    /// First repeated item of a collection required to be unique
    Duplicate {
        /// Position of the repetition
        index: Vec<usize>,
        /// The repeated item
        item: Value,
    },
    /// The actual value has the wrong kind for this constraint
    Incompatible {
        /// `Type` mismatch between the reference and actual operands
        report: MismatchReport,
        /// What the actual value needed to be
        required: &'static str,
    },
}

/// Outcome of evaluating a constraint against one actual value
#[derive(Debug, Clone)]
pub struct ConstraintResult<'a> {
    constraint: &'a Constraint,
    actual: &'a Value,
    passed: bool,
    detail: ResultDetail,
}

impl<'a> ConstraintResult<'a> {
    pub(crate) fn new(
        constraint: &'a Constraint,
        actual: &'a Value,
        passed: bool,
        detail: ResultDetail,
    ) -> Self {
        Self {
            constraint,
            actual,
            passed,
            detail,
        }
    }

    pub(crate) fn from_bool(constraint: &'a Constraint, actual: &'a Value, passed: bool) -> Self {
        Self::new(constraint, actual, passed, ResultDetail::None)
    }

    pub(crate) fn incompatible(
        constraint: &'a Constraint,
        actual: &'a Value,
        reference: &Value,
        required: &'static str,
    ) -> Self {
        let report = MismatchReport::new(MismatchKind::Type, reference, actual);
        Self::new(
            constraint,
            actual,
            false,
            ResultDetail::Incompatible { report, required },
        )
    }

    /// Whether the constraint held
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.passed
    }

    /// Constraint that produced this result
    #[must_use]
    pub const fn constraint(&self) -> &'a Constraint {
        self.constraint
    }

    /// Value the constraint was evaluated against
    #[must_use]
    pub const fn actual(&self) -> &'a Value {
        self.actual
    }

    /// Failure detail
    #[must_use]
    pub const fn detail(&self) -> &ResultDetail {
        &self.detail
    }

    /// Comparator mismatch, for equality and type-incompatible failures
    #[must_use]
    pub fn mismatch(&self) -> Option<&MismatchReport> {
        match &self.detail {
            ResultDetail::Mismatch(report) | ResultDetail::Incompatible { report, .. } => {
                Some(report)
            }
            _ => None,
        }
    }

    /// Write the actual value as the failure message shows it
    ///
    /// Type constraints show the actual value's type instead of the value.
    pub fn write_actual_value_to(&self, writer: &mut TextMessageWriter) {
        match self.constraint {
            Constraint::Type(_) => match self.actual.type_descriptor() {
                Some(t) => writer.write(&t.to_string()),
                None => writer.write_actual_value(&Value::Null),
            },
            _ => writer.write_actual_value(self.actual),
        }
    }

    /// Render the failure explanation
    pub fn write_message_to(&self, writer: &mut TextMessageWriter) {
        match &self.detail {
            ResultDetail::Mismatch(report) => match self.constraint {
                Constraint::Equal(equal) => {
                    writer.display_mismatch(report, equal.context(), equal.clips(), 0);
                }
                _ => writer.display_differences(self),
            },
            ResultDetail::Tally { missing, extra } => {
                writer.display_differences(self);
                writer.display_tally(missing, extra);
            }
            ResultDetail::Item { index, item } => {
                writer.display_differences(self);
                write_item_line(writer, "First non-matching item at index", index, item);
            }
            ResultDetail::Duplicate { index, item } => {
                writer.display_differences(self);
                write_item_line(writer, "Duplicate item at index", index, item);
            }
            ResultDetail::Incompatible { required, .. } => {
                writer.display_differences(self);
                writer.write_message_line(0, &format!("Actual value must be {required}"));
            }
            ResultDetail::None => writer.display_differences(self),
        }
    }
}

fn write_item_line(writer: &mut TextMessageWriter, label: &str, index: &[usize], item: &Value) {
    writer.write(&format!("  {label} {}: ", format_indices(index)));
    writer.write_value(item);
    writer.write_line("");
}

impl Constraint {
    /// Evaluate against `actual`
    #[must_use]
    pub fn evaluate<'a>(&'a self, actual: &'a Value) -> ConstraintResult<'a> {
        match self {
            Self::Equal(c) => c.evaluate(self, actual),
            Self::Comparison(c) => c.evaluate(self, actual),
            Self::Range(c) => c.evaluate(self, actual),
            Self::Collection(c) => c.evaluate(self, actual),
            Self::Text(c) => c.evaluate(self, actual),
            Self::Regex(c) => c.evaluate(self, actual),
            Self::Type(c) => c.evaluate(self, actual),
            Self::Predicate(c) => ConstraintResult::from_bool(self, actual, c.test(actual)),
            Self::Null => ConstraintResult::from_bool(self, actual, actual.is_null()),
            Self::True => {
                ConstraintResult::from_bool(self, actual, matches!(actual, Value::Bool(true)))
            }
            Self::False => {
                ConstraintResult::from_bool(self, actual, matches!(actual, Value::Bool(false)))
            }
            Self::NaN => {
                let nan = actual.as_number().is_some_and(|n| n.is_nan());
                ConstraintResult::from_bool(self, actual, nan)
            }
            Self::Empty => match actual {
                Value::Str(s) => ConstraintResult::from_bool(self, actual, s.is_empty()),
                v if v.is_sequence() => {
                    let empty = v.items().is_some_and(<[Value]>::is_empty);
                    ConstraintResult::from_bool(self, actual, empty)
                }
                _ => ConstraintResult::incompatible(
                    self,
                    actual,
                    &Value::List(Vec::new()),
                    "a string or collection",
                ),
            },
            Self::Not(inner) => {
                let passed = !inner.evaluate(actual).is_success();
                ConstraintResult::from_bool(self, actual, passed)
            }
            Self::And(left, right) => {
                let passed =
                    left.evaluate(actual).is_success() && right.evaluate(actual).is_success();
                ConstraintResult::from_bool(self, actual, passed)
            }
            Self::Or(left, right) => {
                let passed =
                    left.evaluate(actual).is_success() || right.evaluate(actual).is_success();
                ConstraintResult::from_bool(self, actual, passed)
            }
            Self::AllItems(inner) => evaluate_all_items(self, inner, actual),
        }
    }

    /// Whether `actual` satisfies the constraint
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        self.evaluate(actual).is_success()
    }

    /// Write the expectation as it appears on the `Expected:` line
    pub fn write_description_to(&self, writer: &mut TextMessageWriter) {
        match self {
            Self::Equal(c) => c.write_description_to(writer),
            Self::Comparison(c) => c.write_description_to(writer),
            Self::Range(c) => c.write_description_to(writer),
            Self::Collection(c) => c.write_description_to(writer),
            Self::Text(c) => c.write_description_to(writer),
            Self::Regex(c) => c.write_description_to(writer),
            Self::Type(c) => c.write_description_to(writer),
            Self::Predicate(c) => writer.write(c.description()),
            Self::Null => writer.write("null"),
            Self::True => writer.write("True"),
            Self::False => writer.write("False"),
            Self::NaN => writer.write("NaN"),
            Self::Empty => writer.write("<empty>"),
            Self::Not(inner) => {
                writer.write_predicate("not");
                inner.write_description_to(writer);
            }
            Self::And(left, right) => {
                left.write_description_to(writer);
                writer.write_connector("and");
                right.write_description_to(writer);
            }
            Self::Or(left, right) => {
                left.write_description_to(writer);
                writer.write_connector("or");
                right.write_description_to(writer);
            }
            Self::AllItems(inner) => {
                writer.write_predicate("all items");
                inner.write_description_to(writer);
            }
        }
    }

    /// Expectation text with default writer limits
    #[must_use]
    pub fn description(&self) -> String {
        let mut writer = TextMessageWriter::new();
        self.write_description_to(&mut writer);
        writer.finish()
    }

    /// Check arguments that could not be validated when the constraint was built
    pub fn validate(&self) -> AssertResult<()> {
        match self {
            Self::Equal(c) => c.validate(),
            Self::Comparison(c) => c.validate(),
            Self::Range(c) => c.validate(),
            Self::Not(inner) | Self::AllItems(inner) => inner.validate(),
            Self::And(left, right) | Self::Or(left, right) => {
                left.validate()?;
                right.validate()
            }
            _ => Ok(()),
        }
    }
}

/// Combinators available on every constraint type
pub trait ConstraintExt: Into<Constraint> + Sized {
    /// Negate this constraint
    #[must_use]
    fn not(self) -> Constraint {
        Constraint::Not(Box::new(self.into()))
    }

    /// Require this and `other`
    #[must_use]
    fn and(self, other: impl Into<Constraint>) -> Constraint {
        Constraint::And(Box::new(self.into()), Box::new(other.into()))
    }

    /// Require this or `other`
    #[must_use]
    fn or(self, other: impl Into<Constraint>) -> Constraint {
        Constraint::Or(Box::new(self.into()), Box::new(other.into()))
    }
}

impl<T: Into<Constraint>> ConstraintExt for T {}

fn evaluate_all_items<'a>(
    constraint: &'a Constraint,
    inner: &Constraint,
    actual: &'a Value,
) -> ConstraintResult<'a> {
    let (Some(items), Some(shape)) = (actual.items(), actual.shape()) else {
        return ConstraintResult::incompatible(
            constraint,
            actual,
            &Value::List(Vec::new()),
            "a collection",
        );
    };
    match items.iter().position(|item| !inner.matches(item)) {
        Some(i) => ConstraintResult::new(
            constraint,
            actual,
            false,
            ResultDetail::Item {
                index: indices_for(&shape, i),
                item: items[i].clone(),
            },
        ),
        None => ConstraintResult::from_bool(constraint, actual, true),
    }
}

impl From<PredicateConstraint> for Constraint {
    fn from(c: PredicateConstraint) -> Self {
        Self::Predicate(c)
    }
}
