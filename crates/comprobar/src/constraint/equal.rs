//! Equality with an expected value.

use super::{Constraint, ConstraintResult, ResultDetail};
use crate::equality::{Comparer, ComparisonContext};
use crate::result::{AssertResult, AssertionError};
use crate::value::Value;
use crate::writer::TextMessageWriter;

/// Actual must equal the expected value
#[derive(Debug, Clone)]
pub struct EqualConstraint {
    expected: Value,
    context: ComparisonContext,
    clip: bool,
}

impl EqualConstraint {
    /// Exact equality with `expected`
    #[must_use]
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
            context: ComparisonContext::new(),
            clip: true,
        }
    }

    /// Accept floating-point values within `tolerance` of the expected value
    #[must_use]
    pub fn within(mut self, tolerance: f64) -> Self {
        self.context = self.context.with_tolerance(tolerance);
        self
    }

    /// Decide equality with a custom comparer instead of the built-in rules
    #[must_use]
    pub fn using(mut self, comparer: Comparer) -> Self {
        self.context = self.context.with_comparer(comparer);
        self
    }

    /// Compare strings and chars case-insensitively
    #[must_use]
    pub fn ignore_case(mut self) -> Self {
        self.context = self.context.with_ignore_case(true);
        self
    }

    /// Show long strings in full instead of clipping them
    #[must_use]
    pub const fn no_clip(mut self) -> Self {
        self.clip = false;
        self
    }

    /// Expected value
    #[must_use]
    pub const fn expected(&self) -> &Value {
        &self.expected
    }

    /// Comparison settings
    #[must_use]
    pub const fn context(&self) -> &ComparisonContext {
        &self.context
    }

    /// Whether long strings are clipped in the failure message
    #[must_use]
    pub const fn clips(&self) -> bool {
        self.clip
    }

    pub(crate) fn validate(&self) -> AssertResult<()> {
        match self.context.tolerance() {
            Some(t) if t.is_nan() || t < 0.0 => Err(AssertionError::invalid_usage(format!(
                "tolerance must be a non-negative number, got {t:?}"
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn evaluate<'a>(
        &self,
        constraint: &'a Constraint,
        actual: &'a Value,
    ) -> ConstraintResult<'a> {
        match self.context.check(&self.expected, actual) {
            Ok(()) => ConstraintResult::from_bool(constraint, actual, true),
            Err(report) => {
                ConstraintResult::new(constraint, actual, false, ResultDetail::Mismatch(report))
            }
        }
    }

    pub(crate) fn write_description_to(&self, writer: &mut TextMessageWriter) {
        writer.write_expected_value(&self.expected);
        if let Some(tolerance) = self.context.tolerance() {
            writer.write_connector("+/-");
            writer.write_expected_value(&Value::from(tolerance));
        }
        if self.context.ignore_case() {
            writer.write_modifier("ignoring case");
        }
    }
}

impl From<EqualConstraint> for Constraint {
    fn from(c: EqualConstraint) -> Self {
        Self::Equal(c)
    }
}
