//! Equality and ordering of dynamic values.
//!
//! Resolution order for equality (first applicable wins):
//!
//! 1. both null
//! 2. custom comparer, used exclusively
//! 3. numbers, widened; tolerance applies to floating-point kinds only
//! 4. strings and chars, optionally case-insensitive
//! 5. lists and arrays, shape first, then element by element
//! 6. structural equality (bools, objects)

use crate::value::{indices_for, Number, Value, Widened};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied equality function
pub type EqualityFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;

/// Caller-supplied ordering function
pub type OrderingFn = dyn Fn(&Value, &Value) -> Ordering + Send + Sync;

/// A custom comparer injected into a constraint
#[derive(Clone)]
pub enum Comparer {
    /// Decides equality only
    Equality(Arc<EqualityFn>),
    /// Total ordering; equal means `Ordering::Equal`
    Ordering(Arc<OrderingFn>),
}

impl Comparer {
    /// Wrap an equality function
    pub fn equality<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self::Equality(Arc::new(f))
    }

    /// Wrap an ordering function
    pub fn ordering<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        Self::Ordering(Arc::new(f))
    }

    /// Whether the comparer considers the two values equal
    #[must_use]
    pub fn are_equal(&self, expected: &Value, actual: &Value) -> bool {
        match self {
            Self::Equality(f) => f(expected, actual),
            Self::Ordering(f) => f(expected, actual) == Ordering::Equal,
        }
    }

    /// Ordering of the two values; equality-only comparers cannot order
    #[must_use]
    pub fn compare(&self, left: &Value, right: &Value) -> Option<Ordering> {
        match self {
            Self::Equality(_) => None,
            Self::Ordering(f) => Some(f(left, right)),
        }
    }
}

impl fmt::Debug for Comparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equality(_) => f.write_str("Comparer::Equality(..)"),
            Self::Ordering(_) => f.write_str("Comparer::Ordering(..)"),
        }
    }
}

/// What kind of difference a comparison found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// Values of the same category differ
    Value,
    /// Sequences differ in rank or in a trailing dimension
    Length,
    /// Sequences agree in rank but one runs out before the other
    IndexBound,
    /// Operands of unrelated categories
    Type,
}

/// Description of where and how two values differ
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchReport {
    kind: MismatchKind,
    index: Vec<usize>,
    actual_index: Vec<usize>,
    field: Option<String>,
    expected: Value,
    actual: Value,
    cause: Option<Box<MismatchReport>>,
}

impl MismatchReport {
    /// A mismatch between two operands with no further location
    #[must_use]
    pub fn new(kind: MismatchKind, expected: &Value, actual: &Value) -> Self {
        Self {
            kind,
            index: Vec::new(),
            actual_index: Vec::new(),
            field: None,
            expected: expected.clone(),
            actual: actual.clone(),
            cause: None,
        }
    }

    #[must_use]
    fn at_index(mut self, index: Vec<usize>) -> Self {
        self.actual_index.clone_from(&index);
        self.index = index;
        self
    }

    #[must_use]
    fn at_indices(mut self, expected: Vec<usize>, actual: Vec<usize>) -> Self {
        self.index = expected;
        self.actual_index = actual;
        self
    }

    #[must_use]
    fn at_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    #[must_use]
    fn caused_by(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Kind of mismatch
    #[must_use]
    pub const fn kind(&self) -> MismatchKind {
        self.kind
    }

    /// Per-dimension index of the offending element (empty when not positional)
    #[must_use]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Index of the offending element in the actual operand
    ///
    /// Differs from [`index`](Self::index) only for `Length` mismatches,
    /// where the two operands have different shapes.
    #[must_use]
    pub fn actual_index(&self) -> &[usize] {
        &self.actual_index
    }

    /// Name of the offending field when objects differ
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Expected operand at this level
    #[must_use]
    pub const fn expected(&self) -> &Value {
        &self.expected
    }

    /// Actual operand at this level
    #[must_use]
    pub const fn actual(&self) -> &Value {
        &self.actual
    }

    /// Element-level mismatch that caused this one
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    /// Innermost mismatch
    #[must_use]
    pub fn leaf(&self) -> &Self {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    /// Number of nested levels below this one
    #[must_use]
    pub fn depth(&self) -> usize {
        self.cause().map_or(0, |c| 1 + c.depth())
    }
}

/// Capabilities a comparison runs with
#[derive(Debug, Clone, Default)]
pub struct ComparisonContext {
    tolerance: Option<f64>,
    comparer: Option<Comparer>,
    ignore_case: bool,
}

impl ComparisonContext {
    /// Context with exact comparison and no custom comparer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the floating-point tolerance
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Set a custom comparer
    #[must_use]
    pub fn with_comparer(mut self, comparer: Comparer) -> Self {
        self.comparer = Some(comparer);
        self
    }

    /// Compare strings and chars case-insensitively
    #[must_use]
    pub const fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Configured tolerance
    #[must_use]
    pub const fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    /// Configured comparer
    #[must_use]
    pub const fn comparer(&self) -> Option<&Comparer> {
        self.comparer.as_ref()
    }

    /// Whether case is ignored
    #[must_use]
    pub const fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Whether the two values are equal
    #[must_use]
    pub fn equals(&self, expected: &Value, actual: &Value) -> bool {
        self.check(expected, actual).is_ok()
    }

    /// Compare two values, describing the first difference on failure
    pub fn check(&self, expected: &Value, actual: &Value) -> Result<(), MismatchReport> {
        if expected.is_null() && actual.is_null() {
            return Ok(());
        }
        if let Some(comparer) = &self.comparer {
            return if comparer.are_equal(expected, actual) {
                Ok(())
            } else {
                Err(MismatchReport::new(MismatchKind::Value, expected, actual))
            };
        }
        let equal = match (expected, actual) {
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Number(e), Value::Number(a)) => self.numbers_equal(*e, *a),
            (Value::Str(e), Value::Str(a)) => self.strings_equal(e, a),
            (Value::Char(e), Value::Char(a)) => self.chars_equal(*e, *a),
            (e, a) if e.is_sequence() && a.is_sequence() => {
                return self.check_sequences(expected, actual);
            }
            (Value::Bool(e), Value::Bool(a)) => e == a,
            (Value::Object(_), Value::Object(_)) => return self.check_objects(expected, actual),
            _ => {
                return Err(MismatchReport::new(MismatchKind::Type, expected, actual));
            }
        };
        if equal {
            Ok(())
        } else {
            Err(MismatchReport::new(MismatchKind::Value, expected, actual))
        }
    }

    /// Order two values, `None` when they are not comparable
    #[must_use]
    pub fn compare(&self, left: &Value, right: &Value) -> Option<Ordering> {
        if let Some(comparer) = &self.comparer {
            return comparer.compare(left, right);
        }
        match (left, right) {
            (Value::Number(l), Value::Number(r)) => match (l.widen(), r.widen()) {
                (Widened::Integer(l), Widened::Integer(r)) => Some(l.cmp(&r)),
                _ => l.as_f64().partial_cmp(&r.as_f64()),
            },
            (Value::Str(l), Value::Str(r)) if self.ignore_case => {
                Some(l.to_lowercase().cmp(&r.to_lowercase()))
            }
            (Value::Str(l), Value::Str(r)) => Some(l.cmp(r)),
            (Value::Char(l), Value::Char(r)) => Some(l.cmp(r)),
            (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
            _ => None,
        }
    }

    fn numbers_equal(&self, expected: Number, actual: Number) -> bool {
        if let (Widened::Integer(e), Widened::Integer(a)) = (expected.widen(), actual.widen()) {
            return e == a;
        }
        let (e, a) = (expected.as_f64(), actual.as_f64());
        // NaN and infinities only ever match exactly, whatever the tolerance.
        if e.is_nan() || e.is_infinite() {
            return exact_float_eq(e, a);
        }
        match self.tolerance {
            Some(tolerance) => (e - a).abs() <= tolerance,
            None => exact_float_eq(e, a),
        }
    }

    fn strings_equal(&self, expected: &str, actual: &str) -> bool {
        if self.ignore_case {
            expected.to_lowercase() == actual.to_lowercase()
        } else {
            expected == actual
        }
    }

    fn chars_equal(&self, expected: char, actual: char) -> bool {
        if self.ignore_case {
            expected.to_lowercase().eq(actual.to_lowercase())
        } else {
            expected == actual
        }
    }

    fn check_sequences(&self, expected: &Value, actual: &Value) -> Result<(), MismatchReport> {
        let (Some(e_shape), Some(a_shape)) = (expected.shape(), actual.shape()) else {
            return Err(MismatchReport::new(MismatchKind::Type, expected, actual));
        };
        let e_items = expected.items().unwrap_or_default();
        let a_items = actual.items().unwrap_or_default();

        if e_shape.len() != a_shape.len() || e_shape[1..] != a_shape[1..] {
            // Shapes disagree; still locate the first differing item in
            // row-major order so diagnostics can point at it.
            let report = MismatchReport::new(MismatchKind::Length, expected, actual);
            for (i, (e, a)) in e_items.iter().zip(a_items).enumerate() {
                if let Err(cause) = self.check(e, a) {
                    return Err(report
                        .at_indices(indices_for(&e_shape, i), indices_for(&a_shape, i))
                        .caused_by(cause));
                }
            }
            if e_items.len() == a_items.len() {
                return Err(report);
            }
            let boundary = e_items.len().min(a_items.len());
            return Err(report.at_indices(
                indices_for(&e_shape, boundary),
                indices_for(&a_shape, boundary),
            ));
        }
        if e_shape[0] != a_shape[0] {
            let row: usize = e_shape[1..].iter().product();
            let boundary = e_shape[0].min(a_shape[0]) * row;
            return Err(
                MismatchReport::new(MismatchKind::IndexBound, expected, actual)
                    .at_index(indices_for(&e_shape, boundary)),
            );
        }

        for (i, (e, a)) in e_items.iter().zip(a_items).enumerate() {
            if let Err(cause) = self.check(e, a) {
                return Err(MismatchReport::new(MismatchKind::Value, expected, actual)
                    .at_index(indices_for(&e_shape, i))
                    .caused_by(cause));
            }
        }
        Ok(())
    }

    fn check_objects(&self, expected: &Value, actual: &Value) -> Result<(), MismatchReport> {
        let (Value::Object(e), Value::Object(a)) = (expected, actual) else {
            return Err(MismatchReport::new(MismatchKind::Type, expected, actual));
        };
        if e.type_info().name() != a.type_info().name() {
            return Err(MismatchReport::new(MismatchKind::Type, expected, actual));
        }
        for (name, e_value) in e.fields() {
            let Some((_, a_value)) = a.fields().iter().find(|(n, _)| n == name) else {
                return Err(MismatchReport::new(MismatchKind::Value, expected, actual).at_field(name));
            };
            if let Err(cause) = self.check(e_value, a_value) {
                return Err(MismatchReport::new(MismatchKind::Value, expected, actual)
                    .at_field(name)
                    .caused_by(cause));
            }
        }
        if let Some((name, _)) = a
            .fields()
            .iter()
            .find(|(n, _)| !e.fields().iter().any(|(en, _)| en == n))
        {
            return Err(MismatchReport::new(MismatchKind::Value, expected, actual).at_field(name));
        }
        Ok(())
    }
}

fn exact_float_eq(expected: f64, actual: f64) -> bool {
    (expected.is_nan() && actual.is_nan()) || expected == actual
}
