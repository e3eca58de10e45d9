//! The `Assert` entry points and the soft-assertion context.
//!
//! Every `Assert::*` call evaluates its constraint once and bumps a
//! per-thread counter, pass or fail. A failure is returned as
//! [`AssertionError::Failed`] carrying the fully rendered message.

use crate::config::{AssertConfig, AssertionMode};
use crate::constraint::Constraint;
use crate::result::{AssertResult, AssertionError};
use crate::syntax::{Has, Is};
use crate::value::{TypeDescriptor, Value};
use crate::writer::{format_message, TextMessageWriter, WriterConfig};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, trace};

thread_local! {
    static ASSERT_COUNT: Cell<usize> = const { Cell::new(0) };
}

fn bump_counter() -> usize {
    ASSERT_COUNT.with(|count| {
        let next = count.get() + 1;
        count.set(next);
        next
    })
}

// Evaluates once; the message is only formatted on the failure path.
fn check<M>(
    config: &WriterConfig,
    actual: &Value,
    constraint: &Constraint,
    message: M,
) -> AssertResult<()>
where
    M: FnOnce() -> AssertResult<Option<String>>,
{
    constraint.validate()?;
    let result = constraint.evaluate(actual);
    trace!(passed = result.is_success(), "constraint evaluated");
    if result.is_success() {
        return Ok(());
    }

    let mut writer = TextMessageWriter::with_config(*config);
    if let Some(text) = message()?.filter(|m| !m.is_empty()) {
        writer.write_message_line(0, &text);
    }
    result.write_message_to(&mut writer);
    debug!(expected = %constraint.description(), actual = %actual, "assertion failed");
    Err(AssertionError::failed(writer.finish()))
}

fn template<'a>(
    message: Option<&'a str>,
    args: &'a [Value],
) -> impl FnOnce() -> AssertResult<Option<String>> + 'a {
    move || message.map(|m| format_message(m, args)).transpose()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// Constraint-based assertions
#[derive(Debug, Clone, Copy)]
pub struct Assert;

impl Assert {
    /// Check `actual` against `constraint`
    pub fn that(actual: impl Into<Value>, constraint: impl Into<Constraint>) -> AssertResult<()> {
        Self::that_with(actual, constraint, None, &[])
    }

    /// Check `actual` against `constraint`, prefixing failures with `message`
    ///
    /// `message` may reference `args` positionally as `{0}`, `{1}`, ...
    pub fn that_with(
        actual: impl Into<Value>,
        constraint: impl Into<Constraint>,
        message: Option<&str>,
        args: &[Value],
    ) -> AssertResult<()> {
        let count = bump_counter();
        trace!(count, "assert");
        check(
            &WriterConfig::default(),
            &actual.into(),
            &constraint.into(),
            template(message, args),
        )
    }

    /// Like [`that_with`](Self::that_with) for a message that is already formatted
    pub fn that_with_message(
        actual: impl Into<Value>,
        constraint: impl Into<Constraint>,
        message: &str,
    ) -> AssertResult<()> {
        let count = bump_counter();
        trace!(count, "assert");
        check(
            &WriterConfig::default(),
            &actual.into(),
            &constraint.into(),
            || Ok(Some(message.to_string())),
        )
    }

    /// Number of assertions made on this thread since the last call; resets it
    #[must_use]
    pub fn counter() -> usize {
        ASSERT_COUNT.with(|count| count.replace(0))
    }

    /// `actual` equals `expected`
    pub fn are_equal(expected: impl Into<Value>, actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::equal_to(expected))
    }

    /// `actual` is within `tolerance` of `expected`
    pub fn are_equal_within(
        expected: impl Into<Value>,
        actual: impl Into<Value>,
        tolerance: f64,
    ) -> AssertResult<()> {
        Self::that(actual, Is::equal_to(expected).within(tolerance))
    }

    /// `actual` differs from `expected`
    pub fn are_not_equal(expected: impl Into<Value>, actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::not(Is::equal_to(expected)))
    }

    /// `condition` is true
    pub fn is_true(condition: bool) -> AssertResult<()> {
        Self::that(condition, Is::true_())
    }

    /// `condition` is false
    pub fn is_false(condition: bool) -> AssertResult<()> {
        Self::that(condition, Is::false_())
    }

    /// `actual` is null
    pub fn is_null(actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::null())
    }

    /// `actual` is not null
    pub fn is_not_null(actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::not_null())
    }

    /// `actual` is NaN
    pub fn is_nan(actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::nan())
    }

    /// `actual` is an empty string or collection
    pub fn is_empty(actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::empty())
    }

    /// `actual` is a non-empty string or collection
    pub fn is_not_empty(actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::not_empty())
    }

    /// `collection` contains `item`
    pub fn contains(item: impl Into<Value>, collection: impl Into<Value>) -> AssertResult<()> {
        Self::that(collection, Has::member(item))
    }

    /// `left` is greater than `right`
    pub fn greater(left: impl Into<Value>, right: impl Into<Value>) -> AssertResult<()> {
        Self::that(left, Is::greater_than(right))
    }

    /// `left` is greater than or equal to `right`
    pub fn greater_or_equal(left: impl Into<Value>, right: impl Into<Value>) -> AssertResult<()> {
        Self::that(left, Is::greater_than_or_equal_to(right))
    }

    /// `left` is less than `right`
    pub fn less(left: impl Into<Value>, right: impl Into<Value>) -> AssertResult<()> {
        Self::that(left, Is::less_than(right))
    }

    /// `left` is less than or equal to `right`
    pub fn less_or_equal(left: impl Into<Value>, right: impl Into<Value>) -> AssertResult<()> {
        Self::that(left, Is::less_than_or_equal_to(right))
    }

    /// `actual` is of type `expected` or a descendant
    pub fn is_instance_of(expected: TypeDescriptor, actual: impl Into<Value>) -> AssertResult<()> {
        Self::that(actual, Is::instance_of(expected))
    }

    /// `actual` is neither of type `expected` nor a descendant
    pub fn is_not_instance_of(
        expected: TypeDescriptor,
        actual: impl Into<Value>,
    ) -> AssertResult<()> {
        Self::that(actual, Is::not(Is::instance_of(expected)))
    }

    /// A value of type `expected` can be used where `actual`'s type is required
    pub fn is_assignable_from(
        expected: TypeDescriptor,
        actual: impl Into<Value>,
    ) -> AssertResult<()> {
        Self::that(actual, Is::assignable_from(expected))
    }

    /// A value of type `expected` cannot be used where `actual`'s type is required
    pub fn is_not_assignable_from(
        expected: TypeDescriptor,
        actual: impl Into<Value>,
    ) -> AssertResult<()> {
        Self::that(actual, Is::not(Is::assignable_from(expected)))
    }

    /// Fail unconditionally with `message`
    pub fn fail(message: impl Into<String>) -> AssertResult<()> {
        Err(AssertionError::failed(message))
    }

    /// Ask for the current test to be reported as ignored
    pub fn ignore(message: impl Into<String>) -> AssertResult<()> {
        Err(AssertionError::Ignored {
            message: message.into(),
        })
    }

    /// `f` panics; returns the panic message
    pub fn panics<F: FnOnce()>(f: F) -> AssertResult<String> {
        bump_counter();
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(()) => Err(AssertionError::failed(
                "  Expected: a panic\n  But was:  no panic",
            )),
            Err(payload) => Ok(panic_message(payload.as_ref())),
        }
    }

    /// `f` returns normally
    pub fn does_not_panic<F: FnOnce()>(f: F) -> AssertResult<()> {
        bump_counter();
        catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
            AssertionError::failed(format!(
                "  Expected: no panic\n  But was:  panic with {:?}",
                panic_message(payload.as_ref())
            ))
        })
    }
}

/// A failure recorded by a collecting [`AssertionContext`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Rendered failure message
    pub message: String,
    /// Position of the failing assertion among all assertions in the context
    pub index: usize,
}

/// Summary of assertion results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSummary {
    /// Total assertions checked
    pub total: usize,
    /// Assertions that passed
    pub passed: usize,
    /// Assertions that failed
    pub failed: usize,
}

/// Explicit execution context with its own counter
///
/// ## Example
///
/// ```
/// use comprobar::prelude::*;
///
/// let mut ctx = AssertionContext::with_mode(AssertionMode::Collect);
/// ctx.that(1, Is::equal_to(2)).unwrap();
/// ctx.that("a", Is::equal_to("a")).unwrap();
/// assert_eq!(ctx.count(), 2);
/// assert!(ctx.verify().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssertionContext {
    config: AssertConfig,
    count: usize,
    failures: Vec<AssertionFailure>,
}

impl AssertionContext {
    /// Fail-fast context with default limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with the given configuration
    #[must_use]
    pub fn with_config(config: AssertConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Context with default limits and the given mode
    #[must_use]
    pub fn with_mode(mode: AssertionMode) -> Self {
        Self::with_config(AssertConfig::default().with_mode(mode))
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// Check `actual` against `constraint`
    ///
    /// In collect mode a failed constraint is recorded and `Ok(())` returned;
    /// invalid usage is always returned.
    pub fn that(
        &mut self,
        actual: impl Into<Value>,
        constraint: impl Into<Constraint>,
    ) -> AssertResult<()> {
        self.that_with(actual, constraint, None, &[])
    }

    /// Like [`that`](Self::that), prefixing failures with a formatted message
    pub fn that_with(
        &mut self,
        actual: impl Into<Value>,
        constraint: impl Into<Constraint>,
        message: Option<&str>,
        args: &[Value],
    ) -> AssertResult<()> {
        let index = self.count;
        self.count += 1;
        trace!(count = self.count, "assert in context");
        let outcome = check(
            &self.config.writer,
            &actual.into(),
            &constraint.into(),
            template(message, args),
        );
        match outcome {
            Err(AssertionError::Failed { message }) if self.config.mode.is_collect() => {
                debug!(index, "soft assertion failure recorded");
                self.failures.push(AssertionFailure { message, index });
                Ok(())
            }
            other => other,
        }
    }

    /// Assertions made so far
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Assertions made so far; resets the count
    pub fn take_count(&mut self) -> usize {
        std::mem::take(&mut self.count)
    }

    /// Recorded failures
    #[must_use]
    pub fn failures(&self) -> &[AssertionFailure] {
        &self.failures
    }

    /// Number of recorded failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Whether no failure was recorded
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Totals of passed and failed assertions
    #[must_use]
    pub fn summary(&self) -> AssertionSummary {
        AssertionSummary {
            total: self.count,
            passed: self.count.saturating_sub(self.failures.len()),
            failed: self.failures.len(),
        }
    }

    /// Report every recorded failure at once
    pub fn verify(&self) -> AssertResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(AssertionError::Multiple {
                failures: self.failures.iter().map(|f| f.message.clone()).collect(),
            })
        }
    }

    /// Forget recorded failures and reset the count
    pub fn clear(&mut self) {
        self.failures.clear();
        self.count = 0;
    }
}

/// Assert inside a `#[test]`, panicking with the rendered message on failure
///
/// ```
/// use comprobar::prelude::*;
///
/// assert_that!(2 + 2, Is::equal_to(4));
/// assert_that!("abc", Text::contains("b"), "checking {}", "abc");
/// ```
#[macro_export]
macro_rules! assert_that {
    ($actual:expr, $constraint:expr $(,)?) => {
        if let Err(err) = $crate::Assert::that($actual, $constraint) {
            panic!("{}", err);
        }
    };
    ($actual:expr, $constraint:expr, $($arg:tt)+) => {
        if let Err(err) =
            $crate::Assert::that_with_message($actual, $constraint, &format!($($arg)+))
        {
            panic!("{}", err);
        }
    };
}
