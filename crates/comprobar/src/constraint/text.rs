//! String constraints.

use super::{Constraint, ConstraintResult};
use crate::result::{AssertResult, AssertionError};
use crate::value::Value;
use crate::writer::TextMessageWriter;
use regex::{Regex, RegexBuilder};

const REQUIRED: &str = "a string";

/// Where the expected text must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Anywhere
    Contains,
    /// At the start
    StartsWith,
    /// At the end
    EndsWith,
}

impl TextKind {
    /// Words used in the description
    #[must_use]
    pub const fn predicate(self) -> &'static str {
        match self {
            Self::Contains => "String containing",
            Self::StartsWith => "String starting with",
            Self::EndsWith => "String ending with",
        }
    }
}

/// Actual must be a string containing, starting or ending with the expected text
#[derive(Debug, Clone)]
pub struct TextConstraint {
    kind: TextKind,
    expected: String,
    ignore_case: bool,
}

impl TextConstraint {
    /// Case-sensitive text constraint
    #[must_use]
    pub fn new(kind: TextKind, expected: impl Into<String>) -> Self {
        Self {
            kind,
            expected: expected.into(),
            ignore_case: false,
        }
    }

    /// Match case-insensitively
    #[must_use]
    pub const fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Position of the expected text
    #[must_use]
    pub const fn kind(&self) -> TextKind {
        self.kind
    }

    /// Expected text
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    fn test(&self, actual: &str) -> bool {
        let (actual, expected) = if self.ignore_case {
            (actual.to_lowercase(), self.expected.to_lowercase())
        } else {
            (actual.to_string(), self.expected.clone())
        };
        match self.kind {
            TextKind::Contains => actual.contains(&expected),
            TextKind::StartsWith => actual.starts_with(&expected),
            TextKind::EndsWith => actual.ends_with(&expected),
        }
    }

    pub(crate) fn evaluate<'a>(
        &self,
        constraint: &'a Constraint,
        actual: &'a Value,
    ) -> ConstraintResult<'a> {
        match actual.as_str() {
            Some(s) => ConstraintResult::from_bool(constraint, actual, self.test(s)),
            None => ConstraintResult::incompatible(
                constraint,
                actual,
                &Value::from(self.expected.as_str()),
                REQUIRED,
            ),
        }
    }

    pub(crate) fn write_description_to(&self, writer: &mut TextMessageWriter) {
        writer.write_predicate(self.kind.predicate());
        writer.write_expected_value(&Value::from(self.expected.as_str()));
        if self.ignore_case {
            writer.write_modifier("ignoring case");
        }
    }
}

/// Actual must be a string matched by a regular expression
#[derive(Debug, Clone)]
pub struct RegexConstraint {
    pattern: String,
    regex: Regex,
    ignore_case: bool,
}

impl RegexConstraint {
    /// Compile `pattern`; an invalid pattern is a usage error
    pub fn new(pattern: &str) -> AssertResult<Self> {
        Self::build(pattern, false)
    }

    /// Compile `pattern` for case-insensitive matching
    pub fn ignoring_case(pattern: &str) -> AssertResult<Self> {
        Self::build(pattern, true)
    }

    fn build(pattern: &str, ignore_case: bool) -> AssertResult<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| {
                AssertionError::invalid_usage(format!("invalid pattern {pattern:?}: {e}"))
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            ignore_case,
        })
    }

    /// Source pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn evaluate<'a>(
        &self,
        constraint: &'a Constraint,
        actual: &'a Value,
    ) -> ConstraintResult<'a> {
        match actual.as_str() {
            Some(s) => ConstraintResult::from_bool(constraint, actual, self.regex.is_match(s)),
            None => ConstraintResult::incompatible(
                constraint,
                actual,
                &Value::from(self.pattern.as_str()),
                REQUIRED,
            ),
        }
    }

    pub(crate) fn write_description_to(&self, writer: &mut TextMessageWriter) {
        writer.write_predicate("String matching");
        writer.write(&format!("\"{}\"", self.pattern));
        if self.ignore_case {
            writer.write_modifier("ignoring case");
        }
    }
}

impl From<TextConstraint> for Constraint {
    fn from(c: TextConstraint) -> Self {
        Self::Text(c)
    }
}

impl From<RegexConstraint> for Constraint {
    fn from(c: RegexConstraint) -> Self {
        Self::Regex(c)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::constraint::ResultDetail;

    fn holds(c: impl Into<Constraint>, actual: impl Into<Value>) -> bool {
        c.into().matches(&actual.into())
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_kinds() {
            assert!(holds(TextConstraint::new(TextKind::Contains, "ell"), "Hello"));
            assert!(holds(TextConstraint::new(TextKind::StartsWith, "He"), "Hello"));
            assert!(holds(TextConstraint::new(TextKind::EndsWith, "lo"), "Hello"));
            assert!(!holds(TextConstraint::new(TextKind::EndsWith, "He"), "Hello"));
        }

        #[test]
        fn test_ignore_case() {
            assert!(!holds(TextConstraint::new(TextKind::Contains, "ELL"), "Hello"));
            assert!(holds(TextConstraint::new(TextKind::Contains, "ELL").ignore_case(), "Hello"));
        }

        #[test]
        fn test_non_string_actual() {
            let c = Constraint::from(TextConstraint::new(TextKind::Contains, "1"));
            let actual = Value::from(1);
            assert!(matches!(
                c.evaluate(&actual).detail(),
                ResultDetail::Incompatible { required: "a string", .. }
            ));
        }

        #[test]
        fn test_descriptions() {
            let c = Constraint::from(TextConstraint::new(TextKind::StartsWith, "x").ignore_case());
            assert_eq!(c.description(), "String starting with \"x\", ignoring case");
        }
    }

    mod regex_tests {
        use super::*;

        #[test]
        fn test_matches() {
            let c = RegexConstraint::new(r"^\d{3}-\d{4}$").unwrap();
            assert!(holds(c.clone(), "555-1234"));
            assert!(!holds(c, "5551234"));
        }

        #[test]
        fn test_ignoring_case() {
            assert!(holds(RegexConstraint::ignoring_case("^abc").unwrap(), "ABCdef"));
        }

        #[test]
        fn test_invalid_pattern() {
            let err = RegexConstraint::new("(unclosed").unwrap_err();
            assert!(err.is_invalid_usage());
        }

        #[test]
        fn test_description() {
            let c = Constraint::from(RegexConstraint::new("a+").unwrap());
            assert_eq!(c.description(), "String matching \"a+\"");
            let c = Constraint::from(RegexConstraint::new(r"^\d+$").unwrap());
            assert_eq!(c.description(), r#"String matching "^\d+$""#);
        }
    }
}
