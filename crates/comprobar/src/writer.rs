//! Rendering of failed constraint results into diagnostic text.
//!
//! Output is line oriented. Message lines are indented two spaces per level;
//! the expected and actual lines share equal-width prefixes so a caret line
//! can point at the first differing column of two strings.

use crate::constraint::ConstraintResult;
use crate::diff::{
    clip_expected_and_actual, escape_whitespace, find_mismatch_position, position_marker,
};
use crate::equality::{ComparisonContext, MismatchKind, MismatchReport};
use crate::result::{AssertResult, AssertionError};
use crate::value::{format_indices, ElementWindow, Value};
use serde::{Deserialize, Serialize};

/// Prefix of the expected line
pub const EXPECTED_PREFIX: &str = "  Expected: ";

/// Prefix of the actual line
pub const ACTUAL_PREFIX: &str = "  But was:  ";

/// Width shared by both prefixes
pub const PREFIX_LENGTH: usize = EXPECTED_PREFIX.len();

const EXTRA_PREFIX: &str = "  Extra:    ";
const MISSING_PREFIX: &str = "  Missing:  ";

/// Layout limits for rendered messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Longest line before strings are clipped
    pub max_line_length: usize,
    /// Collection items shown in expected/actual values
    pub max_collection_items: usize,
    /// Items shown after a length mismatch
    pub max_tail_items: usize,
    /// Clip long strings around the first mismatch
    pub clip_strings: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_line_length: 78,
            max_collection_items: 10,
            max_tail_items: 3,
            clip_strings: true,
        }
    }
}

impl WriterConfig {
    /// Set the maximum line length
    #[must_use]
    pub const fn with_max_line_length(mut self, length: usize) -> Self {
        self.max_line_length = length;
        self
    }

    /// Set how many collection items are rendered
    #[must_use]
    pub const fn with_max_collection_items(mut self, items: usize) -> Self {
        self.max_collection_items = items;
        self
    }

    /// Set how many extra/missing items are rendered
    #[must_use]
    pub const fn with_max_tail_items(mut self, items: usize) -> Self {
        self.max_tail_items = items;
        self
    }

    /// Enable or disable string clipping
    #[must_use]
    pub const fn with_clip_strings(mut self, clip: bool) -> Self {
        self.clip_strings = clip;
        self
    }
}

/// Accumulates the text of one failure message
#[derive(Debug, Clone, Default)]
pub struct TextMessageWriter {
    buffer: String,
    config: WriterConfig,
}

impl TextMessageWriter {
    /// Writer with default limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with the given limits
    #[must_use]
    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            buffer: String::new(),
            config,
        }
    }

    /// Writer that starts with the caller's message, formatted with `args`
    ///
    /// An empty or absent message writes nothing.
    pub fn with_message(
        config: WriterConfig,
        message: Option<&str>,
        args: &[Value],
    ) -> AssertResult<Self> {
        let mut writer = Self::with_config(config);
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            let text = format_message(message, args)?;
            writer.write_message_line(0, &text);
        }
        Ok(writer)
    }

    /// Active limits
    #[must_use]
    pub const fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Width available to a string value on the expected/actual line
    #[must_use]
    pub const fn max_display_length(&self) -> usize {
        self.config.max_line_length.saturating_sub(PREFIX_LENGTH + 2)
    }

    /// Text written so far
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Final text without the trailing newline
    #[must_use]
    pub fn finish(mut self) -> String {
        while self.buffer.ends_with('\n') {
            self.buffer.pop();
        }
        self.buffer
    }

    /// Append raw text
    pub fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append text and end the line
    pub fn write_line(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Write a full line indented two spaces per level, starting at one level
    pub fn write_message_line(&mut self, level: usize, message: &str) {
        self.write(&"  ".repeat(level + 1));
        self.write_line(message);
    }

    /// Write a value the way diagnostics show it
    pub fn write_value(&mut self, value: &Value) {
        let rendered = value
            .display_with(self.config.max_collection_items)
            .to_string();
        self.write(&rendered);
    }

    /// Write the expected value of a description
    pub fn write_expected_value(&mut self, value: &Value) {
        self.write_value(value);
    }

    /// Write the actual value
    pub fn write_actual_value(&mut self, value: &Value) {
        self.write_value(value);
    }

    /// Write a predicate word followed by a space
    pub fn write_predicate(&mut self, predicate: &str) {
        self.write(predicate);
        self.write(" ");
    }

    /// Write a connector surrounded by spaces
    pub fn write_connector(&mut self, connector: &str) {
        self.write(" ");
        self.write(connector);
        self.write(" ");
    }

    /// Write a trailing modifier such as `, ignoring case`
    pub fn write_modifier(&mut self, modifier: &str) {
        self.write(", ");
        self.write(modifier);
    }

    /// Write `< a, b... >` starting at item `start`, at most `max` items
    pub fn write_collection_elements(&mut self, items: &[Value], start: usize, max: usize) {
        self.write(&ElementWindow { items, start, max }.to_string());
    }

    /// Expected line from the constraint description, actual line from the result
    pub fn display_differences(&mut self, result: &ConstraintResult<'_>) {
        self.write(EXPECTED_PREFIX);
        result.constraint().write_description_to(self);
        self.write_line("");
        self.write(ACTUAL_PREFIX);
        result.write_actual_value_to(self);
        self.write_line("");
    }

    /// Expected and actual lines for two plain values
    pub fn display_values(&mut self, expected: &Value, actual: &Value, tolerance: Option<f64>) {
        self.write(EXPECTED_PREFIX);
        self.write_expected_value(expected);
        if let Some(tolerance) = tolerance {
            self.write_connector("+/-");
            self.write_expected_value(&Value::from(tolerance));
        }
        self.write_line("");
        self.write(ACTUAL_PREFIX);
        self.write_actual_value(actual);
        self.write_line("");
    }

    /// Explain an equality mismatch, recursing into nested collections
    pub fn display_mismatch(
        &mut self,
        report: &MismatchReport,
        context: &ComparisonContext,
        clip: bool,
        depth: usize,
    ) {
        let (expected, actual) = (report.expected(), report.actual());
        match (expected, actual) {
            (Value::Str(e), Value::Str(a)) => {
                self.display_string_differences(e, a, context.ignore_case(), clip, depth);
            }
            (e, a) if e.is_sequence() && a.is_sequence() => {
                self.display_collection_differences(report, context, clip, depth);
            }
            (Value::Object(_), Value::Object(_)) if report.field().is_some() => {
                let field = report.field().unwrap_or_default();
                self.write_message_line(depth, &format!("Values differ at field {field}"));
                match report.cause() {
                    Some(cause) => self.display_mismatch(cause, context, clip, depth + 1),
                    None => self.display_values(expected, actual, None),
                }
            }
            _ => self.display_values(expected, actual, context.tolerance()),
        }
    }

    /// Length header, clipped expected/actual strings and a caret line
    pub fn display_string_differences(
        &mut self,
        expected: &str,
        actual: &str,
        ignore_case: bool,
        clip: bool,
        depth: usize,
    ) {
        let Some(mismatch) = find_mismatch_position(expected, actual, 0, ignore_case) else {
            self.display_values(&Value::from(expected), &Value::from(actual), None);
            return;
        };
        let e_len = expected.chars().count();
        let a_len = actual.chars().count();
        let header = if e_len == a_len {
            format!("String lengths are both {e_len}. Strings differ at index {mismatch}.")
        } else {
            format!(
                "Expected string length {e_len} but was {a_len}. Strings differ at index {mismatch}."
            )
        };
        self.write_message_line(depth, &header);

        let mut expected = escape_whitespace(expected);
        let mut actual = escape_whitespace(actual);
        if clip && self.config.clip_strings {
            let escaped_mismatch =
                find_mismatch_position(&expected, &actual, 0, ignore_case).unwrap_or(0);
            (expected, actual) = clip_expected_and_actual(
                &expected,
                &actual,
                self.max_display_length(),
                escaped_mismatch,
            );
        }
        // Escaping and clipping both move columns.
        let marker = find_mismatch_position(&expected, &actual, 0, ignore_case);

        self.write(EXPECTED_PREFIX);
        self.write(&format!("\"{expected}\""));
        if ignore_case {
            self.write_modifier("ignoring case");
        }
        self.write_line("");
        self.write(ACTUAL_PREFIX);
        self.write_line(&format!("\"{actual}\""));
        if let Some(offset) = marker {
            self.display_position_marker(offset);
        }
    }

    /// Caret under char `offset` of a quoted value on the line above
    pub fn display_position_marker(&mut self, offset: usize) {
        self.write_line(&position_marker(PREFIX_LENGTH + 1 + offset));
    }

    fn display_collection_differences(
        &mut self,
        report: &MismatchReport,
        context: &ComparisonContext,
        clip: bool,
        depth: usize,
    ) {
        let (expected, actual) = (report.expected(), report.actual());
        let e_repr = expected.collection_type_repr();
        let a_repr = actual.collection_type_repr();
        if e_repr == a_repr {
            self.write_message_line(depth, &format!("Expected and actual are both {e_repr}"));
        } else {
            self.write_message_line(depth, &format!("Expected is {e_repr}, actual is {a_repr}"));
        }

        if report.index().is_empty() {
            self.display_values(expected, actual, None);
            return;
        }
        if report.kind() == MismatchKind::Length {
            self.write_message_line(
                depth,
                &format!(
                    "Values differ at expected index {}, actual index {}",
                    format_indices(report.index()),
                    format_indices(report.actual_index())
                ),
            );
        } else {
            self.write_message_line(
                depth,
                &format!("Values differ at index {}", format_indices(report.index())),
            );
        }

        if let Some(cause) = report.cause() {
            self.display_mismatch(cause, context, clip, depth + 1);
            return;
        }
        let e_items = expected.items().unwrap_or_default();
        let a_items = actual.items().unwrap_or_default();
        let boundary = e_items.len().min(a_items.len());
        let tail = self.config.max_tail_items;
        if e_items.len() < a_items.len() {
            self.write(EXTRA_PREFIX);
            self.write_collection_elements(a_items, boundary, tail);
        } else {
            self.write(MISSING_PREFIX);
            self.write_collection_elements(e_items, boundary, tail);
        }
        self.write_line("");
    }

    /// `Missing:`/`Extra:` line for a tally, skipped when empty
    pub fn display_tally(&mut self, missing: &[Value], extra: &[Value]) {
        let max = self.config.max_collection_items;
        if !missing.is_empty() {
            self.write(MISSING_PREFIX);
            self.write_collection_elements(missing, 0, max);
            self.write_line("");
        }
        if !extra.is_empty() {
            self.write(EXTRA_PREFIX);
            self.write_collection_elements(extra, 0, max);
            self.write_line("");
        }
    }
}

/// Substitute positional `{N}` placeholders; `{{` and `}}` are literal braces
pub fn format_message(template: &str, args: &[Value]) -> AssertResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut digits = String::new();
                let mut closed = false;
                for d in chars.by_ref() {
                    if d == '}' {
                        closed = true;
                        break;
                    }
                    digits.push(d);
                }
                let index: usize = digits
                    .trim()
                    .parse()
                    .ok()
                    .filter(|_| closed)
                    .ok_or_else(|| {
                        AssertionError::invalid_usage(format!(
                            "malformed placeholder in message: {template:?}"
                        ))
                    })?;
                let arg = args.get(index).ok_or_else(|| {
                    AssertionError::invalid_usage(format!(
                        "placeholder {{{index}}} has no argument ({} given)",
                        args.len()
                    ))
                })?;
                out.push_str(&arg.to_plain_string());
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(AssertionError::invalid_usage(format!(
                    "unmatched '}}' in message: {template:?}"
                )));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}
