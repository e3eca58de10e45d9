//! Mismatch location and clipping helpers used when rendering diagnostics.
//!
//! All positions are measured in `char`s, never bytes.

/// Marker inserted where a string has been clipped
pub const ELLIPSIS: &str = "...";

const ELLIPSIS_LEN: usize = ELLIPSIS.len();

/// Index of the first differing char, starting the scan at `start`
///
/// Returns `None` when the strings are identical, the shared length when one
/// is a prefix of the other, otherwise the first differing index.
#[must_use]
pub fn find_mismatch_position(
    expected: &str,
    actual: &str,
    start: usize,
    ignore_case: bool,
) -> Option<usize> {
    let e: Vec<char> = expected.chars().collect();
    let a: Vec<char> = actual.chars().collect();
    find_sequence_mismatch(&e, &a, start, |x, y| {
        if ignore_case {
            x.to_lowercase().eq(y.to_lowercase())
        } else {
            x == y
        }
    })
}

/// Generic form of [`find_mismatch_position`] for any slice
#[must_use]
pub fn find_sequence_mismatch<T>(
    expected: &[T],
    actual: &[T],
    start: usize,
    eq: impl Fn(&T, &T) -> bool,
) -> Option<usize> {
    let shared = expected.len().min(actual.len());
    if let Some(i) = (start..shared).find(|&i| !eq(&expected[i], &actual[i])) {
        return Some(i);
    }
    if expected.len() == actual.len() {
        None
    } else {
        Some(shared)
    }
}

/// Clip `s` to at most `max_len` chars, starting the window at `clip_start`
///
/// A leading ellipsis marks text dropped before the window, a trailing one
/// text dropped after it.
#[must_use]
pub fn clip_string(s: &str, max_len: usize, clip_start: usize) -> String {
    let len = s.chars().count();
    if max_len <= 2 * ELLIPSIS_LEN {
        return s.chars().skip(clip_start).take(max_len).collect();
    }

    let mut clip_len = max_len;
    let mut out = String::new();
    if clip_start > 0 {
        clip_len -= ELLIPSIS_LEN;
        out.push_str(ELLIPSIS);
    }
    if len.saturating_sub(clip_start) > clip_len {
        clip_len -= ELLIPSIS_LEN;
        out.extend(s.chars().skip(clip_start).take(clip_len));
        out.push_str(ELLIPSIS);
    } else {
        out.extend(s.chars().skip(clip_start));
    }
    out
}

/// Shared window start for two strings that do not fit `max_display_length`
///
/// Prefers the tail window when it still contains the mismatch, otherwise
/// centers the mismatch inside a window elided on both sides.
#[must_use]
pub fn clip_start_for(
    expected_len: usize,
    actual_len: usize,
    max_display_length: usize,
    mismatch: usize,
) -> usize {
    let longest = expected_len.max(actual_len);
    let tail_start = longest.saturating_sub(max_display_length.saturating_sub(ELLIPSIS_LEN));
    if tail_start <= mismatch {
        return tail_start;
    }
    let inner = max_display_length.saturating_sub(2 * ELLIPSIS_LEN);
    mismatch.saturating_sub(inner / 2)
}

/// Clip both strings with one shared window so their columns stay aligned
///
/// No-op when both already fit.
#[must_use]
pub fn clip_expected_and_actual(
    expected: &str,
    actual: &str,
    max_display_length: usize,
    mismatch: usize,
) -> (String, String) {
    let e_len = expected.chars().count();
    let a_len = actual.chars().count();
    if e_len.max(a_len) <= max_display_length {
        return (expected.to_string(), actual.to_string());
    }
    let clip_start = clip_start_for(e_len, a_len, max_display_length, mismatch);
    (
        clip_string(expected, max_display_length, clip_start),
        clip_string(actual, max_display_length, clip_start),
    )
}

/// Make whitespace control characters visible
#[must_use]
pub fn escape_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Caret line pointing at `column` (0-based) of the line above
///
/// The line is indented like message lines, so `column` must be at least 2.
#[must_use]
pub fn position_marker(column: usize) -> String {
    format!("  {}^", "-".repeat(column.saturating_sub(2)))
}
