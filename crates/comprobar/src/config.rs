//! Assertion configuration.

use crate::result::AssertResult;
use crate::writer::WriterConfig;
use serde::{Deserialize, Serialize};

/// What an [`AssertionContext`](crate::AssertionContext) does with a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionMode {
    /// Return the failure immediately (default)
    #[default]
    FailFast,
    /// Record the failure and keep going; report all of them on `verify`
    Collect,
}

impl AssertionMode {
    /// Check if failures are collected rather than returned
    #[must_use]
    pub const fn is_collect(&self) -> bool {
        matches!(self, Self::Collect)
    }
}

/// Configuration for an assertion context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertConfig {
    /// Message layout limits
    pub writer: WriterConfig,
    /// Failure handling
    pub mode: AssertionMode,
}

impl AssertConfig {
    /// Default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> AssertResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the message layout limits
    #[must_use]
    pub const fn with_writer(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Set the failure handling mode
    #[must_use]
    pub const fn with_mode(mut self, mode: AssertionMode) -> Self {
        self.mode = mode;
        self
    }
}
