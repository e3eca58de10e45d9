//! Comprobar: constraint-based assertions with readable failure messages
//!
//! Comprobar (Spanish: "to check/verify") evaluates a value against a
//! [`Constraint`] and, on failure, renders an `Expected:` / `But was:`
//! diagnostic that points at the first difference.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ Is / Has /   │    │ Constraint   │    │ TextMessageWriter│
//! │ Text         │───►│ evaluate     │───►│ (failure only)   │
//! │ (syntax)     │    │ (equality)   │    │ diff + clipping  │
//! └──────────────┘    └──────────────┘    └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use comprobar::prelude::*;
//!
//! Assert::that(vec![1, 2, 3], Is::equivalent_to([3, 2, 1])).unwrap();
//!
//! let err = Assert::that("Hallo World", Is::equal_to("Hello World")).unwrap_err();
//! assert!(err.to_string().contains("Strings differ at index 1."));
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod assert;
mod config;
pub mod constraint;
pub mod diff;
pub mod equality;
mod result;
mod syntax;
pub mod value;
pub mod writer;

pub use assert::{Assert, AssertionContext, AssertionFailure, AssertionSummary};
pub use config::{AssertConfig, AssertionMode};
pub use constraint::{Constraint, ConstraintExt, ConstraintResult, ResultDetail};
pub use equality::{Comparer, ComparisonContext, MismatchKind, MismatchReport};
pub use result::{AssertResult, AssertionError};
pub use syntax::{Has, Is, Text};
pub use value::{ArrayValue, Number, ObjectValue, TypeDescriptor, Value};
pub use writer::{TextMessageWriter, WriterConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assert::{Assert, AssertionContext, AssertionFailure, AssertionSummary};
    pub use super::assert_that;
    pub use super::config::{AssertConfig, AssertionMode};
    pub use super::constraint::{Constraint, ConstraintExt};
    pub use super::equality::Comparer;
    pub use super::result::{AssertResult, AssertionError};
    pub use super::syntax::{Has, Is, Text};
    pub use super::value::{ArrayValue, ObjectValue, TypeDescriptor, Value};
    pub use super::writer::WriterConfig;
}
