//! Type relationship constraints.

use super::{Constraint, ConstraintResult};
use crate::value::{TypeDescriptor, Value};
use crate::writer::TextMessageWriter;

/// Direction of the type relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Actual's type is the expected type or descends from it
    InstanceOf,
    /// Expected type is the actual's type or descends from it
    AssignableFrom,
}

/// Actual's type must relate to the expected type
#[derive(Debug, Clone)]
pub struct TypeConstraint {
    kind: TypeKind,
    expected: TypeDescriptor,
}

impl TypeConstraint {
    /// Check `kind` against `expected`
    #[must_use]
    pub const fn new(kind: TypeKind, expected: TypeDescriptor) -> Self {
        Self { kind, expected }
    }

    /// Direction of the check
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Expected type
    #[must_use]
    pub const fn expected(&self) -> &TypeDescriptor {
        &self.expected
    }

    pub(crate) fn evaluate<'a>(
        &self,
        constraint: &'a Constraint,
        actual: &'a Value,
    ) -> ConstraintResult<'a> {
        let passed = actual.type_descriptor().is_some_and(|t| match self.kind {
            TypeKind::InstanceOf => t.is_same_or_subtype_of(&self.expected),
            TypeKind::AssignableFrom => self.expected.is_same_or_subtype_of(&t),
        });
        ConstraintResult::from_bool(constraint, actual, passed)
    }

    pub(crate) fn write_description_to(&self, writer: &mut TextMessageWriter) {
        match self.kind {
            TypeKind::InstanceOf => writer.write_predicate("instance of"),
            TypeKind::AssignableFrom => writer.write_predicate("Type assignable from"),
        }
        writer.write(&self.expected.to_string());
    }
}

impl From<TypeConstraint> for Constraint {
    fn from(c: TypeConstraint) -> Self {
        Self::Type(c)
    }
}
