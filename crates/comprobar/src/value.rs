//! Dynamic values compared by the constraint engine.
//!
//! Every operand handed to an assertion is converted into a [`Value`] so that
//! heterogeneous comparisons (an `i32` against an `f64`, a `Vec` against an
//! array, a JSON document against a literal) go through one algorithm.

use crate::diff::escape_whitespace;
use crate::result::{AssertResult, AssertionError};
use std::fmt;

/// Maximum number of collection items rendered by the default `Display`
pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Name of the implicit root type every value type descends from
pub const ROOT_TYPE: &str = "object";

/// A number that remembers the primitive kind it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// `i8`
    I8(i8),
    /// `i16`
    I16(i16),
    /// `i32`
    I32(i32),
    /// `i64`
    I64(i64),
    /// `isize`
    Isize(isize),
    /// `u8`
    U8(u8),
    /// `u16`
    U16(u16),
    /// `u32`
    U32(u32),
    /// `u64`
    U64(u64),
    /// `usize`
    Usize(usize),
    /// `f32`
    F32(f32),
    /// `f64`
    F64(f64),
}

/// Common representation two numbers are widened to before comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widened {
    /// Any integer kind
    Integer(i128),
    /// Any floating-point kind
    Float(f64),
}

impl Number {
    /// Whether this is a floating-point kind
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32(_) | Self::F64(_))
    }

    /// Rust name of the primitive kind
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Isize(_) => "isize",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::Usize(_) => "usize",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
        }
    }

    /// Widen to `i128` for integers or `f64` for floats
    #[must_use]
    pub fn widen(self) -> Widened {
        match self {
            Self::I8(v) => Widened::Integer(i128::from(v)),
            Self::I16(v) => Widened::Integer(i128::from(v)),
            Self::I32(v) => Widened::Integer(i128::from(v)),
            Self::I64(v) => Widened::Integer(i128::from(v)),
            Self::Isize(v) => Widened::Integer(v as i128),
            Self::U8(v) => Widened::Integer(i128::from(v)),
            Self::U16(v) => Widened::Integer(i128::from(v)),
            Self::U32(v) => Widened::Integer(i128::from(v)),
            Self::U64(v) => Widened::Integer(i128::from(v)),
            Self::Usize(v) => Widened::Integer(v as i128),
            Self::F32(v) => Widened::Float(f64::from(v)),
            Self::F64(v) => Widened::Float(v),
        }
    }

    /// Value as `f64` (lossy for very large integers)
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self.widen() {
            Widened::Integer(v) => v as f64,
            Widened::Float(v) => v,
        }
    }

    /// Whether the value is NaN
    #[must_use]
    pub fn is_nan(self) -> bool {
        self.is_float() && self.as_f64().is_nan()
    }

    /// Whether the value is positive or negative infinity
    #[must_use]
    pub fn is_infinite(self) -> bool {
        self.is_float() && self.as_f64().is_infinite()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Isize(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::Usize(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v:?}"),
            Self::F64(v) => write!(f, "{v:?}"),
        }
    }
}

/// Name of a value's type together with the names it can stand in for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: String,
    ancestors: Vec<String>,
}

impl TypeDescriptor {
    /// Describe a type by name, with no ancestors besides the root type
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
        }
    }

    /// Add an ancestor (base type or implemented interface)
    #[must_use]
    pub fn with_ancestor(mut self, ancestor: impl Into<String>) -> Self {
        let ancestor = ancestor.into();
        if !self.ancestors.contains(&ancestor) {
            self.ancestors.push(ancestor);
        }
        self
    }

    /// Descriptor of the value a type's `Default` converts into
    ///
    /// Falls back to the compiler's type name for types whose default
    /// converts to `Value::Null` (such as `Option<T>`).
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: Default + Into<Value>,
    {
        T::default()
            .into()
            .type_descriptor()
            .unwrap_or_else(|| Self::named(std::any::type_name::<T>()))
    }

    /// Type name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared ancestors, nearest first (the root type is implicit)
    #[must_use]
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Whether a value of this type can be used where `other` is expected
    #[must_use]
    pub fn is_same_or_subtype_of(&self, other: &Self) -> bool {
        other.name == ROOT_TYPE
            || self.name == other.name
            || self.ancestors.iter().any(|a| *a == other.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

/// A rectangular array of any rank, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    shape: Vec<usize>,
    items: Vec<Value>,
}

impl ArrayValue {
    /// Create a one-dimensional array
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            shape: vec![items.len()],
            items,
        }
    }

    /// Create an array with an explicit shape
    ///
    /// The product of the dimensions must equal the number of items.
    pub fn with_shape(shape: Vec<usize>, items: Vec<Value>) -> AssertResult<Self> {
        if shape.is_empty() {
            return Err(AssertionError::invalid_usage(
                "an array needs at least one dimension",
            ));
        }
        let expected: usize = shape.iter().product();
        if expected != items.len() {
            return Err(AssertionError::invalid_usage(format!(
                "array shape {shape:?} holds {expected} items but {} were given",
                items.len()
            )));
        }
        Ok(Self { shape, items })
    }

    /// Build a two-dimensional array from equally sized rows
    pub fn from_rows<T, R>(rows: impl IntoIterator<Item = R>) -> AssertResult<Self>
    where
        R: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut items = Vec::new();
        let mut row_count = 0;
        let mut width = None;
        for row in rows {
            let before = items.len();
            items.extend(row.into_iter().map(Into::into));
            let len = items.len() - before;
            match width {
                None => width = Some(len),
                Some(w) if w != len => {
                    return Err(AssertionError::invalid_usage(format!(
                        "row {row_count} has {len} items, expected {w}"
                    )));
                }
                Some(_) => {}
            }
            row_count += 1;
        }
        Self::with_shape(vec![row_count, width.unwrap_or(0)], items)
    }

    /// Number of dimensions
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Length of each dimension
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Items in row-major order
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Total number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Name of the element type, or the root type when mixed or empty
    #[must_use]
    pub fn element_type_name(&self) -> String {
        let mut names = self
            .items
            .iter()
            .map(|v| v.type_descriptor().map(|t| t.name().to_string()));
        match names.next() {
            Some(Some(first)) if names.all(|n| n.as_deref() == Some(first.as_str())) => first,
            _ => ROOT_TYPE.to_string(),
        }
    }

    /// Type name such as `i32[]` or `i32[,]`
    #[must_use]
    pub fn type_name(&self) -> String {
        format!(
            "{}[{}]",
            self.element_type_name(),
            ",".repeat(self.rank().saturating_sub(1))
        )
    }

    /// Type name with dimensions such as `i32[3]` or `i32[2,3]`
    #[must_use]
    pub fn sized_type_name(&self) -> String {
        let dims: Vec<String> = self.shape.iter().map(ToString::to_string).collect();
        format!("{}[{}]", self.element_type_name(), dims.join(","))
    }
}

/// An instance of a caller-defined type compared field by field
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    type_info: TypeDescriptor,
    fields: Vec<(String, Value)>,
}

impl ObjectValue {
    /// Create an object of the named type with no fields
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_info: TypeDescriptor::named(type_name),
            fields: Vec::new(),
        }
    }

    /// Declare an ancestor type
    #[must_use]
    pub fn extends(mut self, ancestor: impl Into<String>) -> Self {
        self.type_info = self.type_info.with_ancestor(ancestor);
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Type of the object
    #[must_use]
    pub fn type_info(&self) -> &TypeDescriptor {
        &self.type_info
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

/// An untyped operand
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Single character
    Char(char),
    /// String
    Str(String),
    /// Number of any primitive kind
    Number(Number),
    /// General enumerable collection
    List(Vec<Value>),
    /// Rectangular array
    Array(ArrayValue),
    /// Caller-defined object
    Object(ObjectValue),
}

impl Value {
    /// Whether this is `Null`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a list or array
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::List(_) | Self::Array(_))
    }

    /// String contents, if a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Number, if numeric
    #[must_use]
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Items of a list or array (row-major for arrays)
    #[must_use]
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            Self::Array(array) => Some(array.items()),
            _ => None,
        }
    }

    /// Shape of a list (`[len]`) or array
    #[must_use]
    pub fn shape(&self) -> Option<Vec<usize>> {
        match self {
            Self::List(items) => Some(vec![items.len()]),
            Self::Array(array) => Some(array.shape().to_vec()),
            _ => None,
        }
    }

    /// Length of a string (in chars) or collection
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.chars().count()),
            Self::List(items) => Some(items.len()),
            Self::Array(array) => Some(array.len()),
            _ => None,
        }
    }

    /// Type of the value; `None` for `Null`
    #[must_use]
    pub fn type_descriptor(&self) -> Option<TypeDescriptor> {
        let descriptor = match self {
            Self::Null => return None,
            Self::Bool(_) => TypeDescriptor::named("bool"),
            Self::Char(_) => TypeDescriptor::named("char"),
            Self::Str(_) => TypeDescriptor::named("String"),
            Self::Number(n) if n.is_float() => TypeDescriptor::named(n.kind_name())
                .with_ancestor("float")
                .with_ancestor("number"),
            Self::Number(n) => TypeDescriptor::named(n.kind_name())
                .with_ancestor("integer")
                .with_ancestor("number"),
            Self::List(_) => TypeDescriptor::named("List").with_ancestor("enumerable"),
            Self::Array(array) => TypeDescriptor::named(array.type_name())
                .with_ancestor("Array")
                .with_ancestor("enumerable"),
            Self::Object(object) => object.type_info().clone(),
        };
        Some(descriptor)
    }

    /// Collection type as shown in collection diagnostics
    #[must_use]
    pub fn collection_type_repr(&self) -> String {
        match self {
            Self::Array(array) => format!("<{}>", array.sized_type_name()),
            Self::List(items) => format!("<List with {} elements>", items.len()),
            other => other
                .type_descriptor()
                .map_or_else(|| "null".to_string(), |t| t.to_string()),
        }
    }

    /// Display adapter limiting how many collection items are rendered
    #[must_use]
    pub const fn display_with(&self, max_items: usize) -> DisplayValue<'_> {
        DisplayValue {
            value: self,
            max_items,
        }
    }

    /// Render as an argument of a user message: strings unquoted
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Char(c) => c.to_string(),
            other => other.to_string(),
        }
    }
}

/// Convert a flat row-major index into per-dimension indices
#[must_use]
pub fn indices_for(shape: &[usize], flat: usize) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    let mut rest = flat;
    for (slot, &dim) in indices.iter_mut().zip(shape).rev() {
        if dim == 0 {
            continue;
        }
        *slot = rest % dim;
        rest /= dim;
    }
    if let Some(first) = indices.first_mut() {
        *first += rest * shape.first().copied().unwrap_or(0);
    }
    indices
}

/// Format indices as `[1,2]`
#[must_use]
pub fn format_indices(indices: &[usize]) -> String {
    let parts: Vec<String> = indices.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(","))
}

/// Renders a value the way diagnostics show it
#[derive(Debug, Clone, Copy)]
pub struct DisplayValue<'a> {
    value: &'a Value,
    max_items: usize,
}

impl fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "'{c}'"),
            Value::Str(s) => write!(f, "\"{}\"", escape_whitespace(s)),
            Value::Number(n) => write!(f, "{n}"),
            Value::List(items) => write_elements(f, items, 0, self.max_items),
            Value::Array(array) if array.rank() == 1 => {
                write_elements(f, array.items(), 0, self.max_items)
            }
            Value::Array(array) => write_nested(f, array, self.max_items),
            Value::Object(object) => {
                write!(f, "<{}", object.type_info().name())?;
                if !object.fields().is_empty() {
                    f.write_str(" { ")?;
                    for (i, (name, value)) in object.fields().iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{name}: {}", value.display_with(self.max_items))?;
                    }
                    f.write_str(" }")?;
                }
                f.write_str(">")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_with(DEFAULT_MAX_ITEMS).fmt(f)
    }
}

/// A window of collection items rendered as `< a, b, c... >`
#[derive(Debug, Clone, Copy)]
pub(crate) struct ElementWindow<'a> {
    pub(crate) items: &'a [Value],
    pub(crate) start: usize,
    pub(crate) max: usize,
}

impl fmt::Display for ElementWindow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, self.items, self.start, self.max)
    }
}

/// Write `< a, b, c... >` starting at `start`, at most `max` items
fn write_elements(
    f: &mut impl fmt::Write,
    items: &[Value],
    start: usize,
    max: usize,
) -> fmt::Result {
    if items.is_empty() {
        return f.write_str("<empty>");
    }
    f.write_str("< ")?;
    let window = items.iter().skip(start).take(max);
    for (i, item) in window.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item.display_with(max))?;
    }
    if start.saturating_add(max) < items.len() {
        f.write_str("...")?;
    }
    f.write_str(" >")
}

// Multi-dimensional arrays open a `<` at every dimension boundary.
fn write_nested(f: &mut fmt::Formatter<'_>, array: &ArrayValue, max_items: usize) -> fmt::Result {
    if array.is_empty() {
        return f.write_str("<empty>");
    }
    let mut products = vec![1usize; array.rank()];
    let mut product = 1;
    for (slot, dim) in products.iter_mut().zip(array.shape()).rev() {
        product *= dim;
        *slot = product;
    }
    let shown = array.len().min(max_items);
    for (count, item) in array.items().iter().take(shown).enumerate() {
        if count > 0 {
            f.write_str(", ")?;
        }
        let mut start_segment = false;
        for p in &products {
            start_segment = start_segment || count % p == 0;
            if start_segment {
                f.write_str("< ")?;
            }
        }
        write!(f, "{}", item.display_with(max_items))?;
        let mut end_segment = false;
        for p in &products {
            end_segment = end_segment || (count + 1) % p == 0;
            if end_segment {
                f.write_str(" >")?;
            }
        }
    }
    if shown < array.len() {
        f.write_str("...")?;
        for p in &products {
            if shown % p != 0 {
                f.write_str(" >")?;
            }
        }
    }
    Ok(())
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Number(Number::$variant(v))
                }
            }
        )*
    };
}

number_from!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize,
    f32 => F32, f64 => F64,
);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::Array(ArrayValue::new(items.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Self::Array(ArrayValue::new(
            items.iter().cloned().map(Into::into).collect(),
        ))
    }
}

impl From<ArrayValue> for Value {
    fn from(array: ArrayValue) -> Self {
        Self::Array(array)
    }
}

impl From<ObjectValue> for Value {
    fn from(object: ObjectValue) -> Self {
        Self::Object(object)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::from(i)
                } else if let Some(u) = n.as_u64() {
                    Self::from(u)
                } else {
                    Self::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                let object = map
                    .into_iter()
                    .fold(ObjectValue::new("Map"), |obj, (k, v)| obj.field(k, v));
                Self::Object(object)
            }
        }
    }
}
