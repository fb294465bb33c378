//! Explicit schema description of encodable values.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use crate::codec::{BsorError, Result};

/// Integer storage width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
	/// 8-bit.
	W8,
	/// 16-bit.
	W16,
	/// 32-bit.
	W32,
	/// 64-bit.
	W64,
}

impl IntWidth {
	/// Width in bytes.
	pub fn bytes(self) -> usize {
		match self {
			Self::W8 => 1,
			Self::W16 => 2,
			Self::W32 => 4,
			Self::W64 => 8,
		}
	}

	/// Width in bits.
	pub fn bits(self) -> u32 {
		self.bytes() as u32 * 8
	}

	/// Inclusive signed range.
	pub fn signed_range(self) -> (i64, i64) {
		match self {
			Self::W8 => (i64::from(i8::MIN), i64::from(i8::MAX)),
			Self::W16 => (i64::from(i16::MIN), i64::from(i16::MAX)),
			Self::W32 => (i64::from(i32::MIN), i64::from(i32::MAX)),
			Self::W64 => (i64::MIN, i64::MAX),
		}
	}

	/// Largest unsigned value.
	pub fn unsigned_max(self) -> u64 {
		match self {
			Self::W8 => u64::from(u8::MAX),
			Self::W16 => u64::from(u16::MAX),
			Self::W32 => u64::from(u32::MAX),
			Self::W64 => u64::MAX,
		}
	}

	/// Width for a bit count, if supported.
	pub fn from_bits(bits: u32) -> Option<Self> {
		match bits {
			8 => Some(Self::W8),
			16 => Some(Self::W16),
			32 => Some(Self::W32),
			64 => Some(Self::W64),
			_ => None,
		}
	}
}

/// Declared shape of a value.
#[derive(Debug, Clone)]
pub enum Shape {
	/// Boolean scalar.
	Bool,
	/// Signed integer scalar.
	Int(IntWidth),
	/// Unsigned integer scalar.
	Uint(IntWidth),
	/// 32-bit IEEE-754 float.
	Float32,
	/// 64-bit IEEE-754 float.
	Float64,
	/// UTF-8 string, optionally constrained to an exact byte length.
	String {
		/// Exact byte length, if fixed.
		fixed: Option<usize>,
	},
	/// Binary blob, optionally constrained to an exact byte length.
	Binary {
		/// Exact byte length, if fixed.
		fixed: Option<usize>,
	},
	/// Composite with identified fields.
	Struct(StructRef),
	/// Homogeneous collection.
	Array {
		/// Element shape.
		elem: Box<Shape>,
		/// Element count implied by the shape, if fixed.
		fixed: Option<usize>,
	},
	/// Nullable wrapper.
	Optional(Box<Shape>),
	/// Opaque type carrying its own binary encoding.
	WellKnown(WellKnownShape),
}

impl Shape {
	/// Variable-length UTF-8 string.
	pub fn string() -> Self {
		Self::String { fixed: None }
	}

	/// Variable-length binary blob.
	pub fn binary() -> Self {
		Self::Binary { fixed: None }
	}

	/// Variable-length collection. Byte elements collapse into a binary blob.
	pub fn array(elem: Shape) -> Self {
		if elem.is_byte() {
			return Self::Binary { fixed: None };
		}
		Self::Array {
			elem: Box::new(elem),
			fixed: None,
		}
	}

	/// Fixed-length collection. Byte elements collapse into a fixed binary blob.
	pub fn fixed_array(elem: Shape, len: usize) -> Self {
		if elem.is_byte() {
			return Self::Binary { fixed: Some(len) };
		}
		Self::Array {
			elem: Box::new(elem),
			fixed: Some(len),
		}
	}

	/// Nullable wrapper around `inner`.
	pub fn optional(inner: Shape) -> Self {
		Self::Optional(Box::new(inner))
	}

	/// Whether this is the raw byte element shape.
	pub fn is_byte(&self) -> bool {
		matches!(self, Self::Uint(IntWidth::W8))
	}

	/// Render the type expression naming this shape.
	pub fn type_name(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool => f.write_str("bool"),
			Self::Int(width) => write!(f, "int{}", width.bits()),
			Self::Uint(width) => write!(f, "uint{}", width.bits()),
			Self::Float32 => f.write_str("float32"),
			Self::Float64 => f.write_str("float64"),
			Self::String { fixed: None } => f.write_str("string"),
			Self::String { fixed: Some(len) } => write!(f, "string({len})"),
			Self::Binary { fixed: None } => f.write_str("binary"),
			Self::Binary { fixed: Some(len) } => write!(f, "binary({len})"),
			Self::Struct(item) => f.write_str(item.name()),
			Self::Array { elem, fixed: None } => write!(f, "[]{elem}"),
			Self::Array { elem, fixed: Some(len) } => write!(f, "[{len}]{elem}"),
			Self::Optional(inner) => write!(f, "*{inner}"),
			Self::WellKnown(item) => f.write_str(&item.name),
		}
	}
}

/// Self-encoding opaque type description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownShape {
	/// Type name.
	pub name: Box<str>,
	/// Exact encoded length, if fixed.
	pub fixed: Option<usize>,
}

impl WellKnownShape {
	/// Create a well-known binary description.
	pub fn new(name: &str, fixed: Option<usize>) -> Self {
		Self { name: name.into(), fixed }
	}
}

/// One declared struct field.
#[derive(Debug, Clone)]
pub struct Field {
	/// Field name.
	pub name: Box<str>,
	/// Stable non-zero identifier.
	pub id: u64,
	/// Field value shape.
	pub shape: Shape,
}

impl Field {
	/// Create a field declaration.
	pub fn new(name: &str, id: u64, shape: Shape) -> Self {
		Self { name: name.into(), id, shape }
	}
}

#[derive(Clone)]
enum FieldSource {
	Lazy(fn() -> Vec<Field>),
	Cell(Arc<OnceLock<Vec<Field>>>),
}

/// Named struct schema whose field list may be resolved lazily.
///
/// Field lists are produced on demand so self-referential structs can refer to their own
/// shape without recursing at construction time.
#[derive(Clone)]
pub struct StructRef {
	name: Arc<str>,
	source: FieldSource,
}

impl StructRef {
	/// Struct whose fields are produced by `fields` on demand.
	pub fn lazy(name: &str, fields: fn() -> Vec<Field>) -> Self {
		Self {
			name: name.into(),
			source: FieldSource::Lazy(fields),
		}
	}

	/// Struct with an already known field list.
	pub fn new(name: &str, fields: Vec<Field>) -> Self {
		let cell = OnceLock::new();
		let _ = cell.set(fields);
		Self {
			name: name.into(),
			source: FieldSource::Cell(Arc::new(cell)),
		}
	}

	/// Struct whose fields are supplied later through [`StructRef::resolve`].
	pub fn placeholder(name: &str) -> Self {
		Self {
			name: name.into(),
			source: FieldSource::Cell(Arc::new(OnceLock::new())),
		}
	}

	/// Supply fields for a placeholder. Returns `false` if fields were already present.
	pub fn resolve(&self, fields: Vec<Field>) -> bool {
		match &self.source {
			FieldSource::Lazy(_) => false,
			FieldSource::Cell(cell) => cell.set(fields).is_ok(),
		}
	}

	/// Struct type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Address of the field source. Equal names may still have distinct identities.
	pub(crate) fn identity(&self) -> usize {
		match &self.source {
			FieldSource::Lazy(build) => *build as usize,
			FieldSource::Cell(cell) => Arc::as_ptr(cell) as usize,
		}
	}

	/// Declared fields in declaration order.
	pub fn fields(&self) -> Result<Cow<'_, [Field]>> {
		match &self.source {
			FieldSource::Lazy(build) => Ok(Cow::Owned(build())),
			FieldSource::Cell(cell) => cell
				.get()
				.map(|fields| Cow::Borrowed(fields.as_slice()))
				.ok_or_else(|| BsorError::UnresolvedStruct { name: self.name.to_string() }),
		}
	}
}

impl fmt::Debug for StructRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("StructRef").field(&self.name).finish()
	}
}

/// Check identifiers of one struct and map them to field positions.
pub fn validate_fields(struct_name: &str, fields: &[Field]) -> Result<HashMap<u64, usize>> {
	let mut by_id = HashMap::with_capacity(fields.len());
	for (idx, field) in fields.iter().enumerate() {
		if field.id == 0 {
			return Err(BsorError::InvalidFieldId {
				struct_name: struct_name.to_owned(),
				field: field.name.to_string(),
			});
		}
		if let Some(first) = by_id.insert(field.id, idx) {
			return Err(BsorError::DuplicateFieldId {
				struct_name: struct_name.to_owned(),
				id: field.id,
				first: fields[first].name.to_string(),
				second: field.name.to_string(),
			});
		}
	}
	Ok(by_id)
}

/// Validated identifier lookup for one struct.
#[derive(Debug)]
pub struct FieldIndex {
	name: Arc<str>,
	fields: Vec<Field>,
	by_id: HashMap<u64, usize>,
}

impl FieldIndex {
	/// Build the lookup, rejecting zero and duplicate identifiers.
	pub fn build(item: &StructRef) -> Result<Self> {
		let fields = item.fields()?.into_owned();
		let by_id = validate_fields(item.name(), &fields)?;
		Ok(Self {
			name: item.name.clone(),
			fields,
			by_id,
		})
	}

	/// Struct type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared fields in declaration order.
	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	/// Look up a field position and declaration by identifier.
	pub fn get(&self, id: u64) -> Option<(usize, &Field)> {
		let idx = *self.by_id.get(&id)?;
		Some((idx, &self.fields[idx]))
	}
}

/// Per-call memo of field indexes keyed by struct identity.
#[derive(Default)]
pub(crate) struct IndexCache {
	map: HashMap<usize, Rc<FieldIndex>>,
}

impl IndexCache {
	pub(crate) fn get(&mut self, item: &StructRef) -> Result<Rc<FieldIndex>> {
		let key = item.identity();
		if let Some(index) = self.map.get(&key) {
			return Ok(Rc::clone(index));
		}
		let index = Rc::new(FieldIndex::build(item)?);
		self.map.insert(key, Rc::clone(&index));
		Ok(index)
	}
}

#[cfg(test)]
mod tests;
