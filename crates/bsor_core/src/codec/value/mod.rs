use std::borrow::Cow;

use crate::codec::shape::Shape;
use crate::codec::{BsorError, Result};

/// Deepest shape nesting expanded when building zero values.
const ZERO_DEPTH_LIMIT: u32 = 64;

/// Runtime value encoded against, or decoded from, a [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Absent optional.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Signed integer scalar.
	Int(i64),
	/// Unsigned integer scalar.
	Uint(u64),
	/// 32-bit float scalar.
	F32(f32),
	/// 64-bit float scalar.
	F64(f64),
	/// UTF-8 string.
	String(String),
	/// Binary blob or well-known binary payload.
	Bytes(Vec<u8>),
	/// Collection elements.
	Array(Vec<Value>),
	/// Composite value.
	Struct(StructValue),
}

/// Composite value with identified fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Struct type name.
	pub type_name: Box<str>,
	/// Field values. Decoding yields every declared field in declaration order.
	pub fields: Vec<FieldValue>,
}

/// One identified field value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier.
	pub id: u64,
	/// Field name.
	pub name: Box<str>,
	/// Field payload.
	pub value: Value,
}

impl StructValue {
	/// Empty struct value.
	pub fn new(type_name: &str) -> Self {
		Self {
			type_name: type_name.into(),
			fields: Vec::new(),
		}
	}

	/// Append a field value.
	pub fn push(&mut self, id: u64, name: &str, value: Value) {
		self.fields.push(FieldValue { id, name: name.into(), value });
	}

	/// Builder form of [`StructValue::push`].
	pub fn with(mut self, id: u64, name: &str, value: Value) -> Self {
		self.push(id, name, value);
		self
	}

	/// Field value by identifier.
	pub fn get(&self, id: u64) -> Option<&Value> {
		self.fields.iter().find(|field| field.id == id).map(|field| &field.value)
	}

	/// Field value by name.
	pub fn get_by_name(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}

	/// Remove and return a field value by identifier.
	pub fn take(&mut self, id: u64) -> Option<Value> {
		let idx = self.fields.iter().position(|field| field.id == id)?;
		Some(self.fields.remove(idx).value)
	}
}

impl Value {
	/// Stable label for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Uint(_) => "uint",
			Self::F32(_) => "float32",
			Self::F64(_) => "float64",
			Self::String(_) => "string",
			Self::Bytes(_) => "bytes",
			Self::Array(_) => "array",
			Self::Struct(_) => "struct",
		}
	}

	/// Whether this value is the zero value of `shape`, and so omitted as a struct field.
	pub fn is_zero(&self, shape: &Shape) -> Result<bool> {
		if matches!(self, Self::Null) {
			return Ok(true);
		}

		Ok(match (shape, self) {
			(Shape::Optional(_), _) => false,
			(Shape::Bool, Self::Bool(value)) => !*value,
			(Shape::Int(_) | Shape::Uint(_), Self::Int(value)) => *value == 0,
			(Shape::Int(_) | Shape::Uint(_), Self::Uint(value)) => *value == 0,
			(Shape::Float32 | Shape::Float64, Self::F32(value)) => value.to_bits() == 0,
			(Shape::Float64, Self::F64(value)) => value.to_bits() == 0,
			(Shape::String { .. }, Self::String(value)) => value.is_empty(),
			(Shape::Binary { fixed }, value) => zero_bytes(value, *fixed, shape)?,
			(Shape::Array { elem, fixed }, value) if elem.is_byte() => zero_bytes(value, *fixed, shape)?,
			(Shape::WellKnown(_), value) => zero_bytes(value, None, shape)?,
			(Shape::Array { elem, fixed: Some(_) }, Self::Array(items)) => {
				for item in items {
					if !item.is_zero(elem)? {
						return Ok(false);
					}
				}
				true
			}
			(Shape::Array { fixed: None, .. }, Self::Array(items)) => items.is_empty(),
			(Shape::Struct(item), Self::Struct(value)) => {
				let fields = item.fields()?;
				for field in fields.iter() {
					let Some(field_value) = value.get(field.id) else {
						continue;
					};
					if !field_value.is_zero(&field.shape)? {
						return Ok(false);
					}
				}
				true
			}
			_ => return Err(BsorError::conversion(shape.type_name(), self.kind())),
		})
	}

	/// Zero value restored for a field of `shape` that is absent from the stream.
	pub fn zero(shape: &Shape) -> Result<Value> {
		zero_value(shape, 0)
	}

	/// Byte payload of a binary-like value. Arrays qualify when every element is a byte.
	pub fn as_bytes(&self) -> Option<Cow<'_, [u8]>> {
		match self {
			Self::Bytes(bytes) => Some(Cow::Borrowed(bytes)),
			Self::Array(items) => items
				.iter()
				.map(|item| match item {
					Self::Uint(value) => u8::try_from(*value).ok(),
					Self::Int(value) => u8::try_from(*value).ok(),
					_ => None,
				})
				.collect::<Option<Vec<u8>>>()
				.map(Cow::Owned),
			_ => None,
		}
	}
}

fn zero_bytes(value: &Value, fixed: Option<usize>, shape: &Shape) -> Result<bool> {
	let bytes = value.as_bytes().ok_or_else(|| BsorError::conversion(shape.type_name(), value.kind()))?;
	Ok(match fixed {
		Some(_) => bytes.iter().all(|byte| *byte == 0),
		None => bytes.is_empty(),
	})
}

fn zero_value(shape: &Shape, depth: u32) -> Result<Value> {
	if depth >= ZERO_DEPTH_LIMIT {
		return Err(BsorError::DepthExceeded { max_depth: ZERO_DEPTH_LIMIT });
	}

	Ok(match shape {
		Shape::Bool => Value::Bool(false),
		Shape::Int(_) => Value::Int(0),
		Shape::Uint(_) => Value::Uint(0),
		Shape::Float32 => Value::F32(0.0),
		Shape::Float64 => Value::F64(0.0),
		Shape::String { .. } => Value::String(String::new()),
		Shape::Binary { fixed } => Value::Bytes(vec![0; fixed.unwrap_or(0)]),
		Shape::WellKnown(_) => Value::Bytes(Vec::new()),
		Shape::Optional(_) => Value::Null,
		Shape::Array { elem, fixed } => {
			let len = fixed.unwrap_or(0);
			let mut items = Vec::with_capacity(len);
			for _ in 0..len {
				items.push(zero_value(elem, depth + 1)?);
			}
			Value::Array(items)
		}
		Shape::Struct(item) => {
			let mut out = StructValue::new(item.name());
			for field in item.fields()?.iter() {
				out.push(field.id, &field.name, zero_value(&field.shape, depth + 1)?);
			}
			Value::Struct(out)
		}
	})
}
