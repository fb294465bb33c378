//! Static-type bridge between Rust values and [`Shape`]/[`Value`] pairs.
//!
//! Structs opt in through [`bsor_struct!`](crate::bsor_struct), which records each field's
//! identifier next to its declaration. Opaque types that carry their own byte form
//! implement [`WellKnownBinary`] and opt in through [`bsor_well_known!`](crate::bsor_well_known).

use crate::codec::definition::{Definitions, build_definitions};
use crate::codec::script::ScriptItem;
use crate::codec::shape::{Shape, WellKnownShape};
use crate::codec::value::{StructValue, Value};
use crate::codec::{BsorError, Result, decode, encode};

/// Rust type with a fixed BSOR shape.
pub trait Bsor: Sized {
	/// Shape every value of this type is encoded against.
	fn shape() -> Shape;

	/// Convert into a runtime value.
	fn to_value(&self) -> Value;

	/// Rebuild from a runtime value produced by the decoder.
	fn from_value(value: Value) -> Result<Self>;
}

/// Opaque type that owns its binary encoding.
pub trait WellKnownBinary: Sized {
	/// Type name used in definitions.
	const NAME: &'static str;
	/// Exact encoded length, if every value has the same one.
	const FIXED_SIZE: Option<usize> = None;

	/// Serialize to bytes.
	fn to_binary(&self) -> Vec<u8>;

	/// Parse from bytes. Called with an empty slice for an omitted field.
	fn from_binary(bytes: &[u8]) -> Result<Self>;
}

/// Encode `value` into script items.
pub fn to_script<T: Bsor>(value: &T) -> Result<Vec<ScriptItem>> {
	encode(&value.to_value(), &T::shape())
}

/// Decode a `T` that must consume every item.
pub fn from_script<T: Bsor>(items: &[ScriptItem]) -> Result<T> {
	let (value, rest) = from_script_prefix::<T>(items)?;
	if !rest.is_empty() {
		return Err(BsorError::malformed(
			items.len() - rest.len(),
			format!("{} trailing items after {}", rest.len(), T::shape()),
		));
	}
	Ok(value)
}

/// Decode a `T` from the front of `items`, returning the unread tail.
pub fn from_script_prefix<T: Bsor>(items: &[ScriptItem]) -> Result<(T, &[ScriptItem])> {
	let (value, rest) = decode(items, &T::shape())?;
	Ok((T::from_value(value)?, rest))
}

/// Catalogue for `T` and every struct it reaches.
pub fn definitions_for<T: Bsor>() -> Result<Definitions> {
	build_definitions(&[T::shape()])
}

impl Bsor for bool {
	fn shape() -> Shape {
		Shape::Bool
	}

	fn to_value(&self) -> Value {
		Value::Bool(*self)
	}

	fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::Bool(flag) => Ok(flag),
			other => Err(BsorError::conversion("bool", other.kind())),
		}
	}
}

macro_rules! impl_int {
	($($ty:ty => $variant:ident($width:ident) as $wide:ty),* $(,)?) => {$(
		impl Bsor for $ty {
			fn shape() -> Shape {
				Shape::$variant(crate::codec::shape::IntWidth::$width)
			}

			fn to_value(&self) -> Value {
				Value::$variant(<$wide>::from(*self))
			}

			fn from_value(value: Value) -> Result<Self> {
				let out = match value {
					Value::Int(number) => <$ty>::try_from(number).ok(),
					Value::Uint(number) => <$ty>::try_from(number).ok(),
					other => return Err(BsorError::conversion(stringify!($ty), other.kind())),
				};
				out.ok_or_else(|| BsorError::conversion(stringify!($ty), "out of range integer"))
			}
		}
	)*};
}

impl_int! {
	i8 => Int(W8) as i64,
	i16 => Int(W16) as i64,
	i32 => Int(W32) as i64,
	i64 => Int(W64) as i64,
	u8 => Uint(W8) as u64,
	u16 => Uint(W16) as u64,
	u32 => Uint(W32) as u64,
	u64 => Uint(W64) as u64,
}

impl Bsor for f32 {
	fn shape() -> Shape {
		Shape::Float32
	}

	fn to_value(&self) -> Value {
		Value::F32(*self)
	}

	fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::F32(float) => Ok(float),
			other => Err(BsorError::conversion("float32", other.kind())),
		}
	}
}

impl Bsor for f64 {
	fn shape() -> Shape {
		Shape::Float64
	}

	fn to_value(&self) -> Value {
		Value::F64(*self)
	}

	fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::F64(float) => Ok(float),
			Value::F32(float) => Ok(f64::from(float)),
			other => Err(BsorError::conversion("float64", other.kind())),
		}
	}
}

impl Bsor for String {
	fn shape() -> Shape {
		Shape::string()
	}

	fn to_value(&self) -> Value {
		Value::String(self.clone())
	}

	fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::String(text) => Ok(text),
			other => Err(BsorError::conversion("string", other.kind())),
		}
	}
}

impl<T: Bsor> Bsor for Vec<T> {
	fn shape() -> Shape {
		Shape::array(T::shape())
	}

	fn to_value(&self) -> Value {
		Value::Array(self.iter().map(Bsor::to_value).collect())
	}

	fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::Array(items) => items.into_iter().map(T::from_value).collect(),
			// Byte collections decode as blobs.
			Value::Bytes(bytes) => bytes.into_iter().map(|byte| T::from_value(Value::Uint(u64::from(byte)))).collect(),
			other => Err(BsorError::conversion(Self::shape().type_name(), other.kind())),
		}
	}
}

impl<T: Bsor, const N: usize> Bsor for [T; N] {
	fn shape() -> Shape {
		Shape::fixed_array(T::shape(), N)
	}

	fn to_value(&self) -> Value {
		Value::Array(self.iter().map(Bsor::to_value).collect())
	}

	fn from_value(value: Value) -> Result<Self> {
		let items = Vec::<T>::from_value(value)?;
		items
			.try_into()
			.map_err(|items: Vec<T>| BsorError::conversion(Self::shape().type_name(), format!("{} elements", items.len())))
	}
}

impl<T: Bsor> Bsor for Option<T> {
	fn shape() -> Shape {
		Shape::optional(T::shape())
	}

	fn to_value(&self) -> Value {
		match self {
			Some(inner) => inner.to_value(),
			None => Value::Null,
		}
	}

	fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::Null => Ok(None),
			other => T::from_value(other).map(Some),
		}
	}
}

impl<T: Bsor> Bsor for Box<T> {
	fn shape() -> Shape {
		T::shape()
	}

	fn to_value(&self) -> Value {
		self.as_ref().to_value()
	}

	fn from_value(value: Value) -> Result<Self> {
		T::from_value(value).map(Box::new)
	}
}

/// Shape of a well-known binary type.
pub fn well_known_shape<T: WellKnownBinary>() -> Shape {
	Shape::WellKnown(WellKnownShape::new(T::NAME, T::FIXED_SIZE))
}

/// Parse a decoded well-known payload.
pub fn well_known_from_value<T: WellKnownBinary>(value: Value) -> Result<T> {
	match value.as_bytes() {
		Some(bytes) => T::from_binary(&bytes),
		None => Err(BsorError::conversion(T::NAME, value.kind())),
	}
}

#[doc(hidden)]
pub fn expect_struct(value: Value, name: &str) -> Result<StructValue> {
	match value {
		Value::Struct(item) if item.type_name.as_ref() == name => Ok(item),
		Value::Struct(item) => Err(BsorError::conversion(name, format!("struct {}", item.type_name))),
		other => Err(BsorError::conversion(name, other.kind())),
	}
}

#[doc(hidden)]
pub fn take_field<T: Bsor>(item: &mut StructValue, id: u64) -> Result<T> {
	match item.take(id) {
		Some(value) => T::from_value(value),
		None => T::from_value(Value::zero(&T::shape())?),
	}
}
