use std::time::Instant;

use tracing::{debug, trace};

use crate::codec::cursor::ItemCursor;
use crate::codec::script::ScriptItem;
use crate::codec::shape::{IndexCache, IntWidth, Shape, StructRef};
use crate::codec::value::{StructValue, Value};
use crate::codec::{BsorError, Result};

/// Runtime limits for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum recursive shape nesting depth.
	pub max_depth: u32,
	/// Maximum element count accepted for a variable-length collection.
	pub max_collection_len: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_collection_len: 1 << 20,
		}
	}
}

impl DecodeOptions {
	/// Preset for scripts taken from untrusted sources.
	pub fn untrusted() -> Self {
		Self {
			max_depth: 32,
			max_collection_len: 4096,
		}
	}
}

/// Decode one value of `shape` with default options, returning unconsumed items.
pub fn decode<'a>(items: &'a [ScriptItem], shape: &Shape) -> Result<(Value, &'a [ScriptItem])> {
	decode_with(items, shape, &DecodeOptions::default())
}

/// Decode one value of `shape` from the front of `items`, returning unconsumed items.
pub fn decode_with<'a>(items: &'a [ScriptItem], shape: &Shape, opt: &DecodeOptions) -> Result<(Value, &'a [ScriptItem])> {
	let started = Instant::now();
	let mut decoder = Decoder {
		opt,
		indexes: IndexCache::default(),
	};
	let mut cursor = ItemCursor::new(items);

	match decoder.read_value(&mut cursor, shape, 0) {
		Ok(value) => {
			debug!(
				type_name = %shape,
				items = cursor.pos(),
				remaining = cursor.remaining(),
				elapsed_us = started.elapsed().as_micros() as u64,
				"bsor decode"
			);
			Ok((value, cursor.rest()))
		}
		Err(err) => {
			debug!(type_name = %shape, at = cursor.pos(), error = %err, "bsor decode failed");
			Err(err)
		}
	}
}

struct Decoder<'o> {
	opt: &'o DecodeOptions,
	indexes: IndexCache,
}

impl Decoder<'_> {
	fn read_value(&mut self, cursor: &mut ItemCursor<'_>, shape: &Shape, depth: u32) -> Result<Value> {
		if depth >= self.opt.max_depth {
			return Err(BsorError::DepthExceeded { max_depth: self.opt.max_depth });
		}

		match shape {
			Shape::Optional(inner) => {
				if !cursor.read_bool()? {
					return Ok(Value::Null);
				}
				self.read_value(cursor, inner, depth + 1)
			}
			Shape::WellKnown(item) => {
				let at = cursor.pos();
				let bytes = cursor.read_push("well-known binary")?;
				check_len(at, &item.name, item.fixed, bytes.len())?;
				Ok(Value::Bytes(bytes.to_vec()))
			}
			Shape::Struct(item) => self.read_struct(cursor, item, depth),
			Shape::Array { elem, fixed } if elem.is_byte() => read_binary(cursor, *fixed),
			Shape::Array { elem, fixed } => self.read_array(cursor, elem, *fixed, depth),
			Shape::Bool => Ok(Value::Bool(cursor.read_bool()?)),
			Shape::Int(width) => read_signed(cursor, *width),
			Shape::Uint(width) => read_unsigned(cursor, *width),
			Shape::Float32 => {
				let at = cursor.pos();
				let bytes = cursor.read_push("float32")?;
				let raw: [u8; 4] = bytes.try_into().map_err(|_| BsorError::malformed(at, format!("float32 needs 4 bytes, got {}", bytes.len())))?;
				Ok(Value::F32(f32::from_le_bytes(raw)))
			}
			Shape::Float64 => {
				let at = cursor.pos();
				let bytes = cursor.read_push("float64")?;
				let raw: [u8; 8] = bytes.try_into().map_err(|_| BsorError::malformed(at, format!("float64 needs 8 bytes, got {}", bytes.len())))?;
				Ok(Value::F64(f64::from_le_bytes(raw)))
			}
			Shape::String { fixed } => {
				let at = cursor.pos();
				let bytes = cursor.read_push("string")?;
				check_len(at, "string", *fixed, bytes.len())?;
				let text = std::str::from_utf8(bytes).map_err(|err| BsorError::malformed(at, format!("string is not utf-8: {err}")))?;
				Ok(Value::String(text.to_owned()))
			}
			Shape::Binary { fixed } => read_binary(cursor, *fixed),
		}
	}

	fn read_struct(&mut self, cursor: &mut ItemCursor<'_>, item: &StructRef, depth: u32) -> Result<Value> {
		let count = cursor.read_unsigned()?;
		let index = self.indexes.get(item)?;
		trace!(struct_name = index.name(), count, "bsor decode struct");

		let mut slots: Vec<Option<Value>> = vec![None; index.fields().len()];
		for _ in 0..count {
			let at = cursor.pos();
			let id = cursor.read_unsigned()?;
			let (slot, field) = index.get(id).ok_or_else(|| BsorError::UnknownFieldIdentifier {
				struct_name: index.name().to_owned(),
				id,
			})?;
			if slots[slot].is_some() {
				return Err(BsorError::malformed(at, format!("field id {id} repeated in {}", index.name())));
			}
			slots[slot] = Some(self.read_value(cursor, &field.shape, depth + 1)?);
		}

		let mut out = StructValue::new(index.name());
		for (field, slot) in index.fields().iter().zip(slots) {
			let value = match slot {
				Some(value) => value,
				None => Value::zero(&field.shape)?,
			};
			out.push(field.id, &field.name, value);
		}
		Ok(Value::Struct(out))
	}

	fn read_array(&mut self, cursor: &mut ItemCursor<'_>, elem: &Shape, fixed: Option<usize>, depth: u32) -> Result<Value> {
		let len = match fixed {
			Some(len) => len,
			None => {
				let count = cursor.read_unsigned()?;
				usize::try_from(count)
					.ok()
					.filter(|len| *len <= self.opt.max_collection_len)
					.ok_or(BsorError::CollectionTooLarge {
						count,
						max: self.opt.max_collection_len,
					})?
			}
		};

		let mut items = Vec::with_capacity(len.min(cursor.remaining()));
		for _ in 0..len {
			items.push(self.read_value(cursor, elem, depth + 1)?);
		}
		Ok(Value::Array(items))
	}
}

fn read_binary(cursor: &mut ItemCursor<'_>, fixed: Option<usize>) -> Result<Value> {
	let at = cursor.pos();
	let bytes = cursor.read_push("binary")?;
	check_len(at, "binary", fixed, bytes.len())?;
	Ok(Value::Bytes(bytes.to_vec()))
}

fn read_signed(cursor: &mut ItemCursor<'_>, width: IntWidth) -> Result<Value> {
	let at = cursor.pos();
	let number = cursor.read_number()?;
	let (min, max) = width.signed_range();
	if !(min..=max).contains(&number) {
		return Err(BsorError::malformed(at, format!("{number} out of range for int{}", width.bits())));
	}
	Ok(Value::Int(number))
}

fn read_unsigned(cursor: &mut ItemCursor<'_>, width: IntWidth) -> Result<Value> {
	let at = cursor.pos();
	let number = cursor.read_unsigned()?;
	if number > width.unsigned_max() {
		return Err(BsorError::malformed(at, format!("{number} out of range for uint{}", width.bits())));
	}
	Ok(Value::Uint(number))
}

fn check_len(at: usize, what: &str, fixed: Option<usize>, len: usize) -> Result<()> {
	match fixed {
		Some(expected) if expected != len => Err(BsorError::malformed(at, format!("{what} needs {expected} bytes, got {len}"))),
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests;
