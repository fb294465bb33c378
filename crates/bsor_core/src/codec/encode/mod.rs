use std::time::Instant;

use tracing::debug;

use crate::codec::number::{encode_number, encode_unsigned};
use crate::codec::script::ScriptItem;
use crate::codec::shape::{IndexCache, IntWidth, Shape, StructRef, WellKnownShape};
use crate::codec::value::{StructValue, Value};
use crate::codec::{BsorError, Result};

/// Runtime limits for encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
	/// Maximum recursive shape nesting depth.
	pub max_depth: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self { max_depth: 64 }
	}
}

/// Encode `value` against `shape` with default options.
pub fn encode(value: &Value, shape: &Shape) -> Result<Vec<ScriptItem>> {
	encode_with(value, shape, &EncodeOptions::default())
}

/// Encode `value` against `shape` into script items.
pub fn encode_with(value: &Value, shape: &Shape, opt: &EncodeOptions) -> Result<Vec<ScriptItem>> {
	let started = Instant::now();
	let mut encoder = Encoder {
		opt,
		indexes: IndexCache::default(),
	};
	let mut out = Vec::new();

	match encoder.write_value(&mut out, value, shape, 0) {
		Ok(()) => {
			debug!(
				type_name = %shape,
				items = out.len(),
				elapsed_us = started.elapsed().as_micros() as u64,
				"bsor encode"
			);
			Ok(out)
		}
		Err(err) => {
			debug!(type_name = %shape, error = %err, "bsor encode failed");
			Err(err)
		}
	}
}

struct Encoder<'o> {
	opt: &'o EncodeOptions,
	indexes: IndexCache,
}

impl Encoder<'_> {
	fn write_value(&mut self, out: &mut Vec<ScriptItem>, value: &Value, shape: &Shape, depth: u32) -> Result<()> {
		if depth >= self.opt.max_depth {
			return Err(BsorError::DepthExceeded { max_depth: self.opt.max_depth });
		}

		if let Shape::Optional(inner) = shape {
			if matches!(value, Value::Null) {
				out.push(ScriptItem::bool(false));
				return Ok(());
			}
			out.push(ScriptItem::bool(true));
			return self.write_value(out, value, inner, depth + 1);
		}

		let zero;
		let value = if matches!(value, Value::Null) {
			zero = Value::zero(shape)?;
			&zero
		} else {
			value
		};

		match shape {
			Shape::WellKnown(item) => write_well_known(out, value, item),
			Shape::Struct(item) => self.write_struct(out, value, item, depth),
			Shape::Array { elem, fixed } if elem.is_byte() => write_binary(out, value, *fixed, shape),
			Shape::Array { elem, fixed } => self.write_array(out, value, elem, *fixed, depth),
			_ => write_scalar(out, value, shape),
		}
	}

	fn write_struct(&mut self, out: &mut Vec<ScriptItem>, value: &Value, item: &StructRef, depth: u32) -> Result<()> {
		let Value::Struct(struct_value) = value else {
			return Err(BsorError::conversion(item.name(), value.kind()));
		};
		let index = self.indexes.get(item)?;
		reject_undeclared(struct_value, index.name(), |id| index.get(id).is_some())?;

		let mut buffer = Vec::new();
		let mut count = 0_u64;
		for field in index.fields() {
			let Some(field_value) = struct_value.get(field.id) else {
				continue;
			};
			if field_value.is_zero(&field.shape)? {
				continue;
			}

			buffer.push(encode_unsigned(field.id));
			self.write_value(&mut buffer, field_value, &field.shape, depth + 1)?;
			count += 1;
		}

		out.push(encode_unsigned(count));
		out.append(&mut buffer);
		Ok(())
	}

	fn write_array(&mut self, out: &mut Vec<ScriptItem>, value: &Value, elem: &Shape, fixed: Option<usize>, depth: u32) -> Result<()> {
		let Value::Array(items) = value else {
			return Err(BsorError::conversion(format!("[]{elem}"), value.kind()));
		};

		match fixed {
			Some(len) if items.len() != len => {
				return Err(BsorError::conversion(format!("[{len}]{elem}"), format!("{} elements", items.len())));
			}
			Some(_) => {}
			None => out.push(encode_unsigned(items.len() as u64)),
		}

		for item in items {
			self.write_value(out, item, elem, depth + 1)?;
		}
		Ok(())
	}
}

fn reject_undeclared(value: &StructValue, struct_name: &str, declared: impl Fn(u64) -> bool) -> Result<()> {
	match value.fields.iter().find(|field| !declared(field.id)) {
		Some(field) => Err(BsorError::conversion(
			format!("field of {struct_name}"),
			format!("undeclared field {} (id {})", field.name, field.id),
		)),
		None => Ok(()),
	}
}

fn write_scalar(out: &mut Vec<ScriptItem>, value: &Value, shape: &Shape) -> Result<()> {
	let item = match (shape, value) {
		(Shape::Bool, Value::Bool(flag)) => ScriptItem::bool(*flag),
		(Shape::Int(width), _) => encode_number(signed_in_range(value, *width)?),
		(Shape::Uint(width), _) => encode_unsigned(unsigned_in_range(value, *width)?),
		(Shape::Float32, Value::F32(float)) => ScriptItem::push(float.to_le_bytes().to_vec()),
		(Shape::Float64, Value::F64(float)) => ScriptItem::push(float.to_le_bytes().to_vec()),
		(Shape::Float64, Value::F32(float)) => ScriptItem::push(f64::from(*float).to_le_bytes().to_vec()),
		(Shape::String { fixed }, Value::String(text)) => {
			check_fixed(shape, *fixed, text.len())?;
			ScriptItem::push(text.as_bytes().to_vec())
		}
		(Shape::Binary { fixed }, _) => return write_binary(out, value, *fixed, shape),
		_ => return Err(BsorError::conversion(shape.type_name(), value.kind())),
	};
	out.push(item);
	Ok(())
}

fn write_binary(out: &mut Vec<ScriptItem>, value: &Value, fixed: Option<usize>, shape: &Shape) -> Result<()> {
	let bytes = value.as_bytes().ok_or_else(|| BsorError::conversion(shape.type_name(), value.kind()))?;
	check_fixed(shape, fixed, bytes.len())?;
	out.push(ScriptItem::push(bytes.into_owned()));
	Ok(())
}

fn write_well_known(out: &mut Vec<ScriptItem>, value: &Value, item: &WellKnownShape) -> Result<()> {
	let bytes = value.as_bytes().ok_or_else(|| BsorError::conversion(item.name.as_ref(), value.kind()))?;
	match item.fixed {
		Some(len) if bytes.len() != len => {
			return Err(BsorError::conversion(format!("{} of {len} bytes", item.name), format!("{} bytes", bytes.len())));
		}
		_ => {}
	}
	out.push(ScriptItem::push(bytes.into_owned()));
	Ok(())
}

fn check_fixed(shape: &Shape, fixed: Option<usize>, len: usize) -> Result<()> {
	match fixed {
		Some(expected) if expected != len => Err(BsorError::conversion(shape.type_name(), format!("{len} bytes"))),
		_ => Ok(()),
	}
}

fn signed_in_range(value: &Value, width: IntWidth) -> Result<i64> {
	let (min, max) = width.signed_range();
	let number = match value {
		Value::Int(number) => Some(*number),
		Value::Uint(number) => i64::try_from(*number).ok(),
		_ => None,
	};
	number
		.filter(|number| (min..=max).contains(number))
		.ok_or_else(|| BsorError::conversion(format!("int{}", width.bits()), describe(value)))
}

fn unsigned_in_range(value: &Value, width: IntWidth) -> Result<u64> {
	let number = match value {
		Value::Uint(number) => Some(*number),
		Value::Int(number) => u64::try_from(*number).ok(),
		_ => None,
	};
	number
		.filter(|number| *number <= width.unsigned_max())
		.ok_or_else(|| BsorError::conversion(format!("uint{}", width.bits()), describe(value)))
}

fn describe(value: &Value) -> String {
	match value {
		Value::Int(number) => format!("int {number}"),
		Value::Uint(number) => format!("uint {number}"),
		other => other.kind().to_owned(),
	}
}
