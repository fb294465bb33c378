//! Conversion between JSON documents and runtime values, guided by a shape.
//!
//! Binary and well-known payloads are hex strings. Structs are objects keyed by field name;
//! keys left out of an object are treated as zero.

use bsor::codec::{BsorError, Result, Shape, StructValue, Value};
use serde_json::{Map, Number};

/// Build a runtime value of `shape` from JSON.
pub fn value_from_json(json: &serde_json::Value, shape: &Shape) -> Result<Value> {
	if json.is_null() {
		return Ok(Value::Null);
	}

	Ok(match shape {
		Shape::Optional(inner) => value_from_json(json, inner)?,
		Shape::Bool => Value::Bool(json.as_bool().ok_or_else(|| mismatch(shape, json))?),
		Shape::Int(_) => Value::Int(json.as_i64().ok_or_else(|| mismatch(shape, json))?),
		Shape::Uint(_) => Value::Uint(json.as_u64().ok_or_else(|| mismatch(shape, json))?),
		Shape::Float32 => Value::F32(json.as_f64().ok_or_else(|| mismatch(shape, json))? as f32),
		Shape::Float64 => Value::F64(json.as_f64().ok_or_else(|| mismatch(shape, json))?),
		Shape::String { .. } => Value::String(json.as_str().ok_or_else(|| mismatch(shape, json))?.to_owned()),
		Shape::Binary { .. } | Shape::WellKnown(_) => {
			let text = json.as_str().ok_or_else(|| mismatch(shape, json))?;
			Value::Bytes(hex::decode(text.strip_prefix("0x").unwrap_or(text))?)
		}
		Shape::Array { elem, .. } => {
			let items = json.as_array().ok_or_else(|| mismatch(shape, json))?;
			Value::Array(items.iter().map(|item| value_from_json(item, elem)).collect::<Result<_>>()?)
		}
		Shape::Struct(item) => {
			let object = json.as_object().ok_or_else(|| mismatch(shape, json))?;
			let fields = item.fields()?;
			if let Some(key) = object.keys().find(|key| !fields.iter().any(|field| field.name.as_ref() == key.as_str())) {
				return Err(BsorError::conversion(format!("field of {}", item.name()), format!("undeclared field {key}")));
			}

			let mut out = StructValue::new(item.name());
			for field in fields.iter() {
				if let Some(raw) = object.get(field.name.as_ref()) {
					out.push(field.id, &field.name, value_from_json(raw, &field.shape)?);
				}
			}
			Value::Struct(out)
		}
	})
}

/// Render a runtime value as JSON.
pub fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Null => serde_json::Value::Null,
		Value::Bool(flag) => serde_json::Value::Bool(*flag),
		Value::Int(number) => serde_json::Value::from(*number),
		Value::Uint(number) => serde_json::Value::from(*number),
		Value::F32(number) => float_json(f64::from(*number)),
		Value::F64(number) => float_json(*number),
		Value::String(text) => serde_json::Value::String(text.clone()),
		Value::Bytes(bytes) => serde_json::Value::String(hex::encode(bytes)),
		Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
		Value::Struct(item) => {
			let mut object = Map::new();
			for field in &item.fields {
				object.insert(field.name.to_string(), value_to_json(&field.value));
			}
			serde_json::Value::Object(object)
		}
	}
}

fn float_json(number: f64) -> serde_json::Value {
	// JSON has no NaN or infinities.
	Number::from_f64(number).map_or_else(|| serde_json::Value::String(number.to_string()), serde_json::Value::Number)
}

fn mismatch(shape: &Shape, json: &serde_json::Value) -> BsorError {
	let got = match json {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "bool",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "array",
		serde_json::Value::Object(_) => "object",
	};
	BsorError::conversion(shape.type_name(), format!("json {got}"))
}
