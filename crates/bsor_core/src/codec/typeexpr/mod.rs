use crate::codec::shape::{IntWidth, Shape, WellKnownShape};
use crate::codec::{BsorError, Result};

/// Parse a type expression such as `*[]Item`, `[4]int32`, or `string(3)`.
///
/// Names that are not built-in scalars are looked up through `resolve`.
pub fn parse_type_expr(raw: &str, resolve: &dyn Fn(&str) -> Option<Shape>) -> Result<Shape> {
	let trimmed = raw.trim();
	let invalid = || BsorError::InvalidTypeExpr { expr: raw.to_owned() };

	if let Some(rest) = trimmed.strip_prefix('*') {
		let inner = parse_type_expr(rest, resolve)?;
		if matches!(inner, Shape::Optional(_)) {
			return Err(invalid());
		}
		return Ok(Shape::optional(inner));
	}

	if let Some(rest) = trimmed.strip_prefix('[') {
		let close = rest.find(']').ok_or_else(invalid)?;
		let len = rest[..close].trim();
		let elem = parse_type_expr(&rest[close + 1..], resolve)?;
		if len.is_empty() {
			return Ok(Shape::array(elem));
		}
		let len = len.parse::<usize>().map_err(|_| invalid())?;
		return Ok(Shape::fixed_array(elem, len));
	}

	let (base, size) = split_size(trimmed).ok_or_else(invalid)?;
	if base.is_empty() {
		return Err(invalid());
	}

	if let Some(shape) = scalar_shape(base, size) {
		return Ok(shape);
	}
	if size.is_some() {
		return Err(invalid());
	}
	resolve(base).ok_or_else(|| BsorError::UnknownType { name: base.to_owned() })
}

/// Parse a type expression that may only reference built-in scalars.
pub fn parse_scalar_expr(raw: &str) -> Result<Shape> {
	parse_type_expr(raw, &|_| None)
}

/// Build a well-known shape for a declared name and optional size.
pub fn well_known(name: &str, size: Option<usize>) -> Shape {
	Shape::WellKnown(WellKnownShape::new(name, size))
}

fn split_size(text: &str) -> Option<(&str, Option<usize>)> {
	let Some(open) = text.find('(') else {
		return Some((text, None));
	};
	let inner = text[open + 1..].strip_suffix(')')?;
	let size = inner.trim().parse::<usize>().ok()?;
	Some((text[..open].trim(), Some(size)))
}

fn scalar_shape(base: &str, size: Option<usize>) -> Option<Shape> {
	let shape = match (base, size) {
		("string", fixed) => Shape::String { fixed },
		("binary" | "bytes", fixed) => Shape::Binary { fixed },
		(_, Some(_)) => return None,
		("bool", None) => Shape::Bool,
		("byte", None) => Shape::Uint(IntWidth::W8),
		("float32", None) => Shape::Float32,
		("float64", None) => Shape::Float64,
		(name, None) => {
			if let Some(bits) = name.strip_prefix("uint") {
				Shape::Uint(IntWidth::from_bits(bits.parse().ok()?)?)
			} else if let Some(bits) = name.strip_prefix("int") {
				Shape::Int(IntWidth::from_bits(bits.parse().ok()?)?)
			} else {
				return None;
			}
		}
	};
	Some(shape)
}

#[cfg(test)]
mod tests;
