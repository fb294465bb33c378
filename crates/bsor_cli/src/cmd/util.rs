use std::path::Path;

use bsor::codec::{Result, Schema, Shape};
use serde::Serialize;

/// Print `payload` as pretty JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Read inline JSON text, or the contents of a file when written `@path`.
pub(crate) fn read_json_arg(raw: &str) -> Result<serde_json::Value> {
	let text = match raw.strip_prefix('@') {
		Some(path) => std::fs::read_to_string(path)?,
		None => raw.to_owned(),
	};
	Ok(serde_json::from_str(&text)?)
}

/// Load a schema document and resolve one type expression against it.
pub(crate) fn load_shape(path: &Path, type_expr: &str) -> Result<Shape> {
	Schema::load(path)?.shape(type_expr)
}
