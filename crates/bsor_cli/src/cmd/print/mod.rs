use std::fmt::Write as _;

use bsor::codec::Value;

/// Output truncation limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of fields printed for a single struct.
	pub max_fields_per_struct: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of bytes shown for binary payloads.
	pub max_bytes: usize,
	/// Maximum number of elements printed for arrays.
	pub max_array_items: usize,
	/// Maximum recursive print depth for nested arrays/structs.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_fields_per_struct: 80,
			max_string_len: 200,
			max_bytes: 64,
			max_array_items: 16,
			max_print_depth: 8,
		}
	}
}

/// Print `value` as an indented tree on stdout.
pub fn print_value(value: &Value, indent: usize, options: PrintOptions) {
	print!("{}", render_value(value, indent, options));
}

/// Render `value` as an indented tree, one line per leaf.
pub fn render_value(value: &Value, indent: usize, options: PrintOptions) -> String {
	let mut out = String::new();
	write_value(&mut out, value, indent, 0, options);
	out
}

fn write_value(out: &mut String, value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	match value {
		Value::Array(items) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}[... {} items]", items.len());
				return;
			}
			let _ = writeln!(out, "{pad}[");
			for item in items.iter().take(options.max_array_items) {
				write_value(out, item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_array_items {
				let _ = writeln!(out, "{pad}  ... {} more", items.len() - options.max_array_items);
			}
			let _ = writeln!(out, "{pad}]");
		}
		Value::Struct(item) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}{} {{ ... }}", item.type_name);
				return;
			}
			let _ = writeln!(out, "{pad}{} {{", item.type_name);
			for field in item.fields.iter().take(options.max_fields_per_struct) {
				if matches!(field.value, Value::Struct(_) | Value::Array(_)) {
					let _ = writeln!(out, "{pad}  {} =", field.name);
					write_value(out, &field.value, indent + 4, depth + 1, options);
				} else {
					let _ = writeln!(out, "{pad}  {} = {}", field.name, scalar_text(&field.value, options));
				}
			}
			if item.fields.len() > options.max_fields_per_struct {
				let _ = writeln!(out, "{pad}  ... {} more fields", item.fields.len() - options.max_fields_per_struct);
			}
			let _ = writeln!(out, "{pad}}}");
		}
		scalar => {
			let _ = writeln!(out, "{pad}{}", scalar_text(scalar, options));
		}
	}
}

fn scalar_text(value: &Value, options: PrintOptions) -> String {
	match value {
		Value::Null => "null".to_owned(),
		Value::Bool(flag) => flag.to_string(),
		Value::Int(number) => number.to_string(),
		Value::Uint(number) => number.to_string(),
		Value::F32(number) => number.to_string(),
		Value::F64(number) => number.to_string(),
		Value::String(text) => format!("\"{}\"", truncate(text, options.max_string_len)),
		Value::Bytes(bytes) if bytes.len() > options.max_bytes => {
			format!("0x{}... ({} bytes)", hex::encode(&bytes[..options.max_bytes]), bytes.len())
		}
		Value::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
		Value::Array(items) => format!("[{} items]", items.len()),
		Value::Struct(item) => format!("{} {{ .. }}", item.type_name),
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	let mut chars = input.chars();
	let head: String = chars.by_ref().take(max_len).collect();
	if chars.next().is_some() { format!("{head}...") } else { head }
}
