use std::path::PathBuf;

use bsor::codec::{DecodeOptions, decode_with, parse_script_hex, render_asm};

use crate::cmd::json::value_to_json;
use crate::cmd::print::{PrintOptions, print_value};
use crate::cmd::util::{emit_json, load_shape};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_expr: String,
	/// Hex script bytes.
	pub hex: String,
	/// Apply the limits meant for scripts from untrusted sources.
	#[arg(long)]
	pub untrusted: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-items")]
	pub max_collection_len: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// Decode a hex script against a schema type.
pub fn run(args: Args) -> bsor::codec::Result<()> {
	let Args {
		schema: path,
		type_expr,
		hex,
		untrusted,
		max_depth,
		max_collection_len,
		json,
	} = args;

	let mut options = if untrusted { DecodeOptions::untrusted() } else { DecodeOptions::default() };
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	if let Some(max_collection_len) = max_collection_len {
		options.max_collection_len = max_collection_len;
	}

	let shape = load_shape(&path, &type_expr)?;
	let items = parse_script_hex(&hex)?;
	let (value, rest) = decode_with(&items, &shape, &options)?;

	if json {
		return emit_json(&DecodeJson {
			type_name: shape.type_name(),
			items: items.len() - rest.len(),
			trailing: render_asm(rest),
			value: value_to_json(&value),
		});
	}

	println!("type: {shape}");
	println!("items: {}", items.len() - rest.len());
	if !rest.is_empty() {
		println!("trailing: {}", render_asm(rest));
	}
	println!("decoded:");
	print_value(&value, 2, PrintOptions::default());
	Ok(())
}

#[derive(serde::Serialize)]
struct DecodeJson {
	#[serde(rename = "type")]
	type_name: String,
	items: usize,
	trailing: String,
	value: serde_json::Value,
}
