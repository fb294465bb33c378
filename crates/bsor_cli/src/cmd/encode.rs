use std::path::PathBuf;

use bsor::codec::{encode, render_asm, to_hex};
use tracing::info;

use crate::cmd::json::value_from_json;
use crate::cmd::util::{emit_json, load_shape, read_json_arg};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_expr: String,
	/// JSON value text, or `@path` to read it from a file.
	#[arg(long)]
	pub value: String,
	/// Print assembly instead of hex.
	#[arg(long)]
	pub asm: bool,
	#[arg(long)]
	pub json: bool,
}

/// Encode a JSON value against a schema type.
pub fn run(args: Args) -> bsor::codec::Result<()> {
	let Args {
		schema: path,
		type_expr,
		value,
		asm,
		json,
	} = args;

	let shape = load_shape(&path, &type_expr)?;
	let input = read_json_arg(&value)?;
	let value = value_from_json(&input, &shape)?;
	let items = encode(&value, &shape)?;
	info!(type_name = %shape, items = items.len(), "encoded value");

	if json {
		return emit_json(&EncodeJson {
			type_name: shape.type_name(),
			items: items.len(),
			hex: to_hex(&items)?,
			asm: render_asm(&items),
		});
	}

	if asm {
		println!("{}", render_asm(&items));
	} else {
		println!("{}", to_hex(&items)?);
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct EncodeJson {
	#[serde(rename = "type")]
	type_name: String,
	items: usize,
	hex: String,
	asm: String,
}
