use bsor::codec::{BsorError, ScriptItem, encode_number, encode_unsigned, to_hex};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Decimal integer; a leading `-` selects the signed range.
	#[arg(allow_hyphen_values = true)]
	pub value: String,
	#[arg(long)]
	pub json: bool,
}

/// Show the script item a number encodes to.
pub fn run(args: Args) -> bsor::codec::Result<()> {
	let item = parse_number_item(&args.value)?;

	if args.json {
		return emit_json(&NumberJson {
			value: args.value,
			kind: item.kind(),
			item: item.to_string(),
			hex: to_hex(std::slice::from_ref(&item))?,
		});
	}

	println!("value: {}", args.value);
	println!("kind: {}", item.kind());
	println!("item: {item}");
	println!("hex: {}", to_hex(std::slice::from_ref(&item))?);
	Ok(())
}

fn parse_number_item(raw: &str) -> bsor::codec::Result<ScriptItem> {
	let invalid = || BsorError::conversion("decimal integer", raw);
	if raw.starts_with('-') {
		return raw.parse::<i64>().map(encode_number).map_err(|_| invalid());
	}
	raw.parse::<u64>().map(encode_unsigned).map_err(|_| invalid())
}

#[derive(serde::Serialize)]
struct NumberJson {
	value: String,
	kind: &'static str,
	item: String,
	hex: String,
}
