use bsor::codec::parse_script_hex;

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Hex script bytes.
	pub hex: String,
	#[arg(long)]
	pub json: bool,
}

/// List the items of a raw script.
pub fn run(args: Args) -> bsor::codec::Result<()> {
	let items = parse_script_hex(&args.hex)?;

	if args.json {
		let payload = AsmJson {
			count: items.len(),
			items: items
				.iter()
				.enumerate()
				.map(|(index, item)| ItemJson {
					index,
					kind: item.kind(),
					text: item.to_string(),
				})
				.collect(),
		};
		return emit_json(&payload);
	}

	println!("items: {}", items.len());
	println!("index\tkind\titem");
	for (index, item) in items.iter().enumerate() {
		println!("{index}\t{}\t{item}", item.kind());
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct AsmJson {
	count: usize,
	items: Vec<ItemJson>,
}

#[derive(serde::Serialize)]
struct ItemJson {
	index: usize,
	kind: &'static str,
	text: String,
}
