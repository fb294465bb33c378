use std::path::PathBuf;

use bsor::codec::{Definitions, Schema, build_definitions};

use crate::cmd::util::{emit_json, load_shape};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	/// Limit output to one type expression and the structs it reaches.
	#[arg(long = "type")]
	pub type_expr: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print the definition catalogue of a schema document.
pub fn run(args: Args) -> bsor::codec::Result<()> {
	let Args { schema: path, type_expr, json } = args;

	let definitions = match &type_expr {
		Some(expr) => {
			let shape = load_shape(&path, expr)?;
			build_definitions(&[shape])?
		}
		None => Schema::load(&path)?.definitions()?,
	};

	if json {
		return emit_json(&DefsJson {
			schema: path.display().to_string(),
			count: definitions.len(),
			definitions: &definitions,
		});
	}

	println!("schema: {}", path.display());
	println!("definitions: {}", definitions.len());
	println!();
	print!("{definitions}");
	Ok(())
}

#[derive(serde::Serialize)]
struct DefsJson<'a> {
	schema: String,
	count: usize,
	definitions: &'a Definitions,
}
