#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "bsor", about = "Encode, decode, and inspect BSOR scripts")]
struct Cli {
	/// Raise log verbosity (-v info, -vv debug, -vvv trace).
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print struct definitions of a schema document.
	Defs(cmd::defs::Args),
	/// Encode a JSON value into a script.
	Encode(cmd::encode::Args),
	/// Decode a hex script into a value.
	Decode(cmd::decode::Args),
	/// Show the script number item for an integer.
	Number(cmd::number::Args),
	/// Split hex script bytes into items.
	Asm(cmd::asm::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(verbose: u8) {
	let filter = match verbose {
		0 => EnvFilter::new("warn"),
		1 => EnvFilter::new("info"),
		2 => EnvFilter::new("debug"),
		_ => EnvFilter::new("trace"),
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn run(command: Commands) -> bsor::codec::Result<()> {
	match command {
		Commands::Defs(args) => cmd::defs::run(args),
		Commands::Encode(args) => cmd::encode::run(args),
		Commands::Decode(args) => cmd::decode::run(args),
		Commands::Number(args) => cmd::number::run(args),
		Commands::Asm(args) => cmd::asm::run(args),
	}
}
