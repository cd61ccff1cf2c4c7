#![allow(missing_docs)]

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "recast", about = "Materialize loosely-typed payloads into typed records")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Describe the record kinds in a schema document.
	Schema {
		schema: PathBuf,
		#[arg(long)]
		kind: Option<String>,
	},
	/// Materialize a payload and print the typed result.
	Materialize(cmd::materialize::Args),
	/// Print the JSON value selected by a path in a materialized payload.
	Get(cmd::get::Args),
}

fn main() {
	init_tracing();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing() {
	let env = std::env::var("RECAST_LOG").unwrap_or_else(|_| "warn".to_owned());
	let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}

fn run() -> recast::record::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Schema { schema, kind } => cmd::schema::run(schema, kind),
		Commands::Materialize(args) => cmd::materialize::run(args),
		Commands::Get(args) => cmd::get::run(args),
	}
}
