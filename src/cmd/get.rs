use std::path::PathBuf;

use recast::record::Result;

use crate::cmd::materialize::{self, RootShape};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long)]
	pub kind: String,
	#[arg(long = "path")]
	pub path_expr: String,
	#[arg(long)]
	pub input: Option<PathBuf>,
	#[arg(long, value_enum, default_value_t = RootShape::Record)]
	pub shape: RootShape,
	#[arg(long)]
	pub lenient: bool,
}

/// Shorthand for `materialize --json --path`.
pub fn run(args: Args) -> Result<()> {
	materialize::run(materialize::Args {
		schema: args.schema,
		kind: args.kind,
		input: args.input,
		shape: args.shape,
		lenient: args.lenient,
		max_depth: None,
		max_nodes: None,
		path_expr: Some(args.path_expr),
		json: true,
	})
}
