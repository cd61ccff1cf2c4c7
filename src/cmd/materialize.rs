use std::io::Write;
use std::path::PathBuf;

use recast::record::{Catalog, FieldKind, FieldPath, MaterializeOptions, Payload, Result, ShapeMode, Value, materialize_root};

use crate::cmd::print::{PrintOptions, print_value};

/// Top-level payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RootShape {
	/// One record.
	Record,
	/// Sequence of records.
	Sequence,
	/// Keyed mapping of records.
	Mapping,
}

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long)]
	pub kind: String,
	/// Payload file, stdin when omitted.
	#[arg(long)]
	pub input: Option<PathBuf>,
	#[arg(long, value_enum, default_value_t = RootShape::Record)]
	pub shape: RootShape,
	#[arg(long)]
	pub lenient: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-nodes")]
	pub max_nodes: Option<usize>,
	#[arg(long = "path")]
	pub path_expr: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Materialize a payload and print it as a tree or JSON.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema,
		kind,
		input,
		shape,
		lenient,
		max_depth,
		max_nodes,
		path_expr,
		json,
	} = args;

	let catalog = Catalog::open(&schema)?;
	let kind_id = catalog.kind_id(&kind)?;
	let payload = match &input {
		Some(path) => Payload::open(path)?,
		None => Payload::read(std::io::stdin().lock())?,
	};

	let mut options = MaterializeOptions::default();
	if lenient {
		options.shape = ShapeMode::Lenient;
	}
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	if let Some(max_nodes) = max_nodes {
		options.max_nodes = max_nodes;
	}

	let root = match shape {
		RootShape::Record => FieldKind::NestedOne(kind_id),
		RootShape::Sequence => FieldKind::NestedMany(kind_id),
		RootShape::Mapping => FieldKind::NestedMap(kind_id),
	};
	let value = materialize_root(&catalog, root, &payload.value, &options)?;

	let selected = match &path_expr {
		Some(text) => value.lookup(&FieldPath::parse(text)?)?,
		None => &value,
	};

	if json {
		return print_json(selected);
	}

	println!("schema: {}", schema.display());
	println!("input: {}", input.as_ref().map(|path| path.display().to_string()).unwrap_or_else(|| "-".to_owned()));
	println!("compression: {}", payload.compression.as_str());
	println!("kind: {kind}");
	if let Some(text) = &path_expr {
		println!("path: {text}");
	}
	println!("value:");
	print_value(selected, PrintOptions::default());

	Ok(())
}

/// Write `value` to stdout as pretty JSON; absent fields are omitted.
pub fn print_json(value: &Value) -> Result<()> {
	let mut stdout = std::io::stdout().lock();
	serde_json::to_writer_pretty(&mut stdout, value).map_err(std::io::Error::from)?;
	writeln!(stdout)?;
	Ok(())
}
