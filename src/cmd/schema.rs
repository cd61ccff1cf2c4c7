use std::path::PathBuf;

use recast::record::{Catalog, FieldKind, Result};

pub fn run(path: PathBuf, kind_name: Option<String>) -> Result<()> {
	let catalog = Catalog::open(&path)?;

	println!("path: {}", path.display());
	println!("kinds: {}", catalog.len());
	for (id, kind) in catalog.iter() {
		let recursive = if catalog.is_recursive(id) { " recursive" } else { "" };
		println!("  {} fields={}{}", kind.name, kind.fields.len(), recursive);
	}

	if let Some(name) = kind_name {
		let (id, kind) = catalog.kind_by_name(&name)?;
		println!("kind: {}", kind.name);
		println!("kind_index: {}", id.0);
		println!("field_count: {}", kind.fields.len());
		for field in &kind.fields {
			println!("  {}: {}", field.name, render_field_kind(&catalog, field.kind));
		}
	}

	Ok(())
}

fn render_field_kind(catalog: &Catalog, kind: FieldKind) -> String {
	let target = |id| catalog.kind(id).map(|item| item.name.to_string()).unwrap_or_else(|_| "?".to_owned());
	match kind {
		FieldKind::Scalar => "scalar".to_owned(),
		FieldKind::NestedOne(id) => target(id),
		FieldKind::NestedMany(id) => format!("[{}]", target(id)),
		FieldKind::NestedMap(id) => format!("{{string: {}}}", target(id)),
	}
}
