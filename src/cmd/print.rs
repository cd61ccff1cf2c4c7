use std::fmt::Write;

use recast::record::{RawValue, Value};

/// Output truncation and formatting limits for materialized values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of fields printed for a single record.
	pub max_fields_per_record: usize,
	/// Maximum number of Unicode scalar values printed for scalars.
	pub max_string_len: usize,
	/// Maximum number of elements printed for sequences and mappings.
	pub max_array_items: usize,
	/// Maximum recursive print depth for nested values.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_fields_per_record: 80,
			max_string_len: 200,
			max_array_items: 16,
			max_print_depth: 8,
		}
	}
}

/// Print a materialized value tree to stdout.
pub fn print_value(value: &Value, options: PrintOptions) {
	let mut out = String::new();
	render_value(&mut out, value, 0, 0, options);
	print!("{out}");
}

/// Render a value as an indented tree. Absent fields render as `<absent>`.
pub fn render_value(out: &mut String, value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	match value {
		Value::Scalar(raw) => {
			let _ = writeln!(out, "{pad}{}", render_scalar(raw, options.max_string_len));
		}
		Value::Sequence(items) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}[... {} items]", items.len());
				return;
			}
			let _ = writeln!(out, "{pad}[");
			for item in items.iter().take(options.max_array_items) {
				render_value(out, item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_array_items {
				let _ = writeln!(out, "{pad}  ... {} more", items.len() - options.max_array_items);
			}
			let _ = writeln!(out, "{pad}]");
		}
		Value::Mapping(entries) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}{{... {} entries}}", entries.len());
				return;
			}
			let _ = writeln!(out, "{pad}{{");
			for entry in entries.iter().take(options.max_array_items) {
				let _ = writeln!(out, "{pad}  \"{}\" =>", entry.key);
				render_value(out, &entry.value, indent + 4, depth + 1, options);
			}
			if entries.len() > options.max_array_items {
				let _ = writeln!(out, "{pad}  ... {} more", entries.len() - options.max_array_items);
			}
			let _ = writeln!(out, "{pad}}}");
		}
		Value::Record(item) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}{} {{ ... }}", item.kind);
				return;
			}
			let _ = writeln!(out, "{pad}{} {{", item.kind);
			for field in item.fields.iter().take(options.max_fields_per_record) {
				match &field.value {
					None => {
						let _ = writeln!(out, "{pad}  {} = <absent>", field.name);
					}
					Some(Value::Scalar(raw)) => {
						let _ = writeln!(out, "{pad}  {} = {}", field.name, render_scalar(raw, options.max_string_len));
					}
					Some(nested) => {
						let _ = writeln!(out, "{pad}  {} =", field.name);
						render_value(out, nested, indent + 4, depth + 1, options);
					}
				}
			}
			if item.fields.len() > options.max_fields_per_record {
				let _ = writeln!(out, "{pad}  ... {} more fields", item.fields.len() - options.max_fields_per_record);
			}
			let _ = writeln!(out, "{pad}}}");
		}
	}
}

fn render_scalar(raw: &RawValue, max_len: usize) -> String {
	match raw {
		RawValue::String(text) => format!("\"{}\"", truncate(text, max_len)),
		other => truncate(&other.to_string(), max_len),
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}

#[cfg(test)]
mod tests {
	use recast::record::{FieldValue, MapEntry, RecordValue, Value};
	use serde_json::json;

	use super::{PrintOptions, render_value};

	fn render(value: &Value, options: PrintOptions) -> String {
		let mut out = String::new();
		render_value(&mut out, value, 0, 0, options);
		out
	}

	fn file(name: &str) -> Value {
		Value::Record(Box::new(RecordValue {
			kind: "FileInfo".into(),
			fields: vec![
				FieldValue {
					name: "name".into(),
					value: Some(Value::Scalar(json!(name))),
				},
				FieldValue {
					name: "children".into(),
					value: None,
				},
			],
		}))
	}

	#[test]
	fn record_tree_renders_absent_and_nested_fields() {
		let out = render(&file("a.txt"), PrintOptions::default());
		assert_eq!(out, "FileInfo {\n  name = \"a.txt\"\n  children = <absent>\n}\n");
	}

	#[test]
	fn long_sequences_are_truncated() {
		let value = Value::Sequence((0..5).map(|i| file(&format!("f{i}"))).collect());
		let options = PrintOptions {
			max_array_items: 2,
			..PrintOptions::default()
		};

		let out = render(&value, options);
		assert!(out.contains("... 3 more"), "got {out}");
		assert_eq!(out.matches("FileInfo {").count(), 2);
	}

	#[test]
	fn depth_limit_collapses_nested_values() {
		let value = Value::Mapping(vec![MapEntry {
			key: "a".into(),
			value: file("a.txt"),
		}]);
		let options = PrintOptions {
			max_print_depth: 1,
			..PrintOptions::default()
		};

		let out = render(&value, options);
		assert!(out.contains("\"a\" =>"));
		assert!(out.contains("FileInfo { ... }"), "got {out}");
	}

	#[test]
	fn long_strings_are_truncated() {
		let options = PrintOptions {
			max_string_len: 4,
			..PrintOptions::default()
		};
		let out = render(&Value::Scalar(json!("abcdefgh")), options);
		assert_eq!(out, "\"abcd...\"\n");
	}
}
