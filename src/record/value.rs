use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::record::{FieldPath, PathStep, RawValue, RecastError, Result};

/// Materialized value of one declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Pass-through raw value, never coerced.
	Scalar(RawValue),
	/// One nested record.
	Record(Box<RecordValue>),
	/// Ordered nested records, same length and order as the input.
	Sequence(Vec<Value>),
	/// Keyed nested records, same key set and order as the input.
	Mapping(Vec<MapEntry>),
}

/// Materialized record with declared fields in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
	/// Record kind name from the catalog.
	pub kind: Box<str>,
	/// Field values in declaration order.
	pub fields: Vec<FieldValue>,
}

/// Named field; `None` means the input omitted the field or set it to null.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier.
	pub name: Box<str>,
	/// Materialized payload, absent when missing or null.
	pub value: Option<Value>,
}

/// One keyed entry of a nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
	/// Mapping key.
	pub key: Box<str>,
	/// Materialized value.
	pub value: Value,
}

impl Value {
	/// Stable label for diagnostics.
	pub fn kind_label(&self) -> &'static str {
		match self {
			Self::Scalar(_) => "scalar",
			Self::Record(_) => "record",
			Self::Sequence(_) => "sequence",
			Self::Mapping(_) => "mapping",
		}
	}

	/// Borrow the scalar payload.
	pub fn as_scalar(&self) -> Option<&RawValue> {
		match self {
			Self::Scalar(value) => Some(value),
			_ => None,
		}
	}

	/// Borrow the nested record.
	pub fn as_record(&self) -> Option<&RecordValue> {
		match self {
			Self::Record(value) => Some(value),
			_ => None,
		}
	}

	/// Borrow the nested sequence.
	pub fn as_sequence(&self) -> Option<&[Value]> {
		match self {
			Self::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow the nested mapping entries.
	pub fn as_mapping(&self) -> Option<&[MapEntry]> {
		match self {
			Self::Mapping(entries) => Some(entries),
			_ => None,
		}
	}

	/// Look up a mapping entry by key.
	pub fn entry(&self, key: &str) -> Option<&Value> {
		self.as_mapping()?.iter().find(|entry| &*entry.key == key).map(|entry| &entry.value)
	}

	/// Follow `path` from this value.
	pub fn lookup(&self, path: &FieldPath) -> Result<&Value> {
		lookup_steps(self, &path.steps).ok_or_else(|| RecastError::PathNotFound { path: path.to_string() })
	}

	/// Convert back into a raw value; absent fields are omitted.
	pub fn to_raw(&self) -> RawValue {
		match self {
			Self::Scalar(value) => value.clone(),
			Self::Record(record) => record.to_raw(),
			Self::Sequence(items) => RawValue::Array(items.iter().map(Value::to_raw).collect()),
			Self::Mapping(entries) => RawValue::Object(entries.iter().map(|entry| (entry.key.to_string(), entry.value.to_raw())).collect()),
		}
	}
}

impl RecordValue {
	/// Field slot by name, including absent fields.
	pub fn field(&self, name: &str) -> Option<&FieldValue> {
		self.fields.iter().find(|field| &*field.name == name)
	}

	/// Present field value by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.field(name).and_then(|field| field.value.as_ref())
	}

	/// Number of present fields.
	pub fn present_count(&self) -> usize {
		self.fields.iter().filter(|field| field.value.is_some()).count()
	}

	/// Follow `path` from this record.
	pub fn lookup(&self, path: &FieldPath) -> Result<&Value> {
		let Some((PathStep::Field(first), rest)) = path.steps.split_first() else {
			return Err(RecastError::PathNotFound { path: path.to_string() });
		};
		self.get(first)
			.and_then(|value| lookup_steps(value, rest))
			.ok_or_else(|| RecastError::PathNotFound { path: path.to_string() })
	}

	/// Convert back into a raw mapping; absent fields are omitted.
	pub fn to_raw(&self) -> RawValue {
		RawValue::Object(
			self.fields
				.iter()
				.filter_map(|field| field.value.as_ref().map(|value| (field.name.to_string(), value.to_raw())))
				.collect(),
		)
	}
}

fn lookup_steps<'a>(mut current: &'a Value, steps: &[PathStep]) -> Option<&'a Value> {
	for step in steps {
		current = match step {
			PathStep::Field(name) => current.as_record()?.get(name)?,
			PathStep::Index(index) => current.as_sequence()?.get(*index)?,
			PathStep::Key(key) => current.entry(key)?,
		};
	}
	Some(current)
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Scalar(value) => value.serialize(serializer),
			Self::Record(record) => record.serialize(serializer),
			Self::Sequence(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Mapping(entries) => {
				let mut map = serializer.serialize_map(Some(entries.len()))?;
				for entry in entries {
					map.serialize_entry(&*entry.key, &entry.value)?;
				}
				map.end()
			}
		}
	}
}

impl Serialize for RecordValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.present_count()))?;
		for field in &self.fields {
			if let Some(value) = &field.value {
				map.serialize_entry(&*field.name, value)?;
			}
		}
		map.end()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::{FieldValue, MapEntry, RecordValue, Value};
	use crate::record::{FieldPath, RecastError};

	fn leaf(name: &str) -> RecordValue {
		RecordValue {
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
		}
	}

	fn tree() -> RecordValue {
		RecordValue {
			kind: "Folder".into(),
			fields: vec![
				FieldValue {
					name: "name".into(),
					value: Some(Value::Scalar(json!("root"))),
				},
				FieldValue {
					name: "children".into(),
					value: Some(Value::Sequence(vec![
						Value::Record(Box::new(leaf("a.txt"))),
						Value::Record(Box::new(leaf("b.txt"))),
					])),
				},
				FieldValue {
					name: "byName".into(),
					value: Some(Value::Mapping(vec![MapEntry {
						key: "a".into(),
						value: Value::Record(Box::new(leaf("a.txt"))),
					}])),
				},
			],
		}
	}

	#[test]
	fn serialization_omits_absent_fields() {
		let out = serde_json::to_value(leaf("a.txt")).expect("serializes");
		assert_eq!(out, json!({"name": "a.txt"}));
	}

	#[test]
	fn to_raw_matches_serialization() {
		let record = tree();
		assert_eq!(record.to_raw(), serde_json::to_value(&record).expect("serializes"));
	}

	#[test]
	fn lookup_follows_fields_indices_and_keys() {
		let record = tree();

		let path = FieldPath::parse("children[1].name").expect("path parses");
		assert_eq!(record.lookup(&path).expect("resolves").as_scalar(), Some(&json!("b.txt")));

		let path = FieldPath::parse(r#"byName["a"].name"#).expect("path parses");
		assert_eq!(record.lookup(&path).expect("resolves").as_scalar(), Some(&json!("a.txt")));
	}

	#[test]
	fn lookup_of_absent_or_out_of_range_fails() {
		let record = tree();
		for text in ["children[0].children", "children[5]", "missing", r#"byName["z"]"#] {
			let path = FieldPath::parse(text).expect("path parses");
			assert!(matches!(record.lookup(&path), Err(RecastError::PathNotFound { .. })), "expected {text} to miss");
		}
	}
}
