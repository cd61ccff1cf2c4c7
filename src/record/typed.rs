use serde::de::DeserializeOwned;

use crate::record::{Catalog, MaterializeOptions, RawValue, RecastError, RecordValue, Result, Value, materialize};

/// Statically typed view of one record kind.
///
/// Implementations read fields through the `RecordValue` accessors below, so
/// absent fields map naturally onto `Option`.
pub trait FromRecord: Sized {
	/// Catalog kind name this type is built from.
	const KIND: &'static str;

	/// Convert a materialized record.
	fn from_record(record: &RecordValue) -> Result<Self>;
}

impl RecordValue {
	/// Deserialize a present scalar field, failing when absent.
	pub fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
		self.optional(name)?.ok_or_else(|| RecastError::MissingField {
			kind: self.kind.to_string(),
			field: name.to_owned(),
		})
	}

	/// Deserialize a scalar field if present.
	pub fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
		let Some(value) = self.get(name) else {
			return Ok(None);
		};
		let raw = value.as_scalar().ok_or_else(|| self.kind_mismatch(name, "scalar", value))?;
		serde_json::from_value(raw.clone()).map(Some).map_err(|source| RecastError::ScalarType {
			kind: self.kind.to_string(),
			field: name.to_owned(),
			source,
		})
	}

	/// Convert a nested record field if present.
	pub fn nested<T: FromRecord>(&self, name: &str) -> Result<Option<T>> {
		self.get(name).map(|value| convert(value, name)).transpose()
	}

	/// Convert a nested record sequence field if present.
	pub fn nested_seq<T: FromRecord>(&self, name: &str) -> Result<Option<Vec<T>>> {
		let Some(value) = self.get(name) else {
			return Ok(None);
		};
		let items = value.as_sequence().ok_or_else(|| self.kind_mismatch(name, "sequence", value))?;
		items.iter().map(|item| convert(item, name)).collect::<Result<Vec<T>>>().map(Some)
	}

	/// Convert a nested record mapping field if present, into any keyed collection.
	pub fn nested_map<T: FromRecord, C: FromIterator<(String, T)>>(&self, name: &str) -> Result<Option<C>> {
		let Some(value) = self.get(name) else {
			return Ok(None);
		};
		let entries = value.as_mapping().ok_or_else(|| self.kind_mismatch(name, "mapping", value))?;
		entries
			.iter()
			.map(|entry| convert(&entry.value, name).map(|item| (entry.key.to_string(), item)))
			.collect::<Result<C>>()
			.map(Some)
	}

	fn kind_mismatch(&self, name: &str, expected: &'static str, value: &Value) -> RecastError {
		RecastError::KindMismatch {
			field: format!("{}.{name}", self.kind),
			expected,
			got: value.kind_label().to_owned(),
		}
	}
}

fn convert<T: FromRecord>(value: &Value, field: &str) -> Result<T> {
	let record = value.as_record().ok_or_else(|| RecastError::KindMismatch {
		field: field.to_owned(),
		expected: T::KIND,
		got: value.kind_label().to_owned(),
	})?;
	if &*record.kind != T::KIND {
		return Err(RecastError::KindMismatch {
			field: field.to_owned(),
			expected: T::KIND,
			got: record.kind.to_string(),
		});
	}
	T::from_record(record)
}

impl Catalog {
	/// Materialize `raw` as `T::KIND` and convert to `T`.
	pub fn materialize_as<T: FromRecord>(&self, raw: &RawValue, opt: &MaterializeOptions) -> Result<T> {
		let record = materialize(self, self.kind_id(T::KIND)?, raw, opt)?;
		T::from_record(&record)
	}
}
