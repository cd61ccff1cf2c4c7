use serde::Deserialize;

use crate::record::{RecastError, Result};

/// Untyped structural value as received from a transport boundary.
///
/// Mappings preserve insertion order (`serde_json` is built with `preserve_order`).
pub type RawValue = serde_json::Value;

/// Raw mapping representation.
pub type RawMap = serde_json::Map<String, RawValue>;

/// Normalizer input: either serialized text or an already decoded structure.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
	/// Serialized structural encoding awaiting decode.
	Text(String),
	/// Already decoded structural value.
	Value(RawValue),
}

impl From<&str> for RawInput {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for RawInput {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<RawValue> for RawInput {
	fn from(value: RawValue) -> Self {
		Self::Value(value)
	}
}

/// Ensure `input` is in decoded structural form.
///
/// Text inputs are decoded as JSON. Decoded values, string scalars included,
/// pass through unchanged.
///
/// Decoding applies no nesting limit of its own; record depth is bounded by
/// [`MaterializeOptions::max_depth`](crate::record::MaterializeOptions::max_depth).
pub fn normalize(input: impl Into<RawInput>) -> Result<RawValue> {
	match input.into() {
		RawInput::Text(text) => decode_text(text),
		RawInput::Value(value) => Ok(value),
	}
}

fn decode_text(text: String) -> Result<RawValue> {
	match parse_unbounded(&text) {
		Ok(value) => Ok(value),
		Err(source) => Err(RecastError::Decode { text, source }),
	}
}

fn parse_unbounded(text: &str) -> serde_json::Result<RawValue> {
	let mut de = serde_json::Deserializer::from_str(text);
	de.disable_recursion_limit();
	let value = RawValue::deserialize(&mut de)?;
	de.end()?;
	Ok(value)
}

/// Stable lowercase label for the shape of a raw value.
pub fn shape_label(value: &RawValue) -> &'static str {
	match value {
		RawValue::Null => "null",
		RawValue::Bool(_) => "bool",
		RawValue::Number(_) => "number",
		RawValue::String(_) => "string",
		RawValue::Array(_) => "sequence",
		RawValue::Object(_) => "mapping",
	}
}
