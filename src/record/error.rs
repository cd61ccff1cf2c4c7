use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, RecastError>;

const DECODE_PREVIEW_CHARS: usize = 120;

/// Errors produced while normalizing, describing, and materializing records.
#[derive(Debug, Error)]
pub enum RecastError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Text payload is not valid structural encoding.
	#[error("decode: {source} (input={preview:?})", preview = preview(.text))]
	Decode {
		/// Full offending input text.
		text: String,
		/// Underlying parser error.
		source: serde_json::Error,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Schema document could not be parsed.
	#[error("schema parse: {source}")]
	SchemaParse {
		/// Underlying parser error.
		source: serde_json::Error,
	},
	/// Two record kinds share a name.
	#[error("duplicate record kind {name}: first={first}, second={second}")]
	DuplicateKind {
		/// Repeated kind name.
		name: String,
		/// Index of the first declaration.
		first: u32,
		/// Index of the repeated declaration.
		second: u32,
	},
	/// One record kind declares the same field twice.
	#[error("duplicate field {field} on {kind}")]
	DuplicateField {
		/// Owning kind name.
		kind: String,
		/// Repeated field name.
		field: String,
	},
	/// Field references a kind that was never declared.
	#[error("field {kind}.{field} references unknown kind {target}")]
	UnknownKindReference {
		/// Owning kind name.
		kind: String,
		/// Referencing field name.
		field: String,
		/// Missing target kind name.
		target: String,
	},
	/// Nested field declared without a target kind.
	#[error("field {kind}.{field} is nested but names no target kind")]
	MissingKindTarget {
		/// Owning kind name.
		kind: String,
		/// Nested field name.
		field: String,
	},
	/// Requested record kind name was not found.
	#[error("record kind not found: {name}")]
	KindNotFound {
		/// Requested kind name.
		name: String,
	},
	/// Kind id does not address a catalog entry.
	#[error("record kind index out of range: idx={idx}, len={len}")]
	KindIndexOutOfRange {
		/// Offending index.
		idx: u32,
		/// Number of kinds in the catalog.
		len: usize,
	},
	/// Raw value shape does not match the declared field kind.
	#[error("shape mismatch at {path}: expected {expected}, got {got}")]
	ShapeMismatch {
		/// Location of the offending value.
		path: String,
		/// Expected shape label.
		expected: &'static str,
		/// Observed shape label.
		got: &'static str,
	},
	/// Recursion depth reached the configured ceiling.
	#[error("materialize depth exceeded at {path} (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
		/// Location where the ceiling was hit.
		path: String,
	},
	/// Materialized record count exceeded the configured budget.
	#[error("materialize node limit exceeded (max={max_nodes})")]
	NodeLimitExceeded {
		/// Configured record budget.
		max_nodes: usize,
	},
	/// Path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original user-provided path string.
		path: String,
	},
	/// Path expression did not select a present value.
	#[error("path not found: {path}")]
	PathNotFound {
		/// Path expression that failed to resolve.
		path: String,
	},
	/// Typed conversion required a field that is absent.
	#[error("missing field {field} on {kind}")]
	MissingField {
		/// Record kind name.
		kind: String,
		/// Missing field name.
		field: String,
	},
	/// Scalar could not be converted to the requested Rust type.
	#[error("scalar {kind}.{field} has unexpected type: {source}")]
	ScalarType {
		/// Record kind name.
		kind: String,
		/// Field name.
		field: String,
		/// Underlying conversion error.
		source: serde_json::Error,
	},
	/// Typed conversion found a different value kind than required.
	#[error("kind mismatch on {field}: expected {expected}, got {got}")]
	KindMismatch {
		/// Field or record label.
		field: String,
		/// Expected kind label.
		expected: &'static str,
		/// Observed kind label.
		got: String,
	},
}

fn preview(text: &str) -> String {
	if text.chars().count() <= DECODE_PREVIEW_CHARS {
		return text.to_owned();
	}
	let out: String = text.chars().take(DECODE_PREVIEW_CHARS).collect();
	format!("{out}...")
}

#[cfg(test)]
mod tests {
	use super::RecastError;

	#[test]
	fn decode_error_display_truncates_long_input() {
		let text = "x".repeat(500);
		let source = serde_json::from_str::<serde_json::Value>(&text).expect_err("not json");
		let err = RecastError::Decode { text: text.clone(), source };

		let rendered = err.to_string();
		assert!(rendered.contains("..."), "long input should be truncated: {rendered}");
		assert!(rendered.len() < text.len());

		let RecastError::Decode { text: kept, .. } = err else {
			panic!("expected decode error");
		};
		assert_eq!(kept.len(), 500, "full text stays on the variant");
	}
}
