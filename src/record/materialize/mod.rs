use crate::record::path::steps_to_string;
use crate::record::raw::shape_label;
use crate::record::value::{FieldValue, MapEntry, RecordValue, Value};
use crate::record::{Catalog, FieldKind, KindId, PathStep, RawInput, RawValue, RecastError, Result, normalize};

/// How a nested field whose raw shape does not match its declared kind is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapeMode {
	/// Fail with [`RecastError::ShapeMismatch`].
	#[default]
	Strict,
	/// Pass the raw value through unchanged as [`Value::Scalar`] and log a warning.
	Lenient,
}

/// Runtime limits and behavior switches for materialization.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
	/// Maximum record nesting depth; the root record sits at depth 0.
	pub max_depth: u32,
	/// Maximum number of records materialized per call.
	pub max_nodes: usize,
	/// Shape mismatch policy.
	pub shape: ShapeMode,
}

impl Default for MaterializeOptions {
	fn default() -> Self {
		Self {
			max_depth: 128,
			max_nodes: 1_000_000,
			shape: ShapeMode::Strict,
		}
	}
}

impl MaterializeOptions {
	/// Default budgets with lenient shape handling.
	pub fn lenient() -> Self {
		Self {
			shape: ShapeMode::Lenient,
			..Self::default()
		}
	}

	/// Tighter budgets for payloads from untrusted peers.
	pub fn for_untrusted() -> Self {
		Self {
			max_depth: 32,
			max_nodes: 100_000,
			shape: ShapeMode::Strict,
		}
	}
}

/// Materialize one record of `kind` from a decoded raw value.
pub fn materialize(catalog: &Catalog, kind: KindId, raw: &RawValue, opt: &MaterializeOptions) -> Result<RecordValue> {
	let mut state = Materializer::new(catalog, opt);
	let record = state.record(kind, raw, 0)?;
	tracing::debug!(kind = %record.kind, records = state.nodes, "materialized record");
	Ok(record)
}

/// Materialize a top-level value shaped by `root`: a record, a sequence of
/// records, a mapping of records, or a scalar pass-through.
pub fn materialize_root(catalog: &Catalog, root: FieldKind, raw: &RawValue, opt: &MaterializeOptions) -> Result<Value> {
	let mut state = Materializer::new(catalog, opt);
	let value = match root {
		FieldKind::NestedOne(kind) => Value::Record(Box::new(state.record(kind, raw, 0)?)),
		FieldKind::NestedMany(kind) => state.sequence(kind, raw, 0)?,
		FieldKind::NestedMap(kind) => state.mapping(kind, raw, 0)?,
		FieldKind::Scalar => Value::Scalar(raw.clone()),
	};
	tracing::debug!(root = root.expected_label(), records = state.nodes, "materialized root");
	Ok(value)
}

/// Normalize `input`, then materialize one record of `kind`.
pub fn materialize_input(catalog: &Catalog, kind: KindId, input: impl Into<RawInput>, opt: &MaterializeOptions) -> Result<RecordValue> {
	let raw = normalize(input)?;
	materialize(catalog, kind, &raw, opt)
}

impl Catalog {
	/// Normalize `text` and materialize it as the kind named `kind`.
	pub fn materialize_text(&self, kind: &str, text: &str, opt: &MaterializeOptions) -> Result<RecordValue> {
		materialize_input(self, self.kind_id(kind)?, text, opt)
	}
}

struct Materializer<'a> {
	catalog: &'a Catalog,
	opt: &'a MaterializeOptions,
	nodes: usize,
	path: Vec<PathStep>,
}

impl<'a> Materializer<'a> {
	fn new(catalog: &'a Catalog, opt: &'a MaterializeOptions) -> Self {
		Self {
			catalog,
			opt,
			nodes: 0,
			path: Vec::new(),
		}
	}

	fn record(&mut self, kind: KindId, raw: &RawValue, depth: u32) -> Result<RecordValue> {
		if depth >= self.opt.max_depth {
			return Err(RecastError::DepthExceeded {
				max_depth: self.opt.max_depth,
				path: steps_to_string(&self.path),
			});
		}
		self.nodes += 1;
		if self.nodes > self.opt.max_nodes {
			return Err(RecastError::NodeLimitExceeded { max_nodes: self.opt.max_nodes });
		}

		let catalog = self.catalog;
		let item = catalog.kind(kind)?;
		let map = match raw {
			RawValue::Object(map) => Some(map),
			other => {
				self.mismatch(FieldKind::NestedOne(kind), other)?;
				None
			}
		};

		let mut fields = Vec::with_capacity(item.fields.len());
		for field in &item.fields {
			let value = match map.and_then(|map| map.get(&*field.name)) {
				None | Some(RawValue::Null) => None,
				Some(raw_field) => {
					self.path.push(PathStep::Field(field.name.to_string()));
					let value = self.field(field.kind, raw_field, depth)?;
					self.path.pop();
					Some(value)
				}
			};
			fields.push(FieldValue {
				name: field.name.clone(),
				value,
			});
		}

		Ok(RecordValue {
			kind: item.name.clone(),
			fields,
		})
	}

	fn field(&mut self, kind: FieldKind, raw: &RawValue, depth: u32) -> Result<Value> {
		let child = depth + 1;
		match kind {
			FieldKind::Scalar => Ok(Value::Scalar(raw.clone())),
			FieldKind::NestedOne(target) => self.element(target, raw, child),
			FieldKind::NestedMany(target) => self.sequence(target, raw, child),
			FieldKind::NestedMap(target) => self.mapping(target, raw, child),
		}
	}

	fn element(&mut self, kind: KindId, raw: &RawValue, depth: u32) -> Result<Value> {
		match raw {
			RawValue::Object(_) => Ok(Value::Record(Box::new(self.record(kind, raw, depth)?))),
			// Absent slot; keeps sequence length and mapping key set intact.
			RawValue::Null => Ok(Value::Scalar(RawValue::Null)),
			other => self.mismatch(FieldKind::NestedOne(kind), other),
		}
	}

	fn sequence(&mut self, kind: KindId, raw: &RawValue, depth: u32) -> Result<Value> {
		let RawValue::Array(items) = raw else {
			return self.mismatch(FieldKind::NestedMany(kind), raw);
		};

		let mut out = Vec::with_capacity(items.len());
		for (index, item) in items.iter().enumerate() {
			self.path.push(PathStep::Index(index));
			let value = self.element(kind, item, depth)?;
			self.path.pop();
			out.push(value);
		}
		Ok(Value::Sequence(out))
	}

	fn mapping(&mut self, kind: KindId, raw: &RawValue, depth: u32) -> Result<Value> {
		let RawValue::Object(map) = raw else {
			return self.mismatch(FieldKind::NestedMap(kind), raw);
		};

		let mut out = Vec::with_capacity(map.len());
		for (key, item) in map {
			self.path.push(PathStep::Key(key.clone()));
			let value = self.element(kind, item, depth)?;
			self.path.pop();
			out.push(MapEntry {
				key: key.as_str().into(),
				value,
			});
		}
		Ok(Value::Mapping(out))
	}

	fn mismatch(&self, expected: FieldKind, raw: &RawValue) -> Result<Value> {
		let path = steps_to_string(&self.path);
		match self.opt.shape {
			ShapeMode::Strict => Err(RecastError::ShapeMismatch {
				path,
				expected: expected.expected_label(),
				got: shape_label(raw),
			}),
			ShapeMode::Lenient => {
				tracing::warn!(
					path = %path,
					expected = expected.expected_label(),
					got = shape_label(raw),
					"shape mismatch, passing raw value through"
				);
				Ok(Value::Scalar(raw.clone()))
			}
		}
	}
}
