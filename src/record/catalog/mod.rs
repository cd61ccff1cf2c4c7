use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::record::{RecastError, Result};

/// Stable index of a record kind inside a [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(pub u32);

impl KindId {
	/// Position in [`Catalog::kinds`].
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// How a declared field is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	/// Direct pass-through assignment.
	Scalar,
	/// One nested record.
	NestedOne(KindId),
	/// Ordered sequence of nested records.
	NestedMany(KindId),
	/// Keyed mapping of nested records.
	NestedMap(KindId),
}

impl FieldKind {
	/// Nested record kind, if any.
	pub fn target(self) -> Option<KindId> {
		match self {
			Self::Scalar => None,
			Self::NestedOne(id) | Self::NestedMany(id) | Self::NestedMap(id) => Some(id),
		}
	}

	/// Shape label used in diagnostics.
	pub fn expected_label(self) -> &'static str {
		match self {
			Self::Scalar => "scalar",
			Self::NestedOne(_) => "record",
			Self::NestedMany(_) => "sequence of records",
			Self::NestedMap(_) => "mapping of records",
		}
	}
}

/// One declared field of a record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDesc {
	/// Field name as it appears in raw mappings.
	pub name: Box<str>,
	/// Materialization kind.
	pub kind: FieldKind,
}

/// One record kind: a name plus ordered field declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKind {
	/// Unique kind name.
	pub name: Box<str>,
	/// Field declarations in materialization order.
	pub fields: Vec<FieldDesc>,
}

/// Resolved descriptor graph. Kinds reference each other by [`KindId`], so
/// self-nesting and mutually nesting kinds are plain index cycles.
#[derive(Debug, Clone)]
pub struct Catalog {
	/// Record kinds indexed by [`KindId`].
	pub kinds: Vec<RecordKind>,
	by_name: HashMap<Box<str>, KindId>,
}

impl Catalog {
	/// Start declaring kinds by name.
	pub fn builder() -> CatalogBuilder {
		CatalogBuilder::default()
	}

	/// Parse a JSON schema document.
	pub fn from_json(text: &str) -> Result<Self> {
		let doc: SchemaDoc = serde_json::from_str(text).map_err(|source| RecastError::SchemaParse { source })?;
		CatalogBuilder::from(doc).build()
	}

	/// Read and parse a JSON schema document from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let text = fs::read_to_string(path)?;
		Self::from_json(&text)
	}

	/// Number of declared kinds.
	pub fn len(&self) -> usize {
		self.kinds.len()
	}

	/// Whether the catalog declares no kinds.
	pub fn is_empty(&self) -> bool {
		self.kinds.is_empty()
	}

	/// Look up a kind by id.
	pub fn kind(&self, id: KindId) -> Result<&RecordKind> {
		self.kinds.get(id.index()).ok_or(RecastError::KindIndexOutOfRange {
			idx: id.0,
			len: self.kinds.len(),
		})
	}

	/// Resolve a kind name to its id.
	pub fn kind_id(&self, name: &str) -> Result<KindId> {
		self.by_name
			.get(name)
			.copied()
			.ok_or_else(|| RecastError::KindNotFound { name: name.to_owned() })
	}

	/// Look up a kind by name.
	pub fn kind_by_name(&self, name: &str) -> Result<(KindId, &RecordKind)> {
		let id = self.kind_id(name)?;
		Ok((id, self.kind(id)?))
	}

	/// Iterate kinds with their ids in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (KindId, &RecordKind)> {
		self.kinds.iter().enumerate().map(|(idx, kind)| (KindId(idx as u32), kind))
	}

	/// Whether `id` can reach itself through nested fields.
	pub fn is_recursive(&self, id: KindId) -> bool {
		let mut seen = vec![false; self.kinds.len()];
		let mut stack: Vec<KindId> = self.targets(id).collect();

		while let Some(next) = stack.pop() {
			if next == id {
				return true;
			}
			let Some(slot) = seen.get_mut(next.index()) else {
				continue;
			};
			if *slot {
				continue;
			}
			*slot = true;
			stack.extend(self.targets(next));
		}

		false
	}

	fn targets(&self, id: KindId) -> impl Iterator<Item = KindId> + '_ {
		self.kinds
			.get(id.index())
			.into_iter()
			.flat_map(|kind| kind.fields.iter().filter_map(|field| field.kind.target()))
	}
}

/// Serialized schema document: `{"kinds": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDoc {
	/// Declared kinds in order.
	pub kinds: Vec<KindSpec>,
}

/// Unresolved kind declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindSpec {
	/// Kind name.
	pub name: String,
	/// Field declarations.
	#[serde(default)]
	pub fields: Vec<FieldSpec>,
}

/// Unresolved field declaration; `of` names the nested kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
	/// Field name.
	pub name: String,
	/// Field shape, scalar when omitted.
	#[serde(default)]
	pub kind: FieldShape,
	/// Target kind name for nested shapes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub of: Option<String>,
}

/// Field shape tag used by schema documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
	/// Pass-through field.
	#[default]
	Scalar,
	/// One nested record.
	One,
	/// Sequence of nested records.
	Many,
	/// Mapping of nested records.
	Map,
}

/// Name-addressed catalog builder; references resolve in [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
	kinds: Vec<KindSpec>,
}

impl From<SchemaDoc> for CatalogBuilder {
	fn from(doc: SchemaDoc) -> Self {
		Self { kinds: doc.kinds }
	}
}

impl CatalogBuilder {
	/// Declare a kind; `fields` adds its field declarations.
	pub fn kind(mut self, name: &str, fields: impl FnOnce(KindBuilder) -> KindBuilder) -> Self {
		let built = fields(KindBuilder::default());
		self.kinds.push(KindSpec {
			name: name.to_owned(),
			fields: built.fields,
		});
		self
	}

	/// Resolve names into ids and validate the graph.
	pub fn build(self) -> Result<Catalog> {
		let mut by_name: HashMap<Box<str>, KindId> = HashMap::with_capacity(self.kinds.len());
		for (idx, spec) in self.kinds.iter().enumerate() {
			let id = KindId(idx as u32);
			if let Some(first) = by_name.insert(spec.name.clone().into_boxed_str(), id) {
				return Err(RecastError::DuplicateKind {
					name: spec.name.clone(),
					first: first.0,
					second: id.0,
				});
			}
		}

		let mut kinds = Vec::with_capacity(self.kinds.len());
		for spec in self.kinds {
			let mut fields: Vec<FieldDesc> = Vec::with_capacity(spec.fields.len());
			for field in spec.fields {
				if fields.iter().any(|item| *item.name == *field.name) {
					return Err(RecastError::DuplicateField {
						kind: spec.name,
						field: field.name,
					});
				}
				let kind = resolve_field(&by_name, &spec.name, &field)?;
				fields.push(FieldDesc {
					name: field.name.into_boxed_str(),
					kind,
				});
			}
			kinds.push(RecordKind {
				name: spec.name.into_boxed_str(),
				fields,
			});
		}

		Ok(Catalog { kinds, by_name })
	}
}

fn resolve_field(by_name: &HashMap<Box<str>, KindId>, kind: &str, field: &FieldSpec) -> Result<FieldKind> {
	if field.kind == FieldShape::Scalar {
		return Ok(FieldKind::Scalar);
	}

	let target = field.of.as_deref().ok_or_else(|| RecastError::MissingKindTarget {
		kind: kind.to_owned(),
		field: field.name.clone(),
	})?;
	let id = by_name.get(target).copied().ok_or_else(|| RecastError::UnknownKindReference {
		kind: kind.to_owned(),
		field: field.name.clone(),
		target: target.to_owned(),
	})?;

	Ok(match field.kind {
		FieldShape::Scalar => FieldKind::Scalar,
		FieldShape::One => FieldKind::NestedOne(id),
		FieldShape::Many => FieldKind::NestedMany(id),
		FieldShape::Map => FieldKind::NestedMap(id),
	})
}

/// Field list builder for one kind.
#[derive(Debug, Clone, Default)]
pub struct KindBuilder {
	fields: Vec<FieldSpec>,
}

impl KindBuilder {
	/// Declare a pass-through field.
	pub fn scalar(self, name: &str) -> Self {
		self.push(name, FieldShape::Scalar, None)
	}

	/// Declare a nested record field.
	pub fn one(self, name: &str, of: &str) -> Self {
		self.push(name, FieldShape::One, Some(of))
	}

	/// Declare a nested record sequence field.
	pub fn many(self, name: &str, of: &str) -> Self {
		self.push(name, FieldShape::Many, Some(of))
	}

	/// Declare a nested record mapping field.
	pub fn map(self, name: &str, of: &str) -> Self {
		self.push(name, FieldShape::Map, Some(of))
	}

	fn push(mut self, name: &str, kind: FieldShape, of: Option<&str>) -> Self {
		self.fields.push(FieldSpec {
			name: name.to_owned(),
			kind,
			of: of.map(str::to_owned),
		});
		self
	}
}
