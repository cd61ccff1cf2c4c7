mod catalog;
mod error;
mod materialize;
mod path;
mod raw;
mod source;
mod typed;
mod value;

/// Descriptor graph types and schema documents.
pub use catalog::{Catalog, CatalogBuilder, FieldDesc, FieldKind, FieldShape, FieldSpec, KindBuilder, KindId, KindSpec, RecordKind, SchemaDoc};
/// Error and result aliases.
pub use error::{RecastError, Result};
/// Recursive materialization entry points and options.
pub use materialize::{MaterializeOptions, ShapeMode, materialize, materialize_input, materialize_root};
/// Field path parser types.
pub use path::{FieldPath, PathStep};
/// Raw value normalization.
pub use raw::{RawInput, RawMap, RawValue, normalize, shape_label};
/// Payload loading with compression detection.
pub use source::{Compression, Payload, ZSTD_MAGIC, decode_bytes};
/// Typed record conversion trait.
pub use typed::FromRecord;
/// Materialized record value types.
pub use value::{FieldValue, MapEntry, RecordValue, Value};
