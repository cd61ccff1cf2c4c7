//! Public library API for materializing loosely-typed payloads into typed records.

/// Raw value normalization, record catalogs, and recursive materialization.
pub mod record;
