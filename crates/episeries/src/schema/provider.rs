//! Schema provider trait and the shared version-table matcher.

use super::field::Field;
use super::id::SchemaId;

/// Knows the header layouts of one source and recognizes them.
pub trait SchemaProvider: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Expected fields for `schema`, in column order.
    ///
    /// Empty if `schema` does not belong to this provider.
    fn fields(&self, schema: SchemaId) -> &[Field];

    /// Classify a header row as one of this provider's schemas.
    fn detect(&self, header: &[String]) -> SchemaId;
}

/// Ordered list of schema versions with their expected fields.
///
/// Providers own one of these and supply the label function that turns a
/// field into the exact header text of a given version.
#[derive(Debug, Clone)]
pub struct VersionTable {
    versions: Vec<(SchemaId, Vec<Field>)>,
    label: fn(Field, SchemaId) -> &'static str,
}

impl VersionTable {
    /// Create an empty table using `label` to render header text.
    pub fn new(label: fn(Field, SchemaId) -> &'static str) -> Self {
        Self {
            versions: Vec::new(),
            label,
        }
    }

    /// Register a version and its fields.
    pub fn with_version(mut self, schema: SchemaId, fields: &[Field]) -> Self {
        self.versions.push((schema, fields.to_vec()));
        self
    }

    /// Expected fields for `schema`, or an empty slice.
    pub fn fields(&self, schema: SchemaId) -> &[Field] {
        self.versions
            .iter()
            .find(|(id, _)| *id == schema)
            .map(|(_, fields)| fields.as_slice())
            .unwrap_or(&[])
    }

    /// Header labels expected for `schema`.
    pub fn labels(&self, schema: SchemaId) -> Vec<&'static str> {
        self.fields(schema)
            .iter()
            .map(|&field| (self.label)(field, schema))
            .collect()
    }

    /// Find the version matching `header`.
    ///
    /// A version matches when every position compared in lock-step agrees,
    /// stopping at the end of the shorter sequence. Among matches, versions
    /// whose whole header is present win (longest first); otherwise the
    /// shortest partially covered version wins.
    pub fn detect(&self, header: &[String]) -> SchemaId {
        if header.is_empty() {
            return SchemaId::Unknown;
        }

        let matching: Vec<&(SchemaId, Vec<Field>)> = self
            .versions
            .iter()
            .filter(|(schema, fields)| self.prefix_matches(*schema, fields, header))
            .collect();

        let covered = matching
            .iter()
            .filter(|(_, fields)| fields.len() <= header.len())
            .max_by_key(|(_, fields)| fields.len());

        let best = covered.or_else(|| matching.iter().min_by_key(|(_, fields)| fields.len()));

        best.map(|(schema, _)| *schema).unwrap_or(SchemaId::Unknown)
    }

    fn prefix_matches(&self, schema: SchemaId, fields: &[Field], header: &[String]) -> bool {
        header
            .iter()
            .zip(fields)
            .all(|(cell, &field)| cell == (self.label)(field, schema))
    }
}
