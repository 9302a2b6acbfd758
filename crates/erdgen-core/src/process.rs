use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_schema, ComplexityThresholds, SchemaMetadata};
use crate::error::Result;
use crate::graph::{resolve_order, CyclePolicy};
use crate::schema::{ForeignRef, Schema};
use crate::validation::validate_schema;

/// A schema after one-shot processing: nullable defaults filled in, foreign
/// keys parsed, metadata and generation order attached, validation problems
/// collected. Derived once per input and immutable afterwards; downstream
/// consumers never need to re-run validation or resolution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSchema {
    /// Contract version for this artifact format.
    pub schema_version: String,
    pub schema: Schema,
    pub metadata: SchemaMetadata,
    /// Generation order; tables stuck in a cycle are absent (see
    /// [`crate::graph::CyclePolicy`]) and listed in `excluded_tables`.
    pub dependency_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_tables: Vec<String>,
    /// Human-readable problems; empty when the schema is fully consistent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
}

/// Derive a [`ProcessedSchema`] with default thresholds and cycle policy.
pub fn process_schema(schema: Schema) -> Result<ProcessedSchema> {
    process_schema_with(schema, &ComplexityThresholds::default(), CyclePolicy::Drop)
}

/// Derive a [`ProcessedSchema`] with explicit configuration.
///
/// Only `CyclePolicy::Error` can make this fail; every structural problem is
/// reported through `validation_errors` instead.
pub fn process_schema_with(
    mut schema: Schema,
    thresholds: &ComplexityThresholds,
    policy: CyclePolicy,
) -> Result<ProcessedSchema> {
    for table in &mut schema.tables {
        for column in &mut table.columns {
            if column.nullable.is_none() {
                column.nullable = Some(!column.primary_key);
            }
            column.foreign_ref = column.foreign_key.as_deref().and_then(ForeignRef::parse);
        }
    }

    let validation_errors = validate_schema(&schema);
    let metadata = classify_schema(&schema, thresholds);
    let report = resolve_order(&schema, policy)?;

    Ok(ProcessedSchema {
        schema_version: crate::SCHEMA_VERSION.to_string(),
        schema,
        metadata,
        dependency_order: report.order,
        excluded_tables: report.excluded,
        validation_errors,
    })
}
