use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Coarse complexity tier for a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    Medium,
    Complex,
}

/// Tier cutoffs. These are configuration, not derived values; override when
/// a deployment wants a different notion of "complex".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComplexityThresholds {
    pub complex_tables: usize,
    pub complex_relationships: usize,
    pub medium_tables: usize,
    pub medium_relationships: usize,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            complex_tables: 20,
            complex_relationships: 30,
            medium_tables: 10,
            medium_relationships: 15,
        }
    }
}

/// Summary metadata derived from a schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    pub table_count: usize,
    pub total_columns: usize,
    /// Number of columns carrying a foreign key.
    pub relationship_count: usize,
    pub complexity: ComplexityTier,
}

/// Pure function of a schema; calling it twice yields identical metadata.
pub fn classify_schema(schema: &Schema, thresholds: &ComplexityThresholds) -> SchemaMetadata {
    let table_count = schema.tables.len();
    let total_columns = schema.tables.iter().map(|table| table.columns.len()).sum();
    let relationship_count = schema
        .tables
        .iter()
        .flat_map(|table| &table.columns)
        .filter(|column| column.has_foreign_key())
        .count();

    let complexity = if table_count > thresholds.complex_tables
        || relationship_count > thresholds.complex_relationships
    {
        ComplexityTier::Complex
    } else if table_count > thresholds.medium_tables
        || relationship_count > thresholds.medium_relationships
    {
        ComplexityTier::Medium
    } else {
        ComplexityTier::Simple
    };

    SchemaMetadata {
        table_count,
        total_columns,
        relationship_count,
        complexity,
    }
}
