use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Options for the synthesis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Run seed; the same seed over the same processed schema yields an
    /// identical dataset.
    pub seed: u64,
    /// Rows per table when nothing more specific applies.
    pub default_rows: u64,
    /// Rows for reference/lookup tables (matched by name prefix).
    pub reference_rows: u64,
    /// Lower-cased name prefixes that mark a table as a reference table.
    pub reference_prefixes: Vec<String>,
    /// Explicit per-table row counts; wins over both defaults.
    pub rows_per_table: BTreeMap<String, u64>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            default_rows: 10,
            reference_rows: 5,
            reference_prefixes: vec![
                "ref_".to_string(),
                "lu_".to_string(),
                "lkp_".to_string(),
            ],
            rows_per_table: BTreeMap::new(),
        }
    }
}

impl SynthesisOptions {
    /// Row count for a table, applying overrides and the reference-prefix
    /// convention.
    pub fn rows_for(&self, table_name: &str) -> u64 {
        if let Some(rows) = self.rows_per_table.get(table_name) {
            return *rows;
        }
        let lower = table_name.to_lowercase();
        if self
            .reference_prefixes
            .iter()
            .any(|prefix| lower.starts_with(prefix.as_str()))
        {
            self.reference_rows
        } else {
            self.default_rows
        }
    }
}

/// Summary of one synthesized table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
    /// Foreign-key lookups that degraded to the row-index placeholder
    /// because the parent table had no rows.
    pub fk_fallbacks: u64,
}

/// Report for a synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub run_id: String,
    pub tables: Vec<TableReport>,
    pub fk_fallbacks_total: u64,
    pub duration_ms: u64,
    /// Filled in by the persistence step; zero when rows were not written.
    pub bytes_written: u64,
}

impl SynthesisReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            tables: Vec::new(),
            fk_fallbacks_total: 0,
            duration_ms: 0,
            bytes_written: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_prefix_gets_the_smaller_count() {
        let options = SynthesisOptions::default();
        assert_eq!(options.rows_for("ref_statuses"), 5);
        assert_eq!(options.rows_for("Ref_Statuses"), 5);
        assert_eq!(options.rows_for("lkp_countries"), 5);
        assert_eq!(options.rows_for("Clients"), 10);
    }

    #[test]
    fn explicit_override_wins() {
        let mut options = SynthesisOptions::default();
        options.rows_per_table.insert("ref_statuses".to_string(), 42);
        assert_eq!(options.rows_for("ref_statuses"), 42);
    }
}
