use std::collections::BTreeMap;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use erdgen_core::{Column, ForeignRef, ProcessedSchema, Table};

use crate::heuristics::{GeneratedValue, ValueHeuristics};
use crate::model::{SynthesisOptions, SynthesisReport, TableReport};

/// One synthesized row: column name -> value.
pub type GeneratedRow = BTreeMap<String, GeneratedValue>;

/// All synthesized rows, keyed by table name. Rows stay in creation order;
/// the generation order across tables lives in the processed schema.
#[derive(Debug, Clone, Default)]
pub struct GeneratedDataset {
    pub tables: BTreeMap<String, Vec<GeneratedRow>>,
}

impl GeneratedDataset {
    pub fn rows(&self, table: &str) -> Option<&[GeneratedRow]> {
        self.tables.get(table).map(Vec::as_slice)
    }
}

/// Outcome of a synthesis run.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub dataset: GeneratedDataset,
    pub report: SynthesisReport,
}

/// Row synthesis engine: walks tables in dependency order and resolves
/// foreign keys against rows already materialized for the parent table.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: SynthesisOptions,
}

impl Synthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    /// Generate a dataset for the processed schema. Never fails: structural
    /// problems were collected during processing and foreign-key lookups
    /// degrade to an index placeholder instead of raising.
    pub fn run(&self, processed: &ProcessedSchema) -> SynthesisResult {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let heuristics = ValueHeuristics::default();
        let mut dataset = GeneratedDataset::default();
        let mut report = SynthesisReport::new(run_id.clone());

        // Resolved order first; cycle-excluded tables follow in the order
        // they were declared.
        let order = processed
            .dependency_order
            .iter()
            .chain(processed.excluded_tables.iter());

        info!(
            run_id = %run_id,
            tables = processed.dependency_order.len() + processed.excluded_tables.len(),
            seed = self.options.seed,
            "synthesis started"
        );

        for table_name in order {
            let Some(table) = processed.schema.table(table_name) else {
                continue;
            };
            let rows_requested = self.options.rows_for(table_name);
            let table_seed = hash_seed(self.options.seed, table_name);

            let mut rows: Vec<GeneratedRow> = Vec::with_capacity(rows_requested as usize);
            let mut fk_fallbacks = 0_u64;

            for row_index in 1..=rows_requested {
                let mut rng = ChaCha8Rng::seed_from_u64(hash_row_seed(table_seed, row_index));
                let row = synthesize_row(
                    table,
                    row_index,
                    &heuristics,
                    &dataset,
                    &mut rng,
                    &mut fk_fallbacks,
                );
                rows.push(row);
            }

            if fk_fallbacks > 0 {
                warn!(
                    table = %table_name,
                    fk_fallbacks,
                    "foreign-key lookups fell back to the row index"
                );
            }
            info!(
                table = %table_name,
                rows = rows.len(),
                "table synthesized"
            );

            report.tables.push(TableReport {
                table: table_name.clone(),
                rows_requested,
                rows_generated: rows.len() as u64,
                fk_fallbacks,
            });
            report.fk_fallbacks_total += fk_fallbacks;
            dataset.tables.insert(table_name.clone(), rows);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            duration_ms = report.duration_ms,
            "synthesis completed"
        );

        SynthesisResult { dataset, report }
    }
}

fn synthesize_row(
    table: &Table,
    row_index: u64,
    heuristics: &ValueHeuristics,
    dataset: &GeneratedDataset,
    rng: &mut ChaCha8Rng,
    fk_fallbacks: &mut u64,
) -> GeneratedRow {
    let mut row = GeneratedRow::new();
    for column in &table.columns {
        let value = match foreign_ref_of(column) {
            Some(fk) => resolve_foreign_key(&fk, row_index, dataset, rng, fk_fallbacks),
            None => heuristics.value_for(column, row_index, rng),
        };
        row.insert(column.name.clone(), value);
    }
    row
}

/// The parsed reference when processing filled it in, otherwise parsed from
/// the raw string. The parsed form is not serialized, so a processed schema
/// reloaded from a JSON artifact only carries the raw encoding.
fn foreign_ref_of(column: &Column) -> Option<ForeignRef> {
    column
        .foreign_ref
        .clone()
        .or_else(|| column.foreign_key.as_deref().and_then(ForeignRef::parse))
}

/// Copy the referenced column's value from a uniformly chosen parent row.
/// When the parent has no rows yet (cycle-excluded parent, dangling
/// reference, or a zero-row configuration) the row index stands in, so a
/// single bad reference never sinks the whole table.
fn resolve_foreign_key(
    fk: &ForeignRef,
    row_index: u64,
    dataset: &GeneratedDataset,
    rng: &mut ChaCha8Rng,
    fk_fallbacks: &mut u64,
) -> GeneratedValue {
    if let Some(parent_rows) = dataset.rows(&fk.table)
        && !parent_rows.is_empty()
    {
        let pick = rng.random_range(0..parent_rows.len());
        if let Some(value) = parent_rows[pick].get(&fk.column) {
            return value.clone();
        }
    }
    *fk_fallbacks += 1;
    GeneratedValue::Int(row_index as i64)
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn hash_row_seed(table_seed: u64, row_index: u64) -> u64 {
    let mut hash = table_seed ^ row_index.wrapping_mul(0x9e3779b97f4a7c15);
    hash = hash.wrapping_mul(0x100000001b3);
    hash
}
