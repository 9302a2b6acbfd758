use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use erdgen_core::{ProcessedSchema, Table};

use crate::engine::{GeneratedDataset, GeneratedRow};
use crate::errors::SynthesisError;

/// Write one table as CSV: a header of column names in declaration order,
/// then one line per row. Values are quoted only when they contain a comma
/// or quote character, which is the round-trippable contract downstream
/// tooling relies on.
pub fn write_table_csv(
    path: &Path,
    table: &Table,
    rows: &[GeneratedRow],
) -> Result<u64, SynthesisError> {
    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    let header: Vec<&str> = table.columns.iter().map(|col| col.name.as_str()).collect();
    writer.write_record(&header)?;

    for row in rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|col| {
                row.get(&col.name)
                    .map(|value| value.to_csv())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

/// Persist the whole dataset, one `<Table>.csv` per table. Returns total
/// bytes written.
pub fn write_dataset_csv(
    dir: &Path,
    processed: &ProcessedSchema,
    dataset: &GeneratedDataset,
) -> Result<u64, SynthesisError> {
    let mut bytes = 0_u64;
    for table in &processed.schema.tables {
        let Some(rows) = dataset.rows(&table.name) else {
            continue;
        };
        let path = dir.join(format!("{}.csv", table.name));
        bytes += write_table_csv(&path, table, rows)?;
    }
    Ok(bytes)
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
