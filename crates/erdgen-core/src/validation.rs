use std::collections::{BTreeMap, BTreeSet};

use crate::schema::{ForeignRef, Schema};

/// Validate internal consistency of a schema, collecting human-readable
/// problems instead of failing.
///
/// Checks:
/// - duplicate table names
/// - duplicate column names within a table
/// - foreign-key strings that do not parse as `Table(Column)`
/// - foreign keys naming a table absent from the schema
/// - tables with no primary-key column
///
/// An empty result means the schema is fully consistent. Diagram-extracted
/// schemas are frequently imperfect, so callers keep going and surface the
/// collected errors for display.
pub fn validate_schema(schema: &Schema) -> Vec<String> {
    let mut errors = Vec::new();

    let mut catalog: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for table in &schema.tables {
        if catalog.contains_key(table.name.as_str()) {
            errors.push(format!("duplicate table name: {}", table.name));
            continue;
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                errors.push(format!(
                    "duplicate column name: {}.{}",
                    table.name, column.name
                ));
            }
        }
        catalog.insert(table.name.as_str(), columns);
    }

    for table in &schema.tables {
        if !table.has_primary_key() {
            errors.push(format!("table has no primary key: {}", table.name));
        }

        for column in &table.columns {
            let Some(raw) = column.foreign_key.as_deref() else {
                continue;
            };
            match ForeignRef::parse(raw) {
                None => errors.push(format!(
                    "malformed foreign key on {}.{}: '{}' is not Table(Column)",
                    table.name, column.name, raw
                )),
                Some(fk) => {
                    if !catalog.contains_key(fk.table.as_str()) {
                        errors.push(format!(
                            "foreign key on {}.{} references missing table: {}",
                            table.name, column.name, fk.table
                        ));
                    }
                }
            }
        }
    }

    errors
}
