use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{ForeignRef, Schema};

/// How the resolver treats tables stuck in a foreign-key cycle.
///
/// `Drop` leaves cyclic tables out of the order; downstream consumers fall
/// back to declaration order for them. `Error` is the strict alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    #[default]
    Drop,
    Error,
}

/// Outcome of dependency resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    /// Table names in generation order; every table appears after all
    /// tables it has a foreign key into.
    pub order: Vec<String>,
    /// Tables excluded because they participate in, or depend transitively
    /// on, a cycle. In schema-declaration order. Empty for acyclic schemas.
    pub excluded: Vec<String>,
}

/// Compute a linear generation order for the schema's tables.
///
/// Builds a directed edge from the referenced (parent) table to the
/// referencing (child) table for every foreign-key column, then runs Kahn's
/// algorithm. The ready queue is seeded and drained in schema-declaration
/// order, so ties break deterministically. Edges whose parent is absent from
/// the schema are skipped; the validator reports those separately.
pub fn resolve_order(schema: &Schema, policy: CyclePolicy) -> Result<DependencyReport> {
    let mut index_of: HashMap<&str, usize> = HashMap::new();
    for (idx, table) in schema.tables.iter().enumerate() {
        // First declaration wins when names collide.
        index_of.entry(table.name.as_str()).or_insert(idx);
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); schema.tables.len()];
    let mut indegree: Vec<usize> = vec![0; schema.tables.len()];

    for (child_idx, table) in schema.tables.iter().enumerate() {
        for column in &table.columns {
            let Some(raw) = column.foreign_key.as_deref() else {
                continue;
            };
            let Some(fk) = column
                .foreign_ref
                .clone()
                .or_else(|| ForeignRef::parse(raw))
            else {
                continue;
            };
            let Some(&parent_idx) = index_of.get(fk.table.as_str()) else {
                continue;
            };
            // One edge per foreign-key column, including repeats of the
            // same parent and self-references.
            dependents[parent_idx].push(child_idx);
            indegree[child_idx] += 1;
        }
    }

    let mut ready: VecDeque<usize> = (0..schema.tables.len())
        .filter(|idx| indegree[*idx] == 0)
        .collect();

    let mut order = Vec::with_capacity(schema.tables.len());
    while let Some(idx) = ready.pop_front() {
        order.push(schema.tables[idx].name.clone());
        for &child in &dependents[idx] {
            indegree[child] -= 1;
            if indegree[child] == 0 {
                ready.push_back(child);
            }
        }
    }

    let excluded: Vec<String> = (0..schema.tables.len())
        .filter(|idx| indegree[*idx] > 0)
        .map(|idx| schema.tables[idx].name.clone())
        .collect();

    if !excluded.is_empty() && policy == CyclePolicy::Error {
        return Err(Error::CyclicSchema(excluded));
    }

    Ok(DependencyReport { order, excluded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Table};

    fn pk(name: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: "INT".to_string(),
            primary_key: true,
            foreign_key: None,
            nullable: None,
            foreign_ref: None,
        }
    }

    fn fk(name: &str, target: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: "INT".to_string(),
            primary_key: false,
            foreign_key: Some(target.to_string()),
            nullable: None,
            foreign_ref: None,
        }
    }

    fn table(name: &str, columns: Vec<Column>) -> Table {
        Table {
            name: name.to_string(),
            columns,
        }
    }

    #[test]
    fn parents_precede_children() {
        let schema = Schema {
            tables: vec![
                table(
                    "Clients",
                    vec![pk("client_id"), fk("agency_id", "Agencies(agency_id)")],
                ),
                table("Agencies", vec![pk("agency_id")]),
            ],
        };

        let report = resolve_order(&schema, CyclePolicy::Drop).expect("resolve");
        assert_eq!(report.order, vec!["Agencies", "Clients"]);
        assert!(report.excluded.is_empty());
    }

    #[test]
    fn independent_tables_keep_declaration_order() {
        let schema = Schema {
            tables: vec![
                table("Zebras", vec![pk("id")]),
                table("Apples", vec![pk("id")]),
                table("Middle", vec![pk("id")]),
            ],
        };

        let report = resolve_order(&schema, CyclePolicy::Drop).expect("resolve");
        assert_eq!(report.order, vec!["Zebras", "Apples", "Middle"]);
    }

    #[test]
    fn two_table_cycle_is_dropped_and_terminates() {
        let schema = Schema {
            tables: vec![
                table("A", vec![pk("a_id"), fk("b_id", "B(b_id)")]),
                table("B", vec![pk("b_id"), fk("a_id", "A(a_id)")]),
            ],
        };

        let report = resolve_order(&schema, CyclePolicy::Drop).expect("resolve");
        assert!(report.order.is_empty());
        assert_eq!(report.excluded, vec!["A", "B"]);
    }

    #[test]
    fn cycle_policy_error_names_stuck_tables() {
        let schema = Schema {
            tables: vec![
                table("A", vec![pk("a_id"), fk("b_id", "B(b_id)")]),
                table("B", vec![pk("b_id"), fk("a_id", "A(a_id)")]),
            ],
        };

        let err = resolve_order(&schema, CyclePolicy::Error).expect_err("cycle");
        match err {
            Error::CyclicSchema(tables) => assert_eq!(tables, vec!["A", "B"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn table_downstream_of_cycle_is_excluded_too() {
        let schema = Schema {
            tables: vec![
                table("A", vec![pk("a_id"), fk("b_id", "B(b_id)")]),
                table("B", vec![pk("b_id"), fk("a_id", "A(a_id)")]),
                table("C", vec![pk("c_id"), fk("a_id", "A(a_id)")]),
                table("D", vec![pk("d_id")]),
            ],
        };

        let report = resolve_order(&schema, CyclePolicy::Drop).expect("resolve");
        assert_eq!(report.order, vec!["D"]);
        assert_eq!(report.excluded, vec!["A", "B", "C"]);
    }

    #[test]
    fn dangling_parent_does_not_block_ordering() {
        let schema = Schema {
            tables: vec![table(
                "Clients",
                vec![pk("client_id"), fk("agency_id", "Agencies(agency_id)")],
            )],
        };

        let report = resolve_order(&schema, CyclePolicy::Drop).expect("resolve");
        assert_eq!(report.order, vec!["Clients"]);
    }

    #[test]
    fn multiple_foreign_keys_into_same_parent() {
        let schema = Schema {
            tables: vec![
                table("Users", vec![pk("user_id")]),
                table(
                    "Transfers",
                    vec![
                        pk("transfer_id"),
                        fk("from_user", "Users(user_id)"),
                        fk("to_user", "Users(user_id)"),
                    ],
                ),
            ],
        };

        let report = resolve_order(&schema, CyclePolicy::Drop).expect("resolve");
        assert_eq!(report.order, vec!["Users", "Transfers"]);
    }

    #[test]
    fn self_reference_counts_as_cycle() {
        let schema = Schema {
            tables: vec![table(
                "Employees",
                vec![pk("employee_id"), fk("manager_id", "Employees(employee_id)")],
            )],
        };

        let report = resolve_order(&schema, CyclePolicy::Drop).expect("resolve");
        assert!(report.order.is_empty());
        assert_eq!(report.excluded, vec!["Employees"]);
    }
}
