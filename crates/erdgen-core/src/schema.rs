use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Declarative relational schema, typically extracted from an ER diagram.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    pub tables: Vec<Table>,
}

/// A table with its ordered column list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

/// Column metadata as delivered by the diagram-parsing collaborator.
///
/// `foreign_key` carries the raw `"Table(Column)"` string from the wire
/// format; `foreign_ref` is its parsed form, filled in during schema
/// processing so lookups never re-parse it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// Declared type as written in the diagram (e.g. `VARCHAR(50)`).
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// Defaults to the negation of `primary_key` when unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip)]
    #[schemars(skip)]
    pub foreign_ref: Option<ForeignRef>,
}

impl Column {
    /// Effective nullability, applying the primary-key default.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(!self.primary_key)
    }

    /// Whether the column carries a foreign-key reference (raw or parsed).
    pub fn has_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }
}

/// Parsed foreign-key reference: `"Agencies(agency_id)"` becomes
/// `ForeignRef { table: "Agencies", column: "agency_id" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignRef {
    pub table: String,
    pub column: String,
}

impl ForeignRef {
    /// Parse the wire encoding `Table(Column)`. Returns `None` for anything
    /// that does not match; callers surface that through validation rather
    /// than failing.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let open = raw.find('(')?;
        let close = raw.rfind(')')?;
        if close != raw.len() - 1 || open == 0 || close <= open + 1 {
            return None;
        }
        let table = raw[..open].trim();
        let column = raw[open + 1..close].trim();
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self {
            table: table.to_string(),
            column: column.to_string(),
        })
    }
}

impl Schema {
    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Whether any column is marked primary key.
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|column| column.primary_key)
    }
}
