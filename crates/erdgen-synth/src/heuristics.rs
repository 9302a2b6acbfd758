use chrono::{Datelike, Months, NaiveDate};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use erdgen_core::Column;

/// Scalar value synthesized for a single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl GeneratedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Render the value for the CSV contract. Quoting is the writer's job.
    pub fn to_csv(&self) -> String {
        match self {
            GeneratedValue::Null => String::new(),
            GeneratedValue::Bool(value) => value.to_string(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Float(value) => format!("{value:.2}"),
            GeneratedValue::Text(value) => value.clone(),
        }
    }
}

const FIRST_NAMES: &[&str] = &[
    "Alice", "Brian", "Carla", "Derek", "Elena", "Felix", "Grace", "Hassan", "Irene", "Jonas",
];
const LAST_NAMES: &[&str] = &[
    "Walker", "Nguyen", "Okafor", "Reyes", "Kaur", "Svensson", "Moretti", "Banda", "Fischer",
    "Tanaka",
];
const ENTITY_STEMS: &[&str] = &[
    "Northwind", "Brightline", "Summit", "Harborview", "Redstone", "Lakeside", "Pinnacle",
    "Crescent",
];
const ENTITY_SUFFIXES: &[&str] = &["Group", "Partners", "Holdings", "Agency", "Services"];
const WORDS: &[&str] = &[
    "alpha", "merlot", "cobalt", "juniper", "quartz", "meadow", "harbor", "cinder", "willow",
    "sable",
];
const SENTENCES: &[&str] = &[
    "Scheduled for review at the next planning meeting.",
    "Carried over from the previous reporting period.",
    "Requires confirmation from the account owner.",
    "Generated as part of the standard intake process.",
    "No further action expected at this time.",
];

type Predicate = fn(&Column) -> bool;
type Generate = fn(&Column, u64, NaiveDate, &mut ChaCha8Rng) -> GeneratedValue;

/// One entry in the ordered dispatch table.
struct HeuristicRule {
    name: &'static str,
    applies: Predicate,
    generate: Generate,
}

/// Prioritized rule set mapping a column's name/type/role to a value.
///
/// Rules are evaluated in order and the first match wins, so the priority is
/// a first-class artifact: `rule_name_for` exposes which rule a column
/// dispatches to. Foreign-key columns are resolved by the synthesis engine
/// and never reach this table with a parsed reference, but the primary-key
/// rule still guards against them.
pub struct ValueHeuristics {
    rules: Vec<HeuristicRule>,
    base_date: NaiveDate,
}

impl Default for ValueHeuristics {
    fn default() -> Self {
        // Fixed anchor rather than wall-clock so a seed fully determines
        // the output.
        let base_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN);
        Self::with_base_date(base_date)
    }
}

impl ValueHeuristics {
    pub fn with_base_date(base_date: NaiveDate) -> Self {
        Self {
            rules: rule_table(),
            base_date,
        }
    }

    /// Synthesize one value for `column` at 1-based `row_index`.
    pub fn value_for(
        &self,
        column: &Column,
        row_index: u64,
        rng: &mut ChaCha8Rng,
    ) -> GeneratedValue {
        for rule in &self.rules {
            if (rule.applies)(column) {
                return (rule.generate)(column, row_index, self.base_date, rng);
            }
        }
        // The table ends with a catch-all, so this is unreachable in
        // practice; keep a sane value anyway.
        GeneratedValue::Text("sample".to_string())
    }

    /// Name of the rule `column` dispatches to. Dispatch is a pure function
    /// of the column, independent of row index and randomness.
    pub fn rule_name_for(&self, column: &Column) -> &'static str {
        for rule in &self.rules {
            if (rule.applies)(column) {
                return rule.name;
            }
        }
        "default_word"
    }
}

fn rule_table() -> Vec<HeuristicRule> {
    vec![
        HeuristicRule {
            name: "primary_key_index",
            applies: |column| column.primary_key && !column.has_foreign_key(),
            generate: |_, row_index, _, _| GeneratedValue::Int(row_index as i64),
        },
        HeuristicRule {
            name: "date_time",
            applies: |column| name_contains_any(column, &["date", "time"]),
            generate: generate_date,
        },
        HeuristicRule {
            name: "email",
            applies: |column| name_contains_any(column, &["email"]),
            generate: |_, _, _, rng| {
                let first = pick(FIRST_NAMES, rng).to_lowercase();
                let last = pick(LAST_NAMES, rng).to_lowercase();
                GeneratedValue::Text(format!("{first}.{last}@example.com"))
            },
        },
        HeuristicRule {
            name: "phone",
            applies: |column| name_contains_any(column, &["phone"]),
            generate: |_, _, _, rng| {
                GeneratedValue::Text(format!(
                    "555-{:03}-{:04}",
                    rng.random_range(100..=999),
                    rng.random_range(0..=9999)
                ))
            },
        },
        HeuristicRule {
            name: "display_name",
            applies: |column| name_contains_any(column, &["name", "details"]),
            generate: generate_display_name,
        },
        HeuristicRule {
            name: "monetary",
            applies: |column| name_contains_any(column, &["amount", "price", "cost"]),
            generate: |_, _, _, rng| {
                let cents = rng.random_range(500_000..=5_500_000);
                GeneratedValue::Float(cents as f64 / 100.0)
            },
        },
        HeuristicRule {
            name: "sentence",
            applies: |column| name_contains_any(column, &["description", "purpose", "other"]),
            generate: |_, _, _, rng| GeneratedValue::Text(pick(SENTENCES, rng).to_string()),
        },
        HeuristicRule {
            name: "code_token",
            applies: |column| name_contains_any(column, &["code"]),
            generate: |_, _, _, rng| {
                let letters: String = (0..3)
                    .map(|_| (b'A' + rng.random_range(0..26) as u8) as char)
                    .collect();
                GeneratedValue::Text(format!("{letters}{:04}", rng.random_range(0..=9999)))
            },
        },
        HeuristicRule {
            name: "binary_flag",
            applies: |column| name_contains_any(column, &["_yn", "active", "enabled"]),
            generate: |_, _, _, rng| {
                let flag = if rng.random_bool(0.5) { "Y" } else { "N" };
                GeneratedValue::Text(flag.to_string())
            },
        },
        HeuristicRule {
            name: "type_integer",
            applies: |column| type_contains_any(column, &["int"]),
            generate: |_, _, _, rng| GeneratedValue::Int(rng.random_range(1..=100)),
        },
        HeuristicRule {
            name: "type_decimal",
            applies: |column| {
                type_contains_any(
                    column,
                    &["decimal", "numeric", "float", "double", "real", "money"],
                )
            },
            generate: |_, _, _, rng| {
                let cents = rng.random_range(0..=1_000_000);
                GeneratedValue::Float(cents as f64 / 100.0)
            },
        },
        HeuristicRule {
            name: "type_boolean",
            applies: |column| type_contains_any(column, &["bool", "bit"]),
            generate: |_, _, _, rng| GeneratedValue::Bool(rng.random_bool(0.5)),
        },
        HeuristicRule {
            name: "type_text",
            applies: |column| type_contains_any(column, &["char", "text", "string"]),
            generate: |_, _, _, rng| {
                GeneratedValue::Text(format!("{} {}", pick(WORDS, rng), pick(WORDS, rng)))
            },
        },
        HeuristicRule {
            name: "default_word",
            applies: |_| true,
            generate: |_, _, _, rng| GeneratedValue::Text(pick(WORDS, rng).to_string()),
        },
    ]
}

fn name_contains_any(column: &Column, needles: &[&str]) -> bool {
    let name = column.name.to_lowercase();
    needles.iter().any(|needle| name.contains(needle))
}

fn type_contains_any(column: &Column, needles: &[&str]) -> bool {
    let data_type = column.data_type.to_lowercase();
    needles.iter().any(|needle| data_type.contains(needle))
}

fn pick<'a>(pool: &'a [&'a str], rng: &mut ChaCha8Rng) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}

/// Month offset uniform in [0, 12) into the past, day uniform in [1, 28] so
/// every synthesized date is valid in any month. Columns whose name contains
/// "time" get a full timestamp.
fn generate_date(
    column: &Column,
    _row_index: u64,
    base_date: NaiveDate,
    rng: &mut ChaCha8Rng,
) -> GeneratedValue {
    let months_back = rng.random_range(0..12);
    let day = rng.random_range(1..=28);
    let date = base_date
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(base_date);
    let date = date.with_day(day).unwrap_or(date);

    if column.name.to_lowercase().contains("time") {
        let hour = rng.random_range(0..24);
        let minute = rng.random_range(0..60);
        let second = rng.random_range(0..60);
        GeneratedValue::Text(format!(
            "{}T{hour:02}:{minute:02}:{second:02}",
            date.format("%Y-%m-%d")
        ))
    } else {
        GeneratedValue::Text(date.format("%Y-%m-%d").to_string())
    }
}

fn generate_display_name(
    column: &Column,
    _row_index: u64,
    _base_date: NaiveDate,
    rng: &mut ChaCha8Rng,
) -> GeneratedValue {
    let name = column.name.to_lowercase();
    if name.contains("staff") || name.contains("user") {
        let first = pick(FIRST_NAMES, rng);
        let last = pick(LAST_NAMES, rng);
        return GeneratedValue::Text(format!("{first} {last}"));
    }
    if name.contains("company") || name.contains("agency") || name.contains("client") {
        let stem = pick(ENTITY_STEMS, rng);
        let suffix = pick(ENTITY_SUFFIXES, rng);
        return GeneratedValue::Text(format!("{stem} {suffix}"));
    }
    GeneratedValue::Text(format!("{} {}", pick(WORDS, rng), pick(WORDS, rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn column(name: &str, data_type: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: data_type.to_string(),
            primary_key: false,
            foreign_key: None,
            nullable: None,
            foreign_ref: None,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn primary_key_without_foreign_key_is_row_index() {
        let heuristics = ValueHeuristics::default();
        let mut pk = column("client_id", "INT");
        pk.primary_key = true;

        assert_eq!(heuristics.rule_name_for(&pk), "primary_key_index");
        assert_eq!(
            heuristics.value_for(&pk, 4, &mut rng()),
            GeneratedValue::Int(4)
        );
    }

    #[test]
    fn primary_key_that_is_also_foreign_key_skips_index_rule() {
        let heuristics = ValueHeuristics::default();
        let mut pk_fk = column("agency_id", "INT");
        pk_fk.primary_key = true;
        pk_fk.foreign_key = Some("Agencies(agency_id)".to_string());

        assert_ne!(heuristics.rule_name_for(&pk_fk), "primary_key_index");
    }

    #[test]
    fn dispatch_priority_is_stable() {
        let heuristics = ValueHeuristics::default();
        let cases = [
            ("created_date", "VARCHAR(20)", "date_time"),
            ("start_time", "VARCHAR(20)", "date_time"),
            ("user_email", "VARCHAR(50)", "email"),
            ("contact_phone", "VARCHAR(20)", "phone"),
            ("staff_name", "VARCHAR(50)", "display_name"),
            ("total_amount", "DECIMAL(10,2)", "monetary"),
            ("purpose", "TEXT", "sentence"),
            ("branch_code", "VARCHAR(10)", "code_token"),
            ("is_active", "CHAR(1)", "binary_flag"),
            ("quantity", "INT", "type_integer"),
            ("ratio", "FLOAT", "type_decimal"),
            ("verified", "BOOLEAN", "type_boolean"),
            ("notes", "VARCHAR(100)", "type_text"),
            ("misc", "BLOB", "default_word"),
        ];
        for (name, data_type, expected) in cases {
            let col = column(name, data_type);
            assert_eq!(heuristics.rule_name_for(&col), expected, "column {name}");
            // Dispatch does not depend on call count.
            assert_eq!(heuristics.rule_name_for(&col), expected);
        }
    }

    #[test]
    fn date_columns_stay_within_valid_days() {
        let heuristics = ValueHeuristics::default();
        let col = column("hire_date", "DATE");
        let mut rng = rng();
        for index in 1..=50 {
            let value = heuristics.value_for(&col, index, &mut rng);
            let text = value.as_str().expect("date text");
            let day: u32 = text[8..10].parse().expect("day digits");
            assert!((1..=28).contains(&day), "day out of range in {text}");
            assert_eq!(text.len(), 10, "date-only rendering expected, got {text}");
        }
    }

    #[test]
    fn time_columns_render_full_timestamps() {
        let heuristics = ValueHeuristics::default();
        let col = column("departure_time", "DATETIME");
        let value = heuristics.value_for(&col, 1, &mut rng());
        let text = value.as_str().expect("timestamp text");
        assert!(text.contains('T'), "expected timestamp, got {text}");
        assert_eq!(text.len(), 19);
    }

    #[test]
    fn monetary_values_fall_in_the_documented_range() {
        let heuristics = ValueHeuristics::default();
        let col = column("ticket_price", "DECIMAL(10,2)");
        let mut rng = rng();
        for index in 1..=50 {
            match heuristics.value_for(&col, index, &mut rng) {
                GeneratedValue::Float(value) => {
                    assert!((5000.0..=55000.0).contains(&value), "out of range: {value}");
                    let cents = value * 100.0;
                    assert!((cents - cents.round()).abs() < 1e-6, "more than 2dp: {value}");
                }
                other => panic!("expected float, got {other:?}"),
            }
        }
    }

    #[test]
    fn flags_render_as_y_or_n() {
        let heuristics = ValueHeuristics::default();
        let col = column("enabled_yn", "CHAR(1)");
        let mut rng = rng();
        for index in 1..=20 {
            let value = heuristics.value_for(&col, index, &mut rng);
            let text = value.as_str().expect("flag text");
            assert!(text == "Y" || text == "N");
        }
    }

    #[test]
    fn same_seed_yields_same_value() {
        let heuristics = ValueHeuristics::default();
        let col = column("user_email", "VARCHAR(50)");
        let a = heuristics.value_for(&col, 3, &mut ChaCha8Rng::seed_from_u64(42));
        let b = heuristics.value_for(&col, 3, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
