//! Rule-based synthetic data generation for erdgen.
//!
//! This crate consumes a processed schema and produces a referentially
//! consistent dataset: tables are filled in dependency order and every
//! foreign-key value is copied from a row already materialized for the
//! parent table.

pub mod engine;
pub mod errors;
pub mod heuristics;
pub mod model;
pub mod output;

pub use engine::{GeneratedDataset, GeneratedRow, SynthesisResult, Synthesizer};
pub use errors::SynthesisError;
pub use heuristics::{GeneratedValue, ValueHeuristics};
pub use model::{SynthesisOptions, SynthesisReport, TableReport};
