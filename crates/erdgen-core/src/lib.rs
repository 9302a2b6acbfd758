//! Core contracts for erdgen.
//!
//! This crate defines the schema types delivered by the diagram-parsing
//! collaborator, structural validation, the foreign-key dependency resolver,
//! and the processed-schema artifact consumed by the synthesis engine and
//! downstream emitters.

pub mod classify;
pub mod error;
pub mod graph;
pub mod process;
pub mod schema;
pub mod validation;

pub use classify::{classify_schema, ComplexityThresholds, ComplexityTier, SchemaMetadata};
pub use error::{Error, Result};
pub use graph::{resolve_order, CyclePolicy, DependencyReport};
pub use process::{process_schema, process_schema_with, ProcessedSchema};
pub use schema::{Column, ForeignRef, Schema, Table};
pub use validation::validate_schema;

/// Current contract version for `processed_schema.json` artifacts.
pub const SCHEMA_VERSION: &str = "0.1";
