//! Application layer: use cases on record files
//!
//! This layer wires file access and configuration to the domain forest.

pub mod document;
pub mod error;

pub use document::{
    build_from_text, check_round_trip, load_forest, resolve_relations, Mismatch, RoundTripReport,
};
pub use error::{ApplicationError, ApplicationResult};
