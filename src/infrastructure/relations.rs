//! Loading record relation tables from JSON.
//!
//! Two layouts are accepted:
//! - the SPED layout specification list: `[{"name": "C100", "parent_record": "C010", ...}]`
//! - a plain object: `{"C100": "C010", "0000": null}`

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::RelationTable;
use crate::infrastructure::error::{InfraError, InfraResult, IoResultExt};

/// One record entry of a layout specification; other keys are ignored.
#[derive(Debug, Deserialize)]
struct RecordSpec {
    name: String,
    #[serde(default)]
    parent_record: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelationsFile {
    Specification(Vec<RecordSpec>),
    Mapping(HashMap<String, Option<String>>),
}

/// Parse a relation table from JSON text. `origin` is only used in errors.
pub fn parse_relations(json: &str, origin: &Path) -> InfraResult<RelationTable> {
    let file: RelationsFile = serde_json::from_str(json).map_err(|e| InfraError::Relations {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    let table: RelationTable = match file {
        RelationsFile::Specification(specs) => specs
            .into_iter()
            .map(|spec| (spec.name, spec.parent_record))
            .collect(),
        RelationsFile::Mapping(map) => RelationTable::from(map),
    };
    Ok(table)
}

#[instrument(level = "debug")]
pub fn load_relations(path: &Path) -> InfraResult<RelationTable> {
    let json = fs::read_to_string(path).with_path_context("read relation table", path)?;
    let table = parse_relations(&json, path)?;
    debug!(record_types = table.len(), "relation table loaded");
    Ok(table)
}
