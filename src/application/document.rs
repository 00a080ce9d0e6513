//! Loading record files into forests and checking the round trip.

use std::path::Path;

use itertools::{EitherOrBoth, Itertools};
use tracing::{debug, instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    DomainResult, Forest, ForestBuilder, LineFormat, Record, RecordReader, RecordRelations,
    RelationTable,
};
use crate::infrastructure::{load_relations, read_text};

/// Relation table from an explicit path, falling back to the configured one.
pub fn resolve_relations(
    explicit: Option<&Path>,
    settings: &Settings,
) -> ApplicationResult<RelationTable> {
    let path = explicit
        .or(settings.relations.as_deref())
        .ok_or(ApplicationError::MissingRelations)?;
    Ok(load_relations(path)?)
}

/// Build a forest from already decoded text.
pub fn build_from_text<R>(text: &str, relations: &R, format: LineFormat) -> DomainResult<Forest>
where
    R: RecordRelations + ?Sized,
{
    let reader = RecordReader::new(text.lines(), format);
    ForestBuilder::new(relations).with_format(format).build(reader)
}

/// Read, decode and build the forest of a record file.
#[instrument(level = "debug", skip(relations, settings))]
pub fn load_forest(
    path: &Path,
    relations: &RelationTable,
    settings: &Settings,
) -> ApplicationResult<Forest> {
    let text = read_text(path, settings.encoding)?;
    let forest = build_from_text(&text, relations, settings.line_format())?;
    debug!(records = forest.size(), "loaded {}", path.display());
    Ok(forest)
}

/// First line where the rendered forest and the input disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based position among record lines
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Outcome of rendering a file's forest and comparing it with the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    /// Record lines read before ingestion stopped
    pub records: usize,
    /// Non-blank lines from the first non-record line on
    pub ignored_lines: usize,
    pub mismatch: Option<Mismatch>,
}

impl RoundTripReport {
    pub fn is_ok(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Build the forest of `text`, render it, and compare the result with the
/// record lines of `text` up to the first non-record line (a blank line
/// included). Expected lines are normalized through the record parser, so a
/// line written without outer delimiters compares equal to its rendering.
#[instrument(level = "debug", skip(text, relations))]
pub fn check_round_trip<R>(
    text: &str,
    relations: &R,
    format: LineFormat,
) -> DomainResult<RoundTripReport>
where
    R: RecordRelations + ?Sized,
{
    let mut expected = Vec::new();
    let mut ignored_lines = 0;
    let mut stopped = false;
    for line in text.lines() {
        if !stopped {
            match Record::parse(line, &format) {
                Ok(record) => {
                    expected.push(record.to_line(format.delimiter));
                    continue;
                }
                Err(_) => stopped = true,
            }
        }
        if !line.trim().is_empty() {
            ignored_lines += 1;
        }
    }
    if ignored_lines > 0 {
        warn!(ignored_lines, "lines after the last record are not part of the forest");
    }

    let rendered = build_from_text(text, relations, format)?.render();
    let mismatch = expected
        .iter()
        .zip_longest(rendered.lines())
        .enumerate()
        .find_map(|(idx, pair)| {
            let (expected, actual) = match pair {
                EitherOrBoth::Both(e, a) if e == a => return None,
                EitherOrBoth::Both(e, a) => (Some(e.clone()), Some(a.to_string())),
                EitherOrBoth::Left(e) => (Some(e.clone()), None),
                EitherOrBoth::Right(a) => (None, Some(a.to_string())),
            };
            Some(Mismatch {
                line: idx + 1,
                expected,
                actual,
            })
        });

    Ok(RoundTripReport {
        records: expected.len(),
        ignored_lines,
        mismatch,
    })
}
