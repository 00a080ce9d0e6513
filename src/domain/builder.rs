//! Forest builder: rebuilds the record hierarchy of a flat file.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::domain::arena::{Forest, NodeId};
use crate::domain::error::DomainResult;
use crate::domain::record::{LineFormat, Record};
use crate::domain::relations::RecordRelations;

/// Constructs a [`Forest`] from records in file order.
///
/// A record becomes the last child of the most recently built record of its
/// parent type. Records whose parent type is a root type, or has not been seen
/// yet, become roots.
pub struct ForestBuilder<'r, R: ?Sized> {
    relations: &'r R,
    format: LineFormat,
}

impl<'r, R> ForestBuilder<'r, R>
where
    R: RecordRelations + ?Sized,
{
    pub fn new(relations: &'r R) -> Self {
        Self {
            relations,
            format: LineFormat::default(),
        }
    }

    /// Delimiter and tag width the resulting forest renders with.
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the forest in one pass. An unknown record type aborts the build.
    #[instrument(level = "debug", skip(self, records))]
    pub fn build<I>(&self, records: I) -> DomainResult<Forest>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut forest = Forest::with_format(self.format);
        let mut tracker: HashMap<String, NodeId> = HashMap::new();

        for record in records {
            let parent_type = self.relations.parent_type_of(record.type_tag())?;
            let parent = parent_type.and_then(|t| tracker.get(t).copied());
            let type_tag = record.type_tag().to_string();

            let id = match parent {
                Some(parent) => forest.append_child(parent, record)?,
                None => {
                    trace!(%type_tag, "new root");
                    forest.push_root(record)
                }
            };
            tracker.insert(type_tag, id);
        }

        debug!(
            roots = forest.roots().len(),
            nodes = forest.len(),
            "forest built"
        );
        Ok(forest)
    }
}

/// Build a forest with the default line format.
pub fn build_forest<I, R>(records: I, relations: &R) -> DomainResult<Forest>
where
    I: IntoIterator<Item = Record>,
    R: RecordRelations + ?Sized,
{
    ForestBuilder::new(relations).build(records)
}
