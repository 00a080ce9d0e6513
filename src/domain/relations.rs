//! Record relations: which record type is the parent of which.

use std::collections::HashMap;

use crate::domain::error::{DomainError, DomainResult};

/// Lookup of a record type's parent type.
///
/// `Ok(None)` marks a root type. A type the relations know nothing about is
/// an `UnknownRecordType` error.
pub trait RecordRelations {
    fn parent_type_of(&self, record_type: &str) -> DomainResult<Option<&str>>;
}

/// Children-to-parent mapping of record types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTable {
    parents: HashMap<String, Option<String>>,
}

impl RelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `record_type` with its parent type (`None` for a root type).
    pub fn insert(&mut self, record_type: impl Into<String>, parent: Option<impl Into<String>>) {
        self.parents
            .insert(record_type.into(), parent.map(Into::into));
    }

    pub fn contains(&self, record_type: &str) -> bool {
        self.parents.contains_key(record_type)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl RecordRelations for RelationTable {
    fn parent_type_of(&self, record_type: &str) -> DomainResult<Option<&str>> {
        self.parents.parent_type_of(record_type)
    }
}

impl RecordRelations for HashMap<String, Option<String>> {
    fn parent_type_of(&self, record_type: &str) -> DomainResult<Option<&str>> {
        self.get(record_type)
            .map(Option::as_deref)
            .ok_or_else(|| DomainError::UnknownRecordType(record_type.to_string()))
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for RelationTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let parents = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.map(Into::into)))
            .collect();
        Self { parents }
    }
}

impl From<HashMap<String, Option<String>>> for RelationTable {
    fn from(parents: HashMap<String, Option<String>>) -> Self {
        Self { parents }
    }
}
