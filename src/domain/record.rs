//! Flat records: one delimited line as an ordered list of fields.

use std::fmt;
use std::ops::{Index, Range};

use itertools::Itertools;

use crate::domain::error::{DomainError, DomainResult};

/// Field delimiter of SPED files.
pub const DELIMITER: char = '|';

/// Width of the type tag that opens every record line.
pub const TYPE_TAG_WIDTH: usize = 4;

/// Shape of a record line: which character separates fields and where the
/// first separator must sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    pub delimiter: char,
    pub type_tag_width: usize,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            delimiter: DELIMITER,
            type_tag_width: TYPE_TAG_WIDTH,
        }
    }
}

/// Ordered list of string fields. Field 0 is the type tag.
///
/// The empty record is the sentinel carried by synthetic placeholder nodes:
/// its type tag is `""` and it renders as nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// Build a record from its fields. At least one field is required.
    pub fn new<I, S>(fields: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(DomainError::EmptyRecord);
        }
        Ok(Self { fields })
    }

    pub fn sentinel() -> Self {
        Self::default()
    }

    /// Parse one raw line: surrounding whitespace and the outer delimiters are
    /// stripped, then the delimiter must appear right after the type tag.
    pub fn parse(line: &str, format: &LineFormat) -> DomainResult<Self> {
        let trimmed = line.trim();
        let inner = trimmed.strip_prefix(format.delimiter).unwrap_or(trimmed);
        let inner = inner.strip_suffix(format.delimiter).unwrap_or(inner);

        let malformed = |reason: &str| DomainError::MalformedRecord {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        match inner.char_indices().nth(format.type_tag_width) {
            Some((pos, ch)) if ch == format.delimiter => {
                let mut fields = vec![inner[..pos].to_string()];
                fields.extend(
                    inner[pos + ch.len_utf8()..]
                        .split(format.delimiter)
                        .map(str::to_string),
                );
                Ok(Self { fields })
            }
            Some(_) => Err(malformed("delimiter missing after type tag")),
            None => Err(malformed("line shorter than type tag")),
        }
    }

    pub fn type_tag(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Replace the field at `index`.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> DomainResult<()> {
        let len = self.fields.len();
        let slot = self
            .fields
            .get_mut(index)
            .ok_or(DomainError::FieldOutOfBounds { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Replace the half-open range `range` with `values`. The number of
    /// values may differ from the range length, but the record keeps at
    /// least one field.
    pub fn splice<I, S>(&mut self, range: Range<usize>, values: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let len = self.fields.len();
        if range.start > range.end || range.end > len {
            return Err(DomainError::InvalidFieldRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if len - range.len() + values.len() == 0 {
            return Err(DomainError::EmptyRecord);
        }
        self.fields.splice(range, values);
        Ok(())
    }

    /// The record as `|f1|f2|...|fn|` with `delimiter`, without a newline.
    /// Empty for the sentinel record.
    pub fn to_line(&self, delimiter: char) -> String {
        if self.fields.is_empty() {
            return String::new();
        }
        let sep = delimiter.to_string();
        format!("{delimiter}{}{delimiter}", self.fields.iter().join(&sep))
    }

    /// Writes the record as `|f1|f2|...|fn|` followed by a newline.
    /// The sentinel record writes nothing.
    pub fn write_line<W: fmt::Write>(&self, out: &mut W, delimiter: char) -> fmt::Result {
        if self.fields.is_empty() {
            return Ok(());
        }
        let sep = delimiter.to_string();
        writeln!(
            out,
            "{delimiter}{}{delimiter}",
            self.fields.iter().join(&sep)
        )
    }
}

impl Index<usize> for Record {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.fields[index]
    }
}

/// Default SPED shape; use [`Record::to_line`] for other delimiters.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(DELIMITER))
    }
}
