//! Record iteration over decoded text lines.

use tracing::debug;

use crate::domain::record::{LineFormat, Record};

/// Lazily turns text lines into records.
///
/// The first line that is not a record (a blank line, a digital signature
/// block, trailing garbage) ends the stream; nothing after it is read.
pub struct RecordReader<I> {
    lines: I,
    format: LineFormat,
    line_no: usize,
    done: bool,
}

impl<I> RecordReader<I> {
    pub fn new(lines: I, format: LineFormat) -> Self {
        Self {
            lines,
            format,
            line_no: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<I, S> Iterator for RecordReader<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.done {
            return None;
        }
        for line in self.lines.by_ref() {
            self.line_no += 1;
            match Record::parse(line.as_ref(), &self.format) {
                Ok(record) => return Some(record),
                Err(e) => {
                    debug!(line_no = self.line_no, "ingestion stopped: {}", e);
                    break;
                }
            }
        }
        self.done = true;
        None
    }
}

/// Records of `lines` using the default SPED line format.
pub fn records<I, S>(lines: I) -> RecordReader<I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RecordReader::new(lines.into_iter(), LineFormat::default())
}
