use crate::domain::command::CommandRecord;
use crate::error::{LifecycleError, Result};
use std::io::Read;

/// Reads replay commands from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and tolerating short rows, so
/// `sweep` can be written without trailing empty columns.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields `(line, command)` pairs, `line` being the 1-based
    /// position among data rows.
    pub fn commands(self) -> impl Iterator<Item = (usize, Result<CommandRecord>)> {
        self.reader
            .into_deserialize()
            .enumerate()
            .map(|(i, result)| (i + 1, result.map_err(LifecycleError::from)))
    }
}
