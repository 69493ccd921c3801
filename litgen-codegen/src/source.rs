//! Record sources.
//!
//! A [`RecordSource`] turns some input into the ordered list of flat records
//! the pipeline consumes. Closures returning records are sources too, so
//! callers can plug in any parser.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use litgen_core::Provenance;
use serde_json::Value;

use crate::{Error, Result, record::ParsedRecord};

/// Produces the ordered records of one input.
pub trait RecordSource: Send + Sync {
    /// Read every record, in input order.
    fn parse(&self) -> Result<Vec<ParsedRecord>>;

    /// Where the records come from, if the source knows.
    fn provenance(&self) -> Option<Provenance> {
        None
    }
}

impl<F> RecordSource for F
where
    F: Fn() -> Result<Vec<ParsedRecord>> + Send + Sync,
{
    fn parse(&self) -> Result<Vec<ParsedRecord>> {
        self()
    }
}

/// Records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<ParsedRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<ParsedRecord>) -> Self {
        Self { records }
    }
}

impl From<Vec<ParsedRecord>> for StaticSource {
    fn from(records: Vec<ParsedRecord>) -> Self {
        Self::new(records)
    }
}

impl RecordSource for StaticSource {
    fn parse(&self) -> Result<Vec<ParsedRecord>> {
        Ok(self.records.clone())
    }
}

#[derive(Debug, Clone)]
enum Input {
    Path(PathBuf),
    Text(String),
}

impl Input {
    fn origin(&self) -> String {
        match self {
            Input::Path(path) => path.display().to_string(),
            Input::Text(_) => "inline text".to_string(),
        }
    }

    fn provenance(&self) -> Option<Provenance> {
        match self {
            Input::Path(path) => Some(Provenance::Path(path.clone())),
            Input::Text(_) => None,
        }
    }
}

/// Delimited text with a header row; every row becomes one record.
#[derive(Debug, Clone)]
pub struct CsvSource {
    input: Input,
    delimiter: u8,
}

impl CsvSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            input: Input::Path(path.as_ref().to_path_buf()),
            delimiter: b',',
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: Input::Text(text.into()),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn read<R: io::Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<ParsedRecord>> {
        let headers = reader.headers().map_err(|e| self.error(e))?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| self.error(e))?;
            records.push(headers.iter().zip(row.iter()).collect());
        }
        Ok(records)
    }

    fn error(&self, err: impl ToString) -> Error {
        Error::Source {
            origin: self.input.origin(),
            reason: err.to_string(),
        }
    }
}

impl RecordSource for CsvSource {
    fn parse(&self) -> Result<Vec<ParsedRecord>> {
        let mut builder = csv::ReaderBuilder::new();
        builder.has_headers(true).delimiter(self.delimiter);

        match &self.input {
            Input::Path(path) => {
                let reader = builder.from_path(path).map_err(|e| self.error(e))?;
                self.read(reader)
            }
            Input::Text(text) => self.read(builder.from_reader(text.as_bytes())),
        }
    }

    fn provenance(&self) -> Option<Provenance> {
        self.input.provenance()
    }
}

/// A JSON array of flat objects; every object becomes one record.
///
/// Scalars are stringified (`null` becomes an empty string). Nested arrays
/// or objects are rejected.
#[derive(Debug, Clone)]
pub struct JsonSource {
    input: Input,
}

impl JsonSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            input: Input::Path(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: Input::Text(text.into()),
        }
    }

    fn error(&self, reason: impl ToString) -> Error {
        Error::Source {
            origin: self.input.origin(),
            reason: reason.to_string(),
        }
    }

    fn record(&self, index: usize, value: Value) -> Result<ParsedRecord> {
        let Value::Object(object) = value else {
            return Err(self.error(format!("element {index} is not an object")));
        };

        let mut fields = Vec::with_capacity(object.len());
        for (key, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(self.error(format!(
                        "element {index} has a nested value under '{key}'"
                    )));
                }
            };
            fields.push((key, value));
        }
        Ok(fields.into_iter().collect())
    }
}

impl RecordSource for JsonSource {
    fn parse(&self) -> Result<Vec<ParsedRecord>> {
        let text = match &self.input {
            Input::Path(path) => fs::read_to_string(path).map_err(|e| self.error(e))?,
            Input::Text(text) => text.clone(),
        };

        let value: Value = serde_json::from_str(&text).map_err(|e| self.error(e))?;
        let Value::Array(items) = value else {
            return Err(self.error("expected a top-level array of objects"));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.record(index, item))
            .collect()
    }

    fn provenance(&self) -> Option<Provenance> {
        self.input.provenance()
    }
}
