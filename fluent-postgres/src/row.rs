use crate::{PostgresData, PostgresDataDecoder, WireConvertible};
use fluent_core::{DatabaseOutput, Error, Result, Value};
use std::sync::Arc;

/// Row as received from the server, still in wire format.
#[derive(Debug, Clone, PartialEq)]
pub struct PostgresRow {
    pub labels: Arc<[String]>,
    pub values: Vec<PostgresData>,
}

impl PostgresRow {
    pub fn new(labels: Arc<[String]>, values: Vec<PostgresData>) -> Self {
        Self { labels, values }
    }

    pub fn get(&self, label: &str) -> Option<&PostgresData> {
        self.labels
            .iter()
            .position(|v| v == label)
            .and_then(|i| self.values.get(i))
    }
}

/// Row handed to the caller, values are decoded on access.
#[derive(Debug, Clone)]
pub struct PostgresOutput {
    row: Arc<PostgresRow>,
    decoder: PostgresDataDecoder,
    prefix: Option<String>,
}

impl PostgresOutput {
    pub fn new(row: PostgresRow, decoder: PostgresDataDecoder) -> Self {
        Self {
            row: Arc::new(row),
            decoder,
            prefix: None,
        }
    }

    pub fn row(&self) -> &PostgresRow {
        &self.row
    }

    fn column(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn data(&self, key: &str) -> Result<&PostgresData> {
        let column = self.column(key);
        self.row.get(&column).ok_or_else(|| {
            Error::Conversion(format!(
                "Column `{}` is not in the row (columns: {})",
                column,
                self.row.labels.join(", ")
            ))
        })
    }

    /// Decodes the column directly into `T`.
    pub fn decode_as<T: WireConvertible>(&self, key: &str) -> Result<T> {
        T::decode(self.data(key)?, &self.decoder)
    }
}

impl DatabaseOutput for PostgresOutput {
    fn schema(&self, schema: &str) -> Self {
        Self {
            row: self.row.clone(),
            decoder: self.decoder.clone(),
            prefix: Some(schema.to_string()),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.row.get(&self.column(key)).is_some()
    }

    fn decode_value(&self, key: &str) -> Result<Value> {
        self.decoder.decode_value(self.data(key)?)
    }
}
