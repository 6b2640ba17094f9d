//! Input parsing and validation.
//!
//! The pipeline accepts a UTF-8 JSON array of `{"url": ..., "vector": [...]}`
//! objects on a single blocking input stream. Everything dynamic about that
//! shape is checked here, at the boundary, so the numeric stages downstream
//! can assume a rectangular dataset and never fail on structure.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One input item: a URL and its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// The item's URL (opaque to the pipeline, used as the display key).
    pub url: String,
    /// Dense embedding vector. Same length for every record in a [`Dataset`].
    pub vector: Vec<f32>,
}

/// Deserialization target with optional fields.
///
/// Missing keys are detected per record index after parsing, so the caller
/// gets `invalid record 3: missing field `vector`` instead of an opaque
/// serde error pointing at a byte offset.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

/// A validated, ordered, immutable record sequence.
///
/// Invariants (enforced at construction):
/// - at least one record
/// - every vector has the same length, and that length is at least 1
///
/// Record order is input arrival order and is semantically meaningful: it is
/// the tie-break order everywhere downstream (export groups, plot rows).
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    n_features: usize,
}

impl Dataset {
    /// Read, parse, and validate a dataset from a blocking reader.
    ///
    /// One full read, one parse, full validation; on any violation the
    /// matching ingestion error is returned and nothing is produced.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;

        if buf.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let raw: Vec<RawRecord> =
            serde_json::from_str(&buf).map_err(|e| Error::MalformedInput(e.to_string()))?;

        let mut records = Vec::with_capacity(raw.len());
        for (index, r) in raw.into_iter().enumerate() {
            let url = r.url.ok_or_else(|| Error::MissingField {
                index,
                message: "missing field `url`".to_string(),
            })?;
            let vector = r.vector.ok_or_else(|| Error::MissingField {
                index,
                message: "missing field `vector`".to_string(),
            })?;
            records.push(Record { url, vector });
        }

        Self::from_records(records)
    }

    /// Build a dataset from in-memory records, applying the same validation
    /// as [`Dataset::from_reader`].
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyArray);
        }

        let n_features = records[0].vector.len();
        if n_features == 0 {
            return Err(Error::MissingField {
                index: 0,
                message: "vector is empty".to_string(),
            });
        }

        for (index, r) in records.iter().enumerate().skip(1) {
            if r.vector.len() != n_features {
                return Err(Error::MissingField {
                    index,
                    message: format!(
                        "vector length {} does not match dataset width {}",
                        r.vector.len(),
                        n_features
                    ),
                });
            }
        }

        Ok(Self {
            records,
            n_features,
        })
    }

    /// Number of records (`n_samples`). Always at least 1.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`: a dataset cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Vector length shared by all records (`n_features`). Always at least 1.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// All records in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The `i`-th record's vector.
    pub fn vector(&self, i: usize) -> &[f32] {
        &self.records[i].vector
    }

    /// URLs in input order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.url.as_str())
    }
}
