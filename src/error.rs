use thiserror::Error;

/// Errors produced by the pipeline.
///
/// The first four variants are the ingestion taxonomy: they are detected
/// before any clustering or projection work starts, and all of them abort
/// the run without writing an export file.
#[derive(Debug, Error)]
pub enum Error {
    /// No bytes received on the input stream.
    #[error("empty input: no bytes received on the input stream")]
    EmptyInput,

    /// Bytes received but not parseable as a JSON array of records.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Input parsed successfully but contains zero records.
    #[error("empty array: input contains no records")]
    EmptyArray,

    /// A record lacks `url` or `vector`, or vector lengths are inconsistent.
    #[error("invalid record {index}: {message}")]
    MissingField {
        /// 0-based index of the offending record in input order.
        index: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// I/O failure while reading input or writing the export file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
