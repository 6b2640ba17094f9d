//! `corral` clusters URL embedding vectors and projects them for display.
//!
//! The pipeline is strictly linear:
//!
//! 1. [`ingest`] — parse and validate `{url, vector}` records from JSON.
//! 2. [`cluster`] — partition records into `k = min(8, n)` groups with
//!    seeded k-means.
//! 3. [`project`] — map vectors to 2 or 3 display coordinates with PCA
//!    (identity / zero-padding when the data is already narrow).
//! 4. [`export`] — write a deterministic cluster → URL grouping to disk.
//! 5. [`present`] — hand a legend-ordered row table to a rendering
//!    collaborator.
//!
//! Clustering and projection sit behind the [`Partition`] and [`Project`]
//! traits so alternative algorithms can be substituted without touching the
//! rest of the pipeline. Everything is deterministic: identical input yields
//! identical labels, coordinates, and export content.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod present;
pub mod project;

pub use cluster::{cluster_count, Kmeans, Partition, MAX_CLUSTERS};
pub use error::{Error, Result};
pub use ingest::{Dataset, Record};
pub use pipeline::{run, Analysis};
pub use present::{plot_table, DisplayConfig, JsonRender, PlotRow, Render};
pub use project::{Dims, Pca, Project};
