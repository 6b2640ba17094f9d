//! Linear pipeline orchestration: cluster, then project.
//!
//! Control flow is strictly linear and single-pass. Every stage produces a
//! new immutable artifact; nothing is mutated in place and nothing survives
//! the run except what the caller does with the [`Analysis`].

use crate::cluster::{cluster_count, Partition};
use crate::error::Result;
use crate::ingest::Dataset;
use crate::project::{Dims, Project};

/// Immutable result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Derived cluster count, `min(8, n_samples)`.
    pub k: usize,
    /// One cluster label in `[0, k)` per record, in dataset order.
    pub labels: Vec<usize>,
    /// One display coordinate of arity `dims` per record, in dataset order.
    pub coords: Vec<Vec<f32>>,
}

/// Run clustering and projection over a validated dataset.
///
/// Derives `k` from the dataset size. A single-record dataset is assigned
/// label 0 directly; the iterative algorithm is never invoked for it.
pub fn run(
    data: &Dataset,
    dims: Dims,
    clusterer: &dyn Partition,
    projector: &dyn Project,
) -> Result<Analysis> {
    let k = cluster_count(data.len());

    let labels = if data.len() == 1 {
        vec![0]
    } else {
        clusterer.partition(data, k)?
    };

    let coords = projector.project(data, dims)?;

    Ok(Analysis { k, labels, coords })
}
