//! Clustering: assign each record to one of `k` unsupervised groups.
//!
//! The pipeline uses hard clustering (exactly one label per record) behind
//! the [`Partition`] trait, with seeded k-means as the shipped algorithm.
//!
//! The cluster count is never supplied by the user; it is derived from the
//! dataset size by [`cluster_count`], capped at 8 so the display palette and
//! legend stay readable.

mod kmeans;
mod traits;

pub use kmeans::Kmeans;
pub use traits::Partition;

/// Cluster count cap. Matches the categorical display palette size.
pub const MAX_CLUSTERS: usize = 8;

/// Derive the cluster count for a dataset: `min(8, n_samples)`.
pub fn cluster_count(n_samples: usize) -> usize {
    n_samples.min(MAX_CLUSTERS)
}
