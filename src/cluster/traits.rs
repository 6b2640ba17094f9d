use crate::error::Result;
use crate::ingest::Dataset;

/// Capability interface for hard partition clustering (one label per record).
///
/// The pipeline only depends on this trait, so an alternative algorithm
/// (hierarchical clustering, for instance) can replace k-means without
/// touching ingestion, export, or presentation.
pub trait Partition {
    /// Assign each record one cluster label in `[0, k)`, in dataset order.
    ///
    /// Implementations must be deterministic: identical datasets (same order,
    /// same vectors) yield identical labels on every call.
    fn partition(&self, data: &Dataset, k: usize) -> Result<Vec<usize>>;
}
