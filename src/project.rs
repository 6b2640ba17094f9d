//! Projection: map each record's vector to 2 or 3 display coordinates.
//!
//! Three regimes, split on `n_features` vs the target arity `D`:
//!
//! - `n_features > D`: PCA. Mean-center the data and extract the top `D`
//!   principal components by power iteration with deflation. Components are
//!   ordered by descending explained variance.
//! - `n_features == D`: identity pass-through.
//! - `n_features < D`: pass-through, right-padded with zeros to width `D`.
//!
//! Output arity is always exactly `D`, whatever the input width.
//!
//! The projection is display-only: clustering always runs on the full
//! vectors, never on these coordinates.

use rand::prelude::*;

use crate::error::Result;
use crate::ingest::Dataset;

/// Legal display arities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dims {
    /// Two coordinates (flat scatter).
    Two,
    /// Three coordinates (spatial scatter).
    Three,
}

impl Dims {
    /// Parse a user-supplied arity; only 2 and 3 are legal.
    pub fn new(n: usize) -> Option<Self> {
        match n {
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// The arity as a count.
    pub fn len(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Capability interface for dimensionality reduction backends.
///
/// Exists so an alternative projection (t-SNE, UMAP via a plugin) can be
/// swapped in without touching the rest of the pipeline.
pub trait Project {
    /// Produce exactly `dims.len()` coordinates per record, in dataset order.
    ///
    /// Implementations must be deterministic for identical datasets.
    fn project(&self, data: &Dataset, dims: Dims) -> Result<Vec<Vec<f32>>>;
}

/// Principal component analysis via power iteration.
#[derive(Debug, Clone)]
pub struct Pca {
    seed: u64,
    iterations: usize,
}

impl Pca {
    /// Create a PCA projector with the pipeline defaults.
    ///
    /// Defaults: `seed = 42`, `iterations = 128` power steps per component.
    /// Both are fixed per call, keeping the projection deterministic.
    pub fn new() -> Self {
        Self {
            seed: 42,
            iterations: 128,
        }
    }

    /// Set the RNG seed for the power iteration start vectors.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Extract the top `target` principal components of the centered data.
    fn components(&self, data: &Dataset, mean: &[f32], target: usize) -> Vec<Vec<f32>> {
        let n = data.len();
        let d = data.n_features();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut components: Vec<Vec<f32>> = Vec::with_capacity(target);
        for _ in 0..target {
            // Seeded random start vector, orthogonalized against the
            // components found so far (deflation).
            let mut v: Vec<f32> = (0..d).map(|_| rng.random::<f32>() * 2.0 - 1.0).collect();
            orthogonalize(&mut v, &components);
            normalize_in_place(&mut v);

            for _ in 0..self.iterations {
                // w = C v, computed through the data so the d x d covariance
                // matrix is never materialized.
                let mut w = vec![0.0f32; d];
                for i in 0..n {
                    let s = centered_dot(data.vector(i), mean, &v);
                    for (wj, (&xj, &mj)) in w.iter_mut().zip(data.vector(i).iter().zip(mean)) {
                        *wj += s * (xj - mj);
                    }
                }

                orthogonalize(&mut w, &components);

                let norm = w.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm <= f32::EPSILON {
                    // Variance exhausted (e.g. a single sample, or fewer
                    // distinct directions than requested components). The
                    // start vector stays; projections onto it are ~0.
                    break;
                }
                for (vj, wj) in v.iter_mut().zip(&w) {
                    *vj = wj / norm;
                }
            }

            // Sign convention: largest-magnitude entry positive, so the
            // component (and the coordinates) are reproducible.
            fix_sign(&mut v);
            components.push(v);
        }

        components
    }
}

impl Default for Pca {
    fn default() -> Self {
        Self::new()
    }
}

impl Project for Pca {
    fn project(&self, data: &Dataset, dims: Dims) -> Result<Vec<Vec<f32>>> {
        let n = data.len();
        let d = data.n_features();
        let target = dims.len();

        if d <= target {
            // Identity pass-through, zero-padded when the data is narrower
            // than the display arity.
            let coords = (0..n)
                .map(|i| {
                    let mut c = data.vector(i).to_vec();
                    c.resize(target, 0.0);
                    c
                })
                .collect();
            return Ok(coords);
        }

        let mean = feature_mean(data);
        let components = self.components(data, &mean, target);

        let coords = (0..n)
            .map(|i| {
                components
                    .iter()
                    .map(|comp| centered_dot(data.vector(i), &mean, comp))
                    .collect()
            })
            .collect();
        Ok(coords)
    }
}

/// Per-feature mean over all records.
fn feature_mean(data: &Dataset) -> Vec<f32> {
    let n = data.len();
    let d = data.n_features();
    let mut mean = vec![0.0f32; d];
    for i in 0..n {
        for (m, x) in mean.iter_mut().zip(data.vector(i)) {
            *m += x;
        }
    }
    let inv = 1.0 / n as f32;
    for m in &mut mean {
        *m *= inv;
    }
    mean
}

/// Dot product of `(x - mean)` with `v`.
#[inline]
fn centered_dot(x: &[f32], mean: &[f32], v: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), v.len());
    x.iter()
        .zip(mean.iter())
        .zip(v.iter())
        .map(|((xj, mj), vj)| (xj - mj) * vj)
        .sum()
}

/// Remove the projections of `v` onto each of `basis` (assumed unit-norm).
fn orthogonalize(v: &mut [f32], basis: &[Vec<f32>]) {
    for b in basis {
        let s: f32 = v.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        for (vj, bj) in v.iter_mut().zip(b) {
            *vj -= s * bj;
        }
    }
}

fn normalize_in_place(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v {
            *x /= norm;
        }
    }
}

/// Flip `v` so its largest-magnitude entry is positive.
fn fix_sign(v: &mut [f32]) {
    let mut pivot = 0.0f32;
    for &x in v.iter() {
        if x.abs() > pivot.abs() {
            pivot = x;
        }
    }
    if pivot < 0.0 {
        for x in v {
            *x = -*x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Record;

    fn dataset(vectors: Vec<Vec<f32>>) -> Dataset {
        let records = vectors
            .into_iter()
            .enumerate()
            .map(|(i, vector)| Record {
                url: format!("https://example.com/{i}"),
                vector,
            })
            .collect();
        Dataset::from_records(records).unwrap()
    }

    #[test]
    fn test_identity_when_widths_match() {
        let data = dataset(vec![vec![1.0, 2.0], vec![-3.0, 4.5]]);
        let coords = Pca::new().project(&data, Dims::Two).unwrap();

        assert_eq!(coords, vec![vec![1.0, 2.0], vec![-3.0, 4.5]]);
    }

    #[test]
    fn test_identity_3d() {
        let data = dataset(vec![vec![1.0, 2.0, 3.0]]);
        let coords = Pca::new().project(&data, Dims::Three).unwrap();

        assert_eq!(coords, vec![vec![1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_zero_padding_narrow_input() {
        let data = dataset(vec![vec![5.0], vec![7.0]]);
        let coords = Pca::new().project(&data, Dims::Three).unwrap();

        assert_eq!(coords, vec![vec![5.0, 0.0, 0.0], vec![7.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_zero_padding_2d() {
        let data = dataset(vec![vec![5.0]]);
        let coords = Pca::new().project(&data, Dims::Two).unwrap();

        assert_eq!(coords, vec![vec![5.0, 0.0]]);
    }

    #[test]
    fn test_arity_is_always_target() {
        let data = dataset(vec![
            vec![1.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0],
        ]);

        for dims in [Dims::Two, Dims::Three] {
            let coords = Pca::new().project(&data, dims).unwrap();
            assert_eq!(coords.len(), 3);
            for c in &coords {
                assert_eq!(c.len(), dims.len());
            }
        }
    }

    #[test]
    fn test_first_component_captures_dominant_axis() {
        // Variance lives almost entirely along the first feature; the first
        // principal coordinate must separate the two ends of that axis far
        // more than the second does.
        let data = dataset(vec![
            vec![0.0, 0.01, 0.0],
            vec![10.0, -0.01, 0.02],
            vec![20.0, 0.02, -0.01],
            vec![30.0, 0.0, 0.01],
        ]);

        let coords = Pca::new().project(&data, Dims::Two).unwrap();
        let spread0 = (coords[3][0] - coords[0][0]).abs();
        let spread1 = (coords[3][1] - coords[0][1]).abs();
        assert!(spread0 > 20.0, "expected dominant axis spread, got {spread0}");
        assert!(spread0 > spread1 * 10.0);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let data = dataset(
            (0..12)
                .map(|i| (0..6).map(|j| ((i * 7 + j * 3) % 11) as f32).collect())
                .collect(),
        );

        let a = Pca::new().project(&data, Dims::Three).unwrap();
        let b = Pca::new().project(&data, Dims::Three).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_sample_wide_input() {
        // One sample has no variance; coordinates collapse to the origin but
        // the arity contract still holds.
        let data = dataset(vec![vec![3.0, 1.0, 4.0, 1.0, 5.0]]);
        let coords = Pca::new().project(&data, Dims::Two).unwrap();

        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].len(), 2);
        for &x in &coords[0] {
            assert!(x.abs() < 1e-5);
        }
    }

    #[test]
    fn test_dims_parsing() {
        assert_eq!(Dims::new(2), Some(Dims::Two));
        assert_eq!(Dims::new(3), Some(Dims::Three));
        assert_eq!(Dims::new(1), None);
        assert_eq!(Dims::new(4), None);
    }
}
