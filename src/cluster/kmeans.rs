//! K-means clustering (k-means++ seeding, Lloyd iterations).
//!
//! # The Algorithm
//!
//! 1. **Seeding (k-means++)**: pick the first centroid uniformly at random,
//!    then pick each subsequent centroid with probability proportional to
//!    the squared distance to the nearest centroid chosen so far
//!    (Arthur & Vassilvitskii, 2007).
//!
//! 2. **Lloyd iterations**: assign every point to its nearest centroid, then
//!    move each centroid to the mean of its points. Repeat until the total
//!    squared centroid movement drops below the tolerance or the iteration
//!    cap is reached.
//!
//! **Objective**: minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! # Determinism
//!
//! Every stochastic choice (seeding, restarts, empty-cluster repair) draws
//! from one `StdRng` seeded with a fixed value, and the restart and iteration
//! counts are fixed configuration, never sampled. Repeated runs on identical
//! input therefore produce identical labels.
//!
//! # Degenerate input
//!
//! When points are duplicated (or all identical) the seeding may place
//! coincident centroids and some labels go unused. That is an accepted
//! outcome, not an error: callers see fewer distinct labels than `k`.
//!
//! # References
//!
//! Arthur, D., Vassilvitskii, S. (2007). "k-means++: The Advantages of
//! Careful Seeding." SODA 2007.

use rand::prelude::*;

use super::traits::Partition;
use crate::error::{Error, Result};
use crate::ingest::Dataset;

/// K-means clusterer with k-means++ seeding.
#[derive(Debug, Clone)]
pub struct Kmeans {
    seed: u64,
    n_init: usize,
    max_iter: usize,
    tol: f32,
}

impl Kmeans {
    /// Create a k-means clusterer with the pipeline defaults.
    ///
    /// Defaults: `seed = 42`, `n_init = 10`, `max_iter = 300`, `tol = 1e-4`.
    pub fn new() -> Self {
        Self {
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
        }
    }

    /// Set the RNG seed used for seeding and restarts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of independent restarts (best inertia wins).
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the Lloyd iteration cap per restart.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// k-means++ seeding: returns `k` centroids drawn from the data.
    fn seed_centroids(
        &self,
        data: &Dataset,
        k: usize,
        rng: &mut StdRng,
    ) -> Vec<Vec<f32>> {
        let n = data.len();

        let first = rng.random_range(0..n);
        let mut centroids: Vec<Vec<f32>> = vec![data.vector(first).to_vec()];

        // Squared distance from each point to its nearest chosen centroid.
        let mut d2: Vec<f32> = (0..n)
            .map(|i| squared_euclidean(data.vector(i), &centroids[0]))
            .collect();

        while centroids.len() < k {
            let total: f32 = d2.iter().sum();
            let next = if total > 0.0 {
                // Sample proportional to d2 by walking the cumulative sum.
                let target = rng.random::<f32>() * total;
                let mut acc = 0.0;
                let mut chosen = n - 1;
                for (i, &w) in d2.iter().enumerate() {
                    acc += w;
                    if acc >= target {
                        chosen = i;
                        break;
                    }
                }
                chosen
            } else {
                // All remaining distances are zero (duplicate points);
                // fall back to a uniform draw.
                rng.random_range(0..n)
            };

            let c = data.vector(next).to_vec();
            for (i, d) in d2.iter_mut().enumerate() {
                let dist = squared_euclidean(data.vector(i), &c);
                if dist < *d {
                    *d = dist;
                }
            }
            centroids.push(c);
        }

        centroids
    }

    /// One full k-means run; returns `(labels, inertia)`.
    fn lloyd(
        &self,
        data: &Dataset,
        k: usize,
        rng: &mut StdRng,
    ) -> (Vec<usize>, f32) {
        let n = data.len();
        let d = data.n_features();

        let mut centroids = self.seed_centroids(data, k, rng);
        let mut labels = vec![0usize; n];

        for _ in 0..self.max_iter {
            // Assignment step.
            for (i, label) in labels.iter_mut().enumerate() {
                *label = nearest_centroid(data.vector(i), &centroids);
            }

            // Update step.
            let mut sums = vec![vec![0.0f32; d]; k];
            let mut counts = vec![0usize; k];
            for (i, &label) in labels.iter().enumerate() {
                counts[label] += 1;
                for (s, x) in sums[label].iter_mut().zip(data.vector(i)) {
                    *s += x;
                }
            }

            let mut movement = 0.0f32;
            for c in 0..k {
                if counts[c] == 0 {
                    // Empty cluster: reseed on the point farthest from its
                    // current centroid so the partition stays k-way.
                    let far = farthest_point(data, &labels, &centroids);
                    centroids[c] = data.vector(far).to_vec();
                    labels[far] = c;
                    movement = f32::INFINITY;
                    continue;
                }

                let inv = 1.0 / counts[c] as f32;
                let mut new_c = sums[c].clone();
                for x in &mut new_c {
                    *x *= inv;
                }
                movement += squared_euclidean(&new_c, &centroids[c]);
                centroids[c] = new_c;
            }

            if movement <= self.tol {
                break;
            }
        }

        // Final assignment against the converged centroids.
        let mut inertia = 0.0f32;
        for (i, label) in labels.iter_mut().enumerate() {
            *label = nearest_centroid(data.vector(i), &centroids);
            inertia += squared_euclidean(data.vector(i), &centroids[*label]);
        }

        (labels, inertia)
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new()
    }
}

impl Partition for Kmeans {
    fn partition(&self, data: &Dataset, k: usize) -> Result<Vec<usize>> {
        let n = data.len();

        if k == 0 || k > n {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: n,
            });
        }
        if self.n_init == 0 {
            return Err(Error::InvalidParameter {
                name: "n_init",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        // One RNG drives all restarts so the whole run is a pure function
        // of (data, k, seed).
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut best: Option<(Vec<usize>, f32)> = None;
        for _ in 0..self.n_init {
            let (labels, inertia) = self.lloyd(data, k, &mut rng);
            let better = match &best {
                Some((_, best_inertia)) => inertia < *best_inertia,
                None => true,
            };
            if better {
                best = Some((labels, inertia));
            }
        }

        // n_init >= 1 was validated above, so a run always happened.
        let (labels, _) = best.unwrap_or((vec![0; n], 0.0));
        Ok(labels)
    }
}

#[inline]
fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Index of the nearest centroid. Ties break toward the lower index.
#[inline]
fn nearest_centroid(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_d2 = f32::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d2 = squared_euclidean(point, centroid);
        if d2 < best_d2 {
            best_d2 = d2;
            best = c;
        }
    }
    best
}

/// Index of the point farthest from its assigned centroid.
fn farthest_point(data: &Dataset, labels: &[usize], centroids: &[Vec<f32>]) -> usize {
    let mut far = 0;
    let mut far_d2 = -1.0f32;
    for (i, &label) in labels.iter().enumerate() {
        let d2 = squared_euclidean(data.vector(i), &centroids[label]);
        if d2 > far_d2 {
            far_d2 = d2;
            far = i;
        }
    }
    far
}
