use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use thiserror::Error;

/// Seed for centroid initialization. Identical input always yields the same partition.
pub const DEFAULT_SEED: u64 = 42;
/// Independent initializations per fit; the lowest-inertia run wins
pub const DEFAULT_N_INIT: usize = 10;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
/// Total squared centroid movement below which a run is considered converged
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusteringError {
    #[error("Number of clusters must be at least 1")]
    ZeroClusters,

    #[error("Need at least {clusters} points to form {clusters} clusters, got {points}")]
    TooFewPoints { points: usize, clusters: usize },

    #[error("Feature vector {index} contains a non-finite value")]
    NonFinite { index: usize },
}

/// Outcome of a k-means fit
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterFit<const D: usize> {
    /// Cluster label per input point, in input order
    pub labels: Vec<usize>,
    pub centroids: Vec<[f64; D]>,
    /// Sum of squared distances from each point to its centroid
    pub inertia: f64,
    pub iterations: usize,
}

/// Seeded k-means (Lloyd's algorithm with k-means++ initialization)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    pub n_clusters: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            seed: DEFAULT_SEED,
            n_init: DEFAULT_N_INIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Partition `points` into `n_clusters` groups
    ///
    /// All `n_init` runs draw from one RNG stream seeded with `seed` and work
    /// on the points in lexicographic order, so the partition depends only on
    /// the multiset of points and the configuration, never on input order.
    pub fn fit<const D: usize>(&self, points: &[[f64; D]]) -> Result<ClusterFit<D>, ClusteringError> {
        if self.n_clusters == 0 {
            return Err(ClusteringError::ZeroClusters);
        }
        if points.len() < self.n_clusters {
            return Err(ClusteringError::TooFewPoints {
                points: points.len(),
                clusters: self.n_clusters,
            });
        }
        if let Some(index) = points.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
            return Err(ClusteringError::NonFinite { index });
        }

        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| compare_points(&points[a], &points[b]));
        let canonical: Vec<[f64; D]> = order.iter().map(|&index| points[index]).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut best: Option<ClusterFit<D>> = None;

        for _ in 0..self.n_init.max(1) {
            let centroids = self.init_centroids(&canonical, &mut rng);
            let fit = self.lloyd(&canonical, centroids);

            // Strict comparison keeps the earliest run on ties
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        let mut fit = best.ok_or(ClusteringError::ZeroClusters)?;

        // Back to the caller's order
        let mut labels = vec![0; points.len()];
        for (&index, &label) in order.iter().zip(&fit.labels) {
            labels[index] = label;
        }
        fit.labels = labels;

        Ok(fit)
    }

    /// k-means++ seeding: each new centroid is drawn with probability
    /// proportional to its squared distance from the nearest chosen one.
    fn init_centroids<const D: usize>(&self, points: &[[f64; D]], rng: &mut ChaCha8Rng) -> Vec<[f64; D]> {
        let mut centroids = Vec::with_capacity(self.n_clusters);
        centroids.push(points[rng.gen_range(0..points.len())]);

        let mut nearest: Vec<f64> = points
            .iter()
            .map(|p| squared_distance(p, &centroids[0]))
            .collect();

        while centroids.len() < self.n_clusters {
            // All weights are zero when every point sits on a centroid
            let index = match WeightedIndex::new(&nearest) {
                Ok(weights) => weights.sample(rng),
                Err(_) => rng.gen_range(0..points.len()),
            };
            let chosen = points[index];

            for (distance, point) in nearest.iter_mut().zip(points) {
                *distance = distance.min(squared_distance(point, &chosen));
            }
            centroids.push(chosen);
        }

        centroids
    }

    fn lloyd<const D: usize>(&self, points: &[[f64; D]], mut centroids: Vec<[f64; D]>) -> ClusterFit<D> {
        let mut labels = vec![0; points.len()];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            assign(points, &centroids, &mut labels);

            let updated = recompute_centroids(points, &labels, &centroids);
            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| squared_distance(old, new))
                .sum();
            centroids = updated;

            if shift <= self.tolerance {
                break;
            }
        }

        // Labels must agree with the final centroids
        assign(points, &centroids, &mut labels);

        let inertia = points
            .iter()
            .zip(&labels)
            .map(|(point, &label)| squared_distance(point, &centroids[label]))
            .sum();

        ClusterFit {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// Assign each point to its nearest centroid; ties go to the lowest index
fn assign<const D: usize>(points: &[[f64; D]], centroids: &[[f64; D]], labels: &mut [usize]) {
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, centroid) in centroids.iter().enumerate() {
            let distance = squared_distance(point, centroid);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        *label = best;
    }
}

/// Mean of each cluster's members; an empty cluster keeps its previous centroid
fn recompute_centroids<const D: usize>(
    points: &[[f64; D]],
    labels: &[usize],
    previous: &[[f64; D]],
) -> Vec<[f64; D]> {
    let mut sums = vec![[0.0; D]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (sum, value) in sums[label].iter_mut().zip(point) {
            *sum += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((mut sum, count), old)| {
            if count == 0 {
                return *old;
            }
            for value in sum.iter_mut() {
                *value /= count as f64;
            }
            sum
        })
        .collect()
}

/// Lexicographic order over coordinates; inputs are already known to be finite
fn compare_points<const D: usize>(a: &[f64; D], b: &[f64; D]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[inline]
fn squared_distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
