//! Greedy agglomerative clustering with centroid merges.
//!
//! Bottom-up: every input row starts as its own cluster, and each round
//! merges the closest pair of active clusters into a new node whose vector is
//! the elementwise mean of the two. After `n - 1` rounds a single root is left.
//!
//! # Merge Rule
//!
//! ```text
//! (i*, j*) = argmin_{i < j} d(vᵢ, vⱼ)      over active positions
//! v_new    = (v_i* + v_j*) / 2
//! ```
//!
//! The mean is of the two node vectors only, not of all rows below them, so a
//! singleton merging with a large cluster pulls the centroid halfway.
//!
//! # Cost
//!
//! A round scans all `O(m²)` active pairs. Distances are cached by id pair:
//! nodes never change after creation, so only pairs involving the node created
//! in the previous round are new. Over a run the number of distance
//! evaluations is exactly `C(n, 2) + C(n - 1, 2)`: the initial pairs plus
//! `m - 1` pairs for each merged node that lives to see another round.
//!
//! # Ties
//!
//! Pairs are scanned by active position (outer ascending, inner ascending)
//! and the first pair strictly below the running minimum wins. Positions shift
//! as nodes are removed and the merged node is appended, so equal distances
//! resolve by that order rather than by id.

use super::cache::{DistanceCache, PairKey};
use super::node::ClusterNode;
use crate::distance::{Distance, Metric};
use crate::error::{Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Agglomerative clusterer.
#[derive(Debug, Clone)]
pub struct Agglomerative<D = Metric> {
    /// Distance between two node vectors.
    distance: D,
    /// Evaluate uncached distances with rayon (requires the `parallel` feature).
    parallel: bool,
}

/// Counters from one clustering run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterStats {
    /// Merges performed (`n - 1`).
    pub merges: usize,
    /// Distinct distance evaluations.
    pub distance_computations: usize,
    /// Pair lookups answered by the cache.
    pub cache_hits: u64,
}

impl Agglomerative<Metric> {
    /// Create a clusterer using the Pearson-derived distance.
    pub fn new() -> Self {
        Self {
            distance: Metric::Pearson,
            parallel: false,
        }
    }
}

impl Default for Agglomerative<Metric> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Distance> Agglomerative<D> {
    /// Set the distance function.
    pub fn with_distance<E: Distance>(self, distance: E) -> Agglomerative<E> {
        Agglomerative {
            distance,
            parallel: self.parallel,
        }
    }

    /// Evaluate the pair scan in parallel. No effect without the `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Configured distance function.
    pub fn distance(&self) -> &D {
        &self.distance
    }

    /// Cluster `rows` and return the root of the merge tree.
    pub fn fit(&self, rows: &[Vec<f64>]) -> Result<ClusterNode> {
        self.fit_with_stats(rows).map(|(root, _)| root)
    }

    /// Cluster `rows`, also returning run counters.
    pub fn fit_with_stats(&self, rows: &[Vec<f64>]) -> Result<(ClusterNode, ClusterStats)> {
        let dim = check_rows(rows)?;
        log::debug!(
            "clustering {} rows of dimension {} (metric = {}, parallel = {})",
            rows.len(),
            dim,
            self.distance.name(),
            self.parallel
        );

        let mut active: Vec<ClusterNode> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| ClusterNode::leaf(i, row.clone()))
            .collect();
        let mut cache = DistanceCache::new();
        let mut next_id: i64 = -1;
        let mut merges = 0;

        while active.len() > 1 {
            let distances = self.round_distances(&active, &mut cache);
            let (i, j, closest) = closest_pair(active.len(), &distances);

            let vector: Vec<f64> = active[i]
                .vector()
                .iter()
                .zip(active[j].vector())
                .map(|(a, b)| (a + b) / 2.0)
                .collect();

            // i < j, so removing j first leaves i in place.
            let right = active.remove(j);
            let left = active.remove(i);
            log::trace!(
                "merge {}: {} + {} at {} ({} active)",
                next_id,
                left.id(),
                right.id(),
                closest,
                active.len() + 1
            );
            active.push(ClusterNode::merged(next_id, vector, left, right, closest));
            next_id -= 1;
            merges += 1;
        }

        let stats = ClusterStats {
            merges,
            distance_computations: cache.len(),
            cache_hits: cache.hits(),
        };
        log::debug!(
            "clustering done: {} merges, {} distance computations, {} cache hits",
            stats.merges,
            stats.distance_computations,
            stats.cache_hits
        );

        let root = active.pop().ok_or(Error::EmptyInput)?;
        Ok((root, stats))
    }

    /// Distances for every active pair, in scan order.
    ///
    /// Cached pairs are read back; the rest are evaluated (in parallel when
    /// enabled) and written to the cache.
    fn round_distances(&self, active: &[ClusterNode], cache: &mut DistanceCache) -> Vec<f64> {
        let m = active.len();
        let mut distances = Vec::with_capacity(m * (m - 1) / 2);
        // (slot in `distances`, i, j)
        let mut missing = Vec::new();

        for i in 0..m {
            for j in (i + 1)..m {
                match cache.get(PairKey::new(active[i].id(), active[j].id())) {
                    Some(d) => distances.push(d),
                    None => {
                        missing.push((distances.len(), i, j));
                        distances.push(f64::NAN);
                    }
                }
            }
        }

        let computed = self.evaluate(active, &missing);
        for (&(slot, i, j), d) in missing.iter().zip(computed) {
            cache.insert(PairKey::new(active[i].id(), active[j].id()), d);
            distances[slot] = d;
        }

        distances
    }

    fn evaluate(&self, active: &[ClusterNode], pairs: &[(usize, usize, usize)]) -> Vec<f64> {
        let eval = |&(_, i, j): &(usize, usize, usize)| {
            self.distance.distance(active[i].vector(), active[j].vector())
        };

        #[cfg(feature = "parallel")]
        if self.parallel {
            return pairs.par_iter().map(&eval).collect();
        }

        pairs.iter().map(&eval).collect()
    }
}

/// Cluster `rows` with the given distance function.
///
/// ```rust
/// use hcluster::{cluster, Metric};
///
/// let rows = vec![vec![0.0, 0.0], vec![4.0, 0.0]];
/// let root = cluster(&rows, Metric::EuclideanSquared).unwrap();
/// assert_eq!(root.id(), -1);
/// assert_eq!(root.merge_distance(), 16.0);
/// assert_eq!(root.vector(), &[2.0, 0.0]);
/// ```
pub fn cluster<D: Distance>(rows: &[Vec<f64>], distance: D) -> Result<ClusterNode> {
    Agglomerative::new().with_distance(distance).fit(rows)
}

/// Reject empty or ragged input; return the shared row width.
fn check_rows(rows: &[Vec<f64>]) -> Result<usize> {
    let first = rows.first().ok_or(Error::EmptyInput)?;
    let dim = first.len();
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
        return Err(Error::RaggedRow {
            row,
            expected: dim,
            found: r.len(),
        });
    }
    Ok(dim)
}

/// First pair in scan order achieving the minimum. Starts from pair (0, 1).
fn closest_pair(m: usize, distances: &[f64]) -> (usize, usize, f64) {
    let mut best = (0, 1, distances[0]);
    let mut k = 0;
    for i in 0..m {
        for j in (i + 1)..m {
            let d = distances[k];
            if d < best.2 {
                best = (i, j, d);
            }
            k += 1;
        }
    }
    best
}
