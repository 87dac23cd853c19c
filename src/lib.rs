//! # hcluster
//!
//! Greedy agglomerative clustering of numeric rows into a binary merge tree
//! (dendrogram).
//!
//! Each row (for example the word counts of one blog) starts as a leaf. The
//! two closest active clusters are merged into a node whose vector is their
//! elementwise mean, until a single root remains. Distances come from a
//! pluggable [`Distance`]: the Pearson-derived `1 - r` by default, or squared
//! Euclidean.
//!
//! ```rust
//! use hcluster::{cluster, Metric};
//!
//! let rows = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 0.0]];
//! let root = cluster(&rows, Metric::EuclideanSquared).unwrap();
//!
//! // {0, 1} merged first, then joined with 2.
//! let (l, r) = root.children().unwrap();
//! assert_eq!(l.id(), 2);
//! assert_eq!(r.id(), -1);
//! ```
//!
//! Around the engine sit small collaborators: [`Matrix`] reads delimited
//! files and transposes them, [`render`] prints a tree as indented text, and
//! [`hierarchy`] flattens and validates trees.
//!
//! The `parallel` feature evaluates uncached pair distances with rayon.

pub mod cluster;
pub mod distance;
/// Error types used across `hcluster`.
pub mod error;
pub mod hierarchy;
pub mod matrix;
pub mod render;

#[cfg(test)]
mod cluster_tests;

pub use cluster::{cluster, Agglomerative, ClusterNode, ClusterStats};
pub use distance::{euclidean_squared, pearson, Distance, Metric};
pub use error::{Error, Result};
pub use hierarchy::{validate_tree, Dendrogram};
pub use matrix::{Matrix, ReadOptions};
