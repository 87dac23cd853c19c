//! Agglomerative clustering into a binary merge tree.
//!
//! Bottom-up: start with each row as its own cluster, repeatedly merge the
//! two closest clusters until one remains. The merge history forms a
//! **dendrogram**, returned as the root [`ClusterNode`].
//!
//! ```text
//!          -3 (d=2.1)
//!         /   \
//!      -1      -2 (d=0.4)
//!     /  \    /  \
//!    0    1  2    3   (leaves = input rows)
//! ```
//!
//! Leaves keep the input row index as id. Internal nodes get `-1, -2, ...`
//! in merge order, so `id < 0` tells a renderer it is looking at a merge.
//!
//! ## Linkage
//!
//! Only one rule is implemented: the merged node's vector is the plain mean
//! of its two children's vectors, and cluster distance is the configured
//! [`Distance`](crate::distance::Distance) between those vectors. Subtree
//! sizes are not used as weights.
//!
//! ## Usage
//!
//! ```rust
//! use hcluster::cluster::Agglomerative;
//! use hcluster::Metric;
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let root = Agglomerative::new()
//!     .with_distance(Metric::EuclideanSquared)
//!     .fit(&data)
//!     .unwrap();
//!
//! assert_eq!(root.leaf_count(), 4);
//! let (l, r) = root.children().unwrap();
//! assert_eq!(l.leaf_count(), 2);
//! assert_eq!(r.leaf_count(), 2);
//! ```

mod agglomerative;
mod cache;
mod node;

pub use agglomerative::{cluster, Agglomerative, ClusterStats};
pub use node::{ClusterNode, Nodes};
