//! Views over a finished merge tree.
//!
//! The clustering engine hands back a [`ClusterNode`](crate::ClusterNode)
//! root. This module offers two things on top of it:
//!
//! - [`Dendrogram`]: the merge history flattened into creation order, with
//!   flat cuts into `k` groups or at a distance threshold.
//! - [`validate_tree`] / [`HealthCheck`]: structural checks of the id,
//!   distance, and shape invariants.
//!
//! ```text
//!         -3 (d=1.0)
//!        /  \
//!      -1    -2 (d=0.7)
//!     / \    / \
//!    0   1  2   3 (leaves)
//! ```
//!
//! Key property: "cut" at any height to get any number of clusters.

mod dendrogram;
mod validate;

pub use dendrogram::{Dendrogram, Merge};
pub use validate::{
    validate_tree, HealthCheck, HealthReport, Severity, ValidationIssue, ValidationReport,
};
