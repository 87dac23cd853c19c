//! Merge-tree validation and health checking.
//!
//! Verifies the structural contract of a tree produced by agglomerative
//! clustering:
//! - Leaf ids are exactly `0..n`
//! - Internal ids are exactly `-1..=-(n-1)`, each used once
//! - Leaves have a merge distance of zero
//! - Every vector has the same length
//! - A child was created before its parent (merge order)
//!
//! Centroid merges are not monotone: the mean of two close vectors can sit
//! nearer to a third than either did, so a parent may merge at a smaller
//! distance than its child. Such inversions are reported as warnings; the
//! tree is still well formed.
//!
//! # Example
//!
//! ```rust
//! use hcluster::hierarchy::HealthCheck;
//! use hcluster::{cluster, Metric};
//!
//! let rows = [vec![1.0, 2.0], vec![2.0, 1.0], vec![0.0, 5.0]];
//! let root = cluster(&rows, Metric::Pearson).unwrap();
//! let report = root.health_check();
//! assert!(report.is_healthy(), "{}", report);
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::cluster::ClusterNode;

/// How much a finding matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Legal for centroid clustering, but surprising when read as a dendrogram.
    Warning,
    /// The tree breaks an id, distance, or shape invariant.
    Error,
    /// Ids collide or the merge count is wrong; flat views will be garbage.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        })
    }
}

/// A single finding from [`validate_tree`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// The same id appears on more than one node.
    DuplicateId(i64),
    /// A node vector's length differs from the root's.
    VectorLength { node: i64, expected: usize, found: usize },
    /// A leaf carries a negative id.
    NegativeLeafId(i64),
    /// A leaf carries a non-zero merge distance.
    LeafDistance { node: i64, distance: f64 },
    /// An internal node carries a non-negative id.
    NonNegativeMergeId(i64),
    /// A child's merge id was assigned after its parent's.
    MergeOrder { parent: i64, child: i64 },
    /// A parent merged at a smaller distance than one of its children.
    Inversion {
        parent: i64,
        child: i64,
        parent_distance: f64,
        child_distance: f64,
    },
    /// `n` leaves need exactly `n - 1` merges.
    MergeCount { leaves: usize, merges: usize },
    /// Leaf ids are not exactly `0..leaves`.
    LeafIds { leaves: usize },
    /// Merge ids are not exactly `-1..=-merges`.
    MergeIds { merges: usize },
}

impl ValidationIssue {
    /// Severity of this finding.
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::Inversion { .. } => Severity::Warning,
            ValidationIssue::DuplicateId(_) | ValidationIssue::MergeCount { .. } => {
                Severity::Critical
            }
            _ => Severity::Error,
        }
    }

    /// Node the finding is attached to, if it concerns a single node.
    pub fn node(&self) -> Option<i64> {
        match *self {
            ValidationIssue::DuplicateId(id)
            | ValidationIssue::NegativeLeafId(id)
            | ValidationIssue::NonNegativeMergeId(id) => Some(id),
            ValidationIssue::VectorLength { node, .. }
            | ValidationIssue::LeafDistance { node, .. } => Some(node),
            ValidationIssue::MergeOrder { parent, .. }
            | ValidationIssue::Inversion { parent, .. } => Some(parent),
            ValidationIssue::MergeCount { .. }
            | ValidationIssue::LeafIds { .. }
            | ValidationIssue::MergeIds { .. } => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity())?;
        match self {
            ValidationIssue::DuplicateId(id) => write!(f, "id {id} used more than once"),
            ValidationIssue::VectorLength {
                node,
                expected,
                found,
            } => write!(f, "node {node} has {found} values, root has {expected}"),
            ValidationIssue::NegativeLeafId(id) => write!(f, "leaf has negative id {id}"),
            ValidationIssue::LeafDistance { node, distance } => {
                write!(f, "leaf {node} has merge distance {distance}")
            }
            ValidationIssue::NonNegativeMergeId(id) => {
                write!(f, "internal node has non-negative id {id}")
            }
            ValidationIssue::MergeOrder { parent, child } => {
                write!(f, "node {parent} owns {child}, which was merged after it")
            }
            ValidationIssue::Inversion {
                parent,
                child,
                parent_distance,
                child_distance,
            } => write!(
                f,
                "node {parent} merged at {parent_distance:.4}, below child {child} at {child_distance:.4}"
            ),
            ValidationIssue::MergeCount { leaves, merges } => write!(
                f,
                "{leaves} leaves require {} merges, found {merges}",
                leaves.saturating_sub(1)
            ),
            ValidationIssue::LeafIds { leaves } => {
                write!(f, "leaf ids are not exactly 0..{leaves}")
            }
            ValidationIssue::MergeIds { merges } => {
                write!(f, "internal ids are not exactly -1..=-{merges}")
            }
        }
    }
}

/// Findings of one [`validate_tree`] pass, in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// All findings.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when nothing at [`Severity::Error`] or above was found.
    pub fn is_healthy(&self) -> bool {
        self.worst().map_or(true, |s| s < Severity::Error)
    }

    /// True when nothing at all was found, warnings included.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Highest severity present.
    pub fn worst(&self) -> Option<Severity> {
        self.issues.iter().map(ValidationIssue::severity).max()
    }

    /// Number of findings at exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity() == severity).count()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "no issues");
        }
        writeln!(
            f,
            "{} critical, {} errors, {} warnings",
            self.count(Severity::Critical),
            self.count(Severity::Error),
            self.count(Severity::Warning)
        )?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// Validation findings plus shape statistics of the tree.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Validation findings.
    pub validation: ValidationReport,
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Edges on the longest root-to-leaf path.
    pub height: usize,
    /// Largest cumulative merge distance from root to a leaf.
    pub depth: f64,
}

impl HealthReport {
    /// Check if the tree is healthy (warnings allowed).
    pub fn is_healthy(&self) -> bool {
        self.validation.is_healthy()
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "nodes={} leaves={} height={} depth={:.4}",
            self.node_count, self.leaf_count, self.height, self.depth
        )?;
        write!(f, "{}", self.validation)
    }
}

/// Trait for types that can be health-checked.
pub trait HealthCheck {
    /// Perform a health check and return a report.
    fn health_check(&self) -> HealthReport;
}

impl HealthCheck for ClusterNode {
    fn health_check(&self) -> HealthReport {
        HealthReport {
            validation: validate_tree(self),
            node_count: self.iter().count(),
            leaf_count: self.leaf_count(),
            height: self.height(),
            depth: self.depth(),
        }
    }
}

/// Validate the id, distance, and vector invariants of a merge tree.
pub fn validate_tree(root: &ClusterNode) -> ValidationReport {
    let mut issues = Vec::new();
    let dim = root.vector().len();

    let mut seen: HashSet<i64> = HashSet::new();
    let mut n_leaves = 0usize;
    let mut n_internal = 0usize;

    for node in root.iter() {
        let id = node.id();
        if !seen.insert(id) {
            issues.push(ValidationIssue::DuplicateId(id));
        }
        if node.vector().len() != dim {
            issues.push(ValidationIssue::VectorLength {
                node: id,
                expected: dim,
                found: node.vector().len(),
            });
        }

        let Some((l, r)) = node.children() else {
            n_leaves += 1;
            if id < 0 {
                issues.push(ValidationIssue::NegativeLeafId(id));
            }
            if node.merge_distance() != 0.0 {
                issues.push(ValidationIssue::LeafDistance {
                    node: id,
                    distance: node.merge_distance(),
                });
            }
            continue;
        };

        n_internal += 1;
        if id >= 0 {
            issues.push(ValidationIssue::NonNegativeMergeId(id));
        }
        for child in [l, r] {
            if child.is_leaf() {
                continue;
            }
            // Merge ids count down, so an older child has the larger id.
            if child.id() <= id {
                issues.push(ValidationIssue::MergeOrder {
                    parent: id,
                    child: child.id(),
                });
            }
            if node.merge_distance() < child.merge_distance() {
                issues.push(ValidationIssue::Inversion {
                    parent: id,
                    child: child.id(),
                    parent_distance: node.merge_distance(),
                    child_distance: child.merge_distance(),
                });
            }
        }
    }

    if n_internal + 1 != n_leaves {
        issues.push(ValidationIssue::MergeCount {
            leaves: n_leaves,
            merges: n_internal,
        });
    }
    if !(0..n_leaves as i64).all(|id| seen.contains(&id)) {
        issues.push(ValidationIssue::LeafIds { leaves: n_leaves });
    }
    if !(1..=n_internal as i64).all(|k| seen.contains(&-k)) {
        issues.push(ValidationIssue::MergeIds { merges: n_internal });
    }

    ValidationReport { issues }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cluster::cluster;
    use crate::distance::Metric;
    use proptest::prelude::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_report_health_ignores_warnings() {
        let mut report = ValidationReport::default();
        assert!(report.is_clean());
        assert_eq!(report.worst(), None);

        report.issues.push(ValidationIssue::Inversion {
            parent: -2,
            child: -1,
            parent_distance: 3.0,
            child_distance: 4.0,
        });
        assert!(report.is_healthy());
        assert!(!report.is_clean());

        report.issues.push(ValidationIssue::LeafIds { leaves: 3 });
        assert!(!report.is_healthy());
        assert_eq!(report.worst(), Some(Severity::Error));
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_issue_display_and_node() {
        let issue = ValidationIssue::MergeOrder {
            parent: -1,
            child: -42,
        };
        assert_eq!(issue.node(), Some(-1));
        assert_eq!(issue.to_string(), "error: node -1 owns -42, which was merged after it");
        assert_eq!(ValidationIssue::MergeIds { merges: 2 }.node(), None);
    }

    #[test]
    fn test_clustered_tree_is_healthy() {
        let rows = vec![
            vec![1.0, 2.0, 3.0],
            vec![3.0, 1.0, 0.0],
            vec![2.0, 2.0, 9.0],
            vec![0.0, 4.0, 1.0],
        ];
        let root = cluster(&rows, Metric::Pearson).unwrap();
        let report = validate_tree(&root);
        assert!(report.is_healthy(), "{}", report);
    }

    #[test]
    fn test_centroid_inversion_is_a_warning() {
        // (0,0)-(2,0) merge at 4; their mean (1,0) is 3.24 from (1,1.8).
        let rows = vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![1.0, 1.8]];
        let root = cluster(&rows, Metric::EuclideanSquared).unwrap();
        assert_eq!(root.id(), -2);
        assert!(root.merge_distance() < 4.0);

        let report = validate_tree(&root);
        assert!(report.is_healthy(), "{}", report);
        assert_eq!(report.worst(), Some(Severity::Warning));
        assert!(matches!(
            report.issues.as_slice(),
            [ValidationIssue::Inversion { parent: -2, child: -1, .. }]
        ));
    }

    #[test]
    fn test_hand_built_tree_with_bad_ids() {
        // Leaf ids {0, 5}: not 0..2.
        let a = ClusterNode::leaf(0, vec![0.0]);
        let b = ClusterNode::leaf(5, vec![1.0]);
        let root = ClusterNode::merged(-1, vec![0.5], a, b, 1.0);
        let report = validate_tree(&root);
        assert!(!report.is_healthy());
        assert!(report.issues.contains(&ValidationIssue::LeafIds { leaves: 2 }));
    }

    #[test]
    fn test_hand_built_tree_with_order_violation() {
        // Parent -1 owns child -2: child id assigned after the parent's.
        let a = ClusterNode::leaf(0, vec![0.0]);
        let b = ClusterNode::leaf(1, vec![1.0]);
        let c = ClusterNode::leaf(2, vec![2.0]);
        let inner = ClusterNode::merged(-2, vec![0.5], a, b, 1.0);
        let root = ClusterNode::merged(-1, vec![1.25], inner, c, 2.0);
        let report = validate_tree(&root);
        assert!(!report.is_healthy());
        assert!(report.issues.contains(&ValidationIssue::MergeOrder {
            parent: -1,
            child: -2
        }));
    }

    #[test]
    fn test_health_report_stats() {
        let rows = vec![vec![0.0], vec![1.0], vec![10.0]];
        let root = cluster(&rows, Metric::EuclideanSquared).unwrap();
        let health = root.health_check();
        assert!(health.validation.is_clean(), "{}", health);
        assert_eq!(health.node_count, 5);
        assert_eq!(health.leaf_count, 3);
        assert_eq!(health.height, 2);
        // Root at 90.25 plus the {0,1} merge at 1.
        assert!((health.depth - 91.25).abs() < 1e-10);
    }

    proptest! {
        #[test]
        fn clustered_trees_are_healthy(
            rows in (1usize..6).prop_flat_map(|dim| {
                proptest::collection::vec(
                    proptest::collection::vec(-100.0f64..100.0, dim),
                    1..20,
                )
            }),
            use_pearson in any::<bool>(),
        ) {
            let metric = if use_pearson { Metric::Pearson } else { Metric::EuclideanSquared };
            let root = cluster(&rows, metric).unwrap();
            let report = validate_tree(&root);
            prop_assert!(report.is_healthy(), "{}", report);
            prop_assert!(report.worst() <= Some(Severity::Warning));
        }
    }
}
