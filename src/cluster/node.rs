//! Merge-tree node.

use core::fmt;

/// A node in the binary merge tree produced by agglomerative clustering.
///
/// Leaves carry an original input row and a non-negative id equal to the
/// row's index. Internal nodes carry the centroid of their two children and a
/// negative id assigned in merge order (`-1` for the first merge). A parent
/// exclusively owns its children.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    id: i64,
    vector: Vec<f64>,
    children: Option<Box<(ClusterNode, ClusterNode)>>,
    merge_distance: f64,
}

impl ClusterNode {
    /// Create a leaf for input row `index`.
    pub(crate) fn leaf(index: usize, vector: Vec<f64>) -> Self {
        Self {
            id: index as i64,
            vector,
            children: None,
            merge_distance: 0.0,
        }
    }

    /// Create an internal node from two merged children.
    pub(crate) fn merged(
        id: i64,
        vector: Vec<f64>,
        left: ClusterNode,
        right: ClusterNode,
        merge_distance: f64,
    ) -> Self {
        debug_assert!(id < 0, "internal node ids are negative");
        Self {
            id,
            vector,
            children: Some(Box::new((left, right))),
            merge_distance,
        }
    }

    /// Node id: row index for leaves, negative merge counter for internal nodes.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Representative vector (original row or merged centroid).
    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    /// Left child (the lower-positioned node at merge time).
    pub fn left(&self) -> Option<&ClusterNode> {
        self.children.as_deref().map(|(l, _)| l)
    }

    /// Right child.
    pub fn right(&self) -> Option<&ClusterNode> {
        self.children.as_deref().map(|(_, r)| r)
    }

    /// Both children, if this is an internal node.
    pub fn children(&self) -> Option<(&ClusterNode, &ClusterNode)> {
        self.children.as_deref().map(|(l, r)| (l, r))
    }

    /// Distance between the two children when they were merged; `0` for leaves.
    pub fn merge_distance(&self) -> f64 {
        self.merge_distance
    }

    /// Check if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Source row index, if this is a leaf.
    pub fn leaf_index(&self) -> Option<usize> {
        if self.is_leaf() {
            usize::try_from(self.id).ok()
        } else {
            None
        }
    }

    /// Pre-order traversal (node, then left subtree, then right subtree).
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &ClusterNode> {
        self.iter().filter(|n| n.is_leaf())
    }

    /// Number of leaves under this node.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Number of edges on the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        let mut best = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            match node.children() {
                Some((l, r)) => {
                    stack.push((r, level + 1));
                    stack.push((l, level + 1));
                }
                None => best = best.max(level),
            }
        }
        best
    }

    /// Largest sum of merge distances along a path from this node to a leaf.
    ///
    /// Dendrogram renderers scale horizontal extent by this value.
    pub fn depth(&self) -> f64 {
        let mut best = 0.0f64;
        let mut stack = vec![(self, 0.0f64)];
        while let Some((node, acc)) = stack.pop() {
            match node.children() {
                Some((l, r)) => {
                    let acc = acc + node.merge_distance;
                    stack.push((r, acc));
                    stack.push((l, acc));
                }
                None => best = best.max(acc),
            }
        }
        best
    }
}

impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "Leaf[{}]", self.id)
        } else {
            write!(f, "Node[{}] d={:.4}", self.id, self.merge_distance)
        }
    }
}

/// Pre-order iterator over a merge tree. See [`ClusterNode::iter`].
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    stack: Vec<&'a ClusterNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a ClusterNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some((l, r)) = node.children() {
            self.stack.push(r);
            self.stack.push(l);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClusterNode {
        //        -2 (d=3)
        //       /    \
        //     -1 (1)  2
        //    /  \
        //   0    1
        let a = ClusterNode::leaf(0, vec![0.0]);
        let b = ClusterNode::leaf(1, vec![1.0]);
        let c = ClusterNode::leaf(2, vec![4.0]);
        let ab = ClusterNode::merged(-1, vec![0.5], a, b, 1.0);
        ClusterNode::merged(-2, vec![2.25], ab, c, 3.0)
    }

    #[test]
    fn leaf_accessors() {
        let leaf = ClusterNode::leaf(7, vec![1.0, 2.0]);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.id(), 7);
        assert_eq!(leaf.leaf_index(), Some(7));
        assert_eq!(leaf.vector(), &[1.0, 2.0]);
        assert_eq!(leaf.merge_distance(), 0.0);
        assert!(leaf.left().is_none() && leaf.right().is_none());
        assert_eq!(leaf.height(), 0);
        assert_eq!(leaf.depth(), 0.0);
    }

    #[test]
    fn internal_accessors() {
        let root = sample();
        assert!(!root.is_leaf());
        assert_eq!(root.leaf_index(), None);
        assert_eq!(root.left().map(ClusterNode::id), Some(-1));
        assert_eq!(root.right().map(ClusterNode::id), Some(2));
        assert_eq!(root.leaf_count(), 3);
        assert_eq!(root.height(), 2);
        assert!((root.depth() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn traversal_orders() {
        let root = sample();
        let pre: Vec<i64> = root.iter().map(ClusterNode::id).collect();
        assert_eq!(pre, vec![-2, -1, 0, 1, 2]);
        let leaves: Vec<i64> = root.leaves().map(ClusterNode::id).collect();
        assert_eq!(leaves, vec![0, 1, 2]);
    }

    #[test]
    fn display() {
        let root = sample();
        assert_eq!(root.to_string(), "Node[-2] d=3.0000");
        assert_eq!(ClusterNode::leaf(4, vec![]).to_string(), "Leaf[4]");
    }
}
