//! Flat merge history of a clustering run.
//!
//! A [`ClusterNode`] tree is convenient for rendering; a flat list of merges
//! in creation order is convenient for cutting the tree into a fixed number
//! of groups or at a distance threshold.

use crate::cluster::ClusterNode;
use crate::error::{Error, Result};

/// A dendrogram representing hierarchical cluster merges.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged (by node id)
/// - The distance at which they merged
/// - The number of leaves in the resulting cluster
#[derive(Debug, Clone)]
pub struct Dendrogram {
    /// Merge history, `merges[k]` created node id `-(k + 1)`.
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// Id of the node this merge created.
    pub id: i64,
    /// Left child id.
    pub left: i64,
    /// Right child id.
    pub right: i64,
    /// Distance at which the merge occurred.
    pub distance: f64,
    /// Leaves under the resulting node.
    pub size: usize,
}

impl Dendrogram {
    /// Flatten a merge tree.
    ///
    /// Expects ids as assigned by the clustering engine: leaves `0..n`, merges
    /// `-1..=-(n-1)`. Run [`validate_tree`](super::validate_tree) first on
    /// trees from elsewhere.
    pub fn from_tree(root: &ClusterNode) -> Self {
        // Post-order sizes without recursion: children are visited before
        // their parent when walking the pre-order list backwards.
        let nodes: Vec<&ClusterNode> = root.iter().collect();
        let n_items = nodes.iter().filter(|n| n.is_leaf()).count();
        let mut sizes = vec![0usize; nodes.len()];
        let mut slot_of = std::collections::HashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            let _ = slot_of.insert(node.id(), slot);
        }

        let mut merges = Vec::with_capacity(n_items.saturating_sub(1));
        for slot in (0..nodes.len()).rev() {
            let node = nodes[slot];
            match node.children() {
                None => sizes[slot] = 1,
                Some((l, r)) => {
                    let size = sizes[slot_of[&l.id()]] + sizes[slot_of[&r.id()]];
                    sizes[slot] = size;
                    merges.push(Merge {
                        id: node.id(),
                        left: l.id(),
                        right: r.id(),
                        distance: node.merge_distance(),
                        size,
                    });
                }
            }
        }
        // -1 first.
        merges.sort_by_key(|m| -m.id);

        Self { merges, n_items }
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges in creation order.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Merge distances in creation order (for visualization).
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Cluster assignments after undoing every merge above `threshold`.
    ///
    /// Centroid merges can produce inversions (a later merge at a smaller
    /// distance), so merges above the threshold are skipped rather than ending
    /// the scan. Two items share a label iff they are joined through merges at
    /// or below the threshold.
    pub fn cut_at_distance(&self, threshold: f64) -> Vec<usize> {
        self.labels(|m| m.distance <= threshold)
    }

    /// Cluster assignments for exactly `k` clusters: the first `n - k` merges
    /// are applied, the rest undone.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 || k > self.n_items {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be between 1 and the number of items",
            });
        }
        let keep = self.n_items - k;
        Ok(self.labels(|m| (-m.id) as usize <= keep))
    }

    /// Union the children of every accepted merge, then label leaves by first
    /// appearance of their group in leaf order.
    fn labels(&self, accept: impl Fn(&Merge) -> bool) -> Vec<usize> {
        let n = self.n_items;
        // Slots: leaves 0..n, merge node -(k+1) at n + k.
        let slot = |id: i64| -> usize {
            if id >= 0 {
                id as usize
            } else {
                n + (-id - 1) as usize
            }
        };
        let mut sets = DisjointSets::new(n + self.merges.len());
        for merge in self.merges.iter().filter(|m| accept(*m)) {
            let node = slot(merge.id);
            sets.union(node, slot(merge.left));
            sets.union(node, slot(merge.right));
        }

        let mut label_of_root = std::collections::HashMap::new();
        (0..n)
            .map(|leaf| {
                let root = sets.find(leaf);
                let next = label_of_root.len();
                *label_of_root.entry(root).or_insert(next)
            })
            .collect()
    }
}

/// Union-find with path halving.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}
