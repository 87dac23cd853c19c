#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use crate::distance::{euclidean_squared, pearson, Metric};
    use crate::hierarchy::{validate_tree, Dendrogram};
    use crate::{cluster, Agglomerative, ClusterNode, Result};

    fn matrix(max_rows: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
        (1usize..5).prop_flat_map(move |dim| {
            proptest::collection::vec(proptest::collection::vec(-50.0f64..50.0, dim), 1..max_rows)
        })
    }

    /// Pairs that were ever active together: the initial `C(n, 2)` plus, for
    /// each merged node, the nodes it shared the active set with.
    fn pairs_ever_active(n: usize) -> usize {
        let initial = n * (n - 1) / 2;
        let later: usize = (1..n).map(|k| n - k - 1).sum();
        initial + later
    }

    #[test]
    fn test_blog_like_pearson_grouping() -> Result<()> {
        // Two "topics": rows 0 and 2 rise together, rows 1 and 3 fall.
        let rows = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![9.0, 7.0, 4.0, 1.0],
            vec![2.0, 4.1, 6.0, 8.2],
            vec![8.0, 6.0, 3.5, 0.5],
        ];
        let root = cluster(&rows, pearson)?;
        let (l, r) = root.children().unwrap();
        let mut groups: Vec<Vec<i64>> = [l, r]
            .iter()
            .map(|n| {
                let mut ids: Vec<i64> = n.leaves().map(ClusterNode::id).collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        groups.sort();
        assert_eq!(groups, vec![vec![0, 2], vec![1, 3]]);
        Ok(())
    }

    #[test]
    fn test_constant_rows_merge_at_zero() -> Result<()> {
        // Pearson treats a constant row as identical to everything.
        let rows = vec![vec![5.0, 5.0, 5.0], vec![1.0, 2.0, 3.0], vec![3.0, 1.0, 2.0]];
        let root = cluster(&rows, Metric::Pearson)?;
        let first = root.iter().find(|n| n.id() == -1).unwrap();
        assert_eq!(first.merge_distance(), 0.0);
        let (l, r) = first.children().unwrap();
        assert_eq!((l.id(), r.id()), (0, 1));
        Ok(())
    }

    #[test]
    fn test_distance_calls_match_stats() -> Result<()> {
        let calls = AtomicUsize::new(0);
        let counting = |a: &[f64], b: &[f64]| -> f64 {
            let _ = calls.fetch_add(1, Ordering::Relaxed);
            euclidean_squared(a, b)
        };
        let rows: Vec<Vec<f64>> = (0..12).map(|i| vec![(i * 7 % 5) as f64, i as f64]).collect();

        let (root, stats) = Agglomerative::new()
            .with_distance(counting)
            .fit_with_stats(&rows)?;

        assert_eq!(root.leaf_count(), 12);
        assert_eq!(stats.merges, 11);
        assert_eq!(calls.load(Ordering::Relaxed), stats.distance_computations);
        assert_eq!(stats.distance_computations, pairs_ever_active(12));
        Ok(())
    }

    #[test]
    fn test_dendrogram_cut_recovers_groups() -> Result<()> {
        let rows = vec![
            vec![0.0, 0.0],
            vec![50.0, 50.0],
            vec![0.5, 0.0],
            vec![50.0, 51.0],
            vec![0.0, 0.7],
        ];
        let root = cluster(&rows, Metric::EuclideanSquared)?;
        let labels = Dendrogram::from_tree(&root).cut_to_k(2)?;
        assert_eq!(labels, vec![0, 1, 0, 1, 0]);
        Ok(())
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() -> Result<()> {
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![(i as f64).sin(), (i as f64 * 0.3).cos(), (i % 7) as f64])
            .collect();
        let sequential = Agglomerative::new().fit_with_stats(&rows)?;
        let parallel = Agglomerative::new().with_parallel(true).fit_with_stats(&rows)?;
        assert_eq!(sequential, parallel);
        Ok(())
    }

    proptest! {
        #[test]
        fn merge_tree_shape_and_ids(rows in matrix(24)) {
            let n = rows.len();
            let root = cluster(&rows, Metric::EuclideanSquared).unwrap();

            let mut leaves = HashSet::new();
            let mut internal = HashSet::new();
            for node in root.iter() {
                match node.children() {
                    Some(_) => {
                        prop_assert!(internal.insert(node.id()));
                    }
                    None => {
                        prop_assert!(leaves.insert(node.id()));
                    }
                }
            }
            prop_assert_eq!(leaves, (0..n as i64).collect::<HashSet<_>>());
            prop_assert_eq!(internal, (1..n as i64).map(|k| -k).collect::<HashSet<_>>());
            prop_assert!(validate_tree(&root).is_healthy());
        }

        #[test]
        fn clustering_is_deterministic(rows in matrix(16), use_pearson in any::<bool>()) {
            let metric = if use_pearson { Metric::Pearson } else { Metric::EuclideanSquared };
            let a = cluster(&rows, metric).unwrap();
            let b = cluster(&rows, metric).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn cache_never_recomputes(rows in matrix(20)) {
            let n = rows.len();
            let (_, stats) = Agglomerative::new()
                .with_distance(Metric::EuclideanSquared)
                .fit_with_stats(&rows)
                .unwrap();
            prop_assert_eq!(stats.merges, n - 1);
            prop_assert!(stats.distance_computations <= pairs_ever_active(n));
        }

        #[test]
        fn first_merge_is_closest_pair(rows in matrix(12)) {
            prop_assume!(rows.len() >= 2);
            let root = cluster(&rows, euclidean_squared).unwrap();
            let first = root.iter().find(|n| n.id() == -1).unwrap();

            let mut best = f64::INFINITY;
            for i in 0..rows.len() {
                for j in (i + 1)..rows.len() {
                    best = best.min(euclidean_squared(&rows[i], &rows[j]));
                }
            }
            prop_assert_eq!(first.merge_distance(), best);
        }
    }
}
