//! Cluster the rows (or columns) of a tab-delimited matrix and print the tree.
//!
//! ```text
//! cargo run --example blog_clusters -- blogdata.txt [pearson|euclidean] [--columns]
//! ```

use hcluster::hierarchy::HealthCheck;
use hcluster::render::render_text;
use hcluster::{Agglomerative, Matrix, Metric, ReadOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: blog_clusters <matrix.txt> [metric] [--columns]")?;
    let mut metric = Metric::default();
    let mut columns = false;
    for arg in args {
        if arg == "--columns" {
            columns = true;
        } else {
            metric = arg.parse()?;
        }
    }

    let mut matrix = Matrix::from_path(&path, &ReadOptions::default())?;
    if columns {
        matrix = matrix.transpose();
    }

    let (root, stats) = Agglomerative::new()
        .with_distance(metric)
        .fit_with_stats(&matrix.rows)?;

    print!("{}", render_text(&root, Some(matrix.row_names.as_slice())));
    println!();
    println!(
        "metric={} merges={} distance_computations={} cache_hits={}",
        metric, stats.merges, stats.distance_computations, stats.cache_hits
    );
    print!("{}", root.health_check());

    Ok(())
}
