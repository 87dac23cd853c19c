//! Dissimilarity between two equal-length vectors.
//!
//! Two strategies are provided, both behind the single [`Distance`] capability
//! so the clustering engine never needs to know which one it was given:
//!
//! | Metric | Formula | Range |
//! |--------|---------|-------|
//! | Pearson | `1 - r` | `[0, 2]` |
//! | Euclidean (squared) | `Σ (aᵢ - bᵢ)²` | `[0, ∞)` |
//!
//! ## Pearson
//!
//! The correlation is computed from simple sums:
//!
//! ```text
//! num = Σxy - (Σx · Σy) / n
//! den = sqrt((Σx² - (Σx)²/n) · (Σy² - (Σy)²/n))
//! r   = num / den
//! ```
//!
//! When either vector is constant the denominator vanishes. That case returns
//! a distance of `0`, i.e. a constant vector is treated as maximally similar to
//! everything. Constancy is checked on the values themselves: for a value like
//! `0.3` the sums above cancel to a tiny nonzero variance of either sign, which
//! would otherwise produce an arbitrary `r`.
//!
//! Any `Fn(&[f64], &[f64]) -> f64` is also a [`Distance`], so custom metrics
//! can be passed as plain functions or closures.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// A dissimilarity between two equal-length vectors.
///
/// Implementations must be pure: the engine caches results by node pair and
/// assumes a repeated call would return the same value.
pub trait Distance: Send + Sync {
    /// Distance between `a` and `b`. Callers guarantee `a.len() == b.len()`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Short name for logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Distance for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

/// Built-in distance strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// `1 - r` where `r` is the Pearson correlation coefficient.
    #[default]
    Pearson,
    /// Sum of squared elementwise differences.
    EuclideanSquared,
}

impl Distance for Metric {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::Pearson => pearson(a, b),
            Metric::EuclideanSquared => euclidean_squared(a, b),
        }
    }

    fn name(&self) -> &str {
        match self {
            Metric::Pearson => "pearson",
            Metric::EuclideanSquared => "euclidean-squared",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(Metric::Pearson),
            "euclidean" | "euclidean-squared" | "euclidean_squared" => Ok(Metric::EuclideanSquared),
            _ => Err(Error::InvalidParameter {
                name: "metric",
                message: "expected 'pearson' or 'euclidean-squared'",
            }),
        }
    }
}

/// Squared Euclidean distance.
#[inline]
pub fn euclidean_squared(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Pearson-derived distance, `1 - r`.
///
/// Returns `0.0` when either vector is constant (zero variance), including
/// empty vectors.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if is_constant(a) || is_constant(b) {
        return 0.0;
    }
    let n = a.len() as f64;

    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    let mut sum_a_sq = 0.0;
    let mut sum_b_sq = 0.0;
    let mut sum_ab = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        sum_a += x;
        sum_b += y;
        sum_a_sq += x * x;
        sum_b_sq += y * y;
        sum_ab += x * y;
    }

    let num = sum_ab - (sum_a * sum_b / n);
    let var_a = sum_a_sq - sum_a * sum_a / n;
    let var_b = sum_b_sq - sum_b * sum_b / n;
    // Non-constant but below rounding noise.
    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }

    1.0 - num / (var_a * var_b).sqrt()
}

fn is_constant(v: &[f64]) -> bool {
    match v.split_first() {
        Some((first, rest)) => rest.iter().all(|x| x == first),
        None => true,
    }
}

/// Evaluate `distance` after checking that both vectors have the same length.
pub fn checked_distance<D: Distance + ?Sized>(distance: &D, a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(distance.distance(a, b))
}
