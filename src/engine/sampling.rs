//! Initial design-of-experiments generators.
//!
//! Space-filling point sets evaluated before any model-guided search.
//! Latin Hypercube sampling guarantees marginal stratification: over `n`
//! samples, every dimension sees each of the `n` strata exactly once.
//! The simplified Sobol generator is a stand-in with no low-discrepancy
//! guarantee.
//!
//! Categorical components map a unit fraction to a level index by
//! truncation (`floor(u * levels)`, clamped to the last level); integer
//! components round. One rule, applied everywhere.

use serde::{Deserialize, Serialize};

use crate::domain::{Dimension, Domain, Point};
use crate::engine::rng::SeededRng;

/// Initial-design generation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DesignMethod {
    /// Simplified Sobol sequence (stand-in, no stratification guarantee).
    Sobol,
    /// Latin Hypercube sampling (marginally stratified).
    #[default]
    Lhs,
    /// Independent uniform draws.
    Random,
}

/// Generate an initial design with the given method.
#[must_use]
pub fn generate(method: DesignMethod, domain: &Domain, n: usize, rng: &mut SeededRng) -> Vec<Point> {
    match method {
        DesignMethod::Sobol => sobol(domain, n, rng),
        DesignMethod::Lhs => latin_hypercube(domain, n, rng),
        DesignMethod::Random => uniform_random(domain, n, rng),
    }
}

/// Map a unit fraction into one dimension's value range.
fn map_fraction(dim: &Dimension, u: f64) -> f64 {
    match dim {
        Dimension::Continuous { bounds: (min, max) } => min + u * (max - min),
        Dimension::Integer { bounds: (min, max) } => (min + u * (max - min)).round(),
        Dimension::Categorical { levels } => {
            let idx = (u * levels.len() as f64).floor();
            idx.min((levels.len() - 1) as f64)
        }
    }
}

/// Latin Hypercube sample: `n` points, one per stratum per dimension.
///
/// For each dimension a random permutation of `{0, .., n-1}` assigns
/// sample `i` its stratum; a jitter draw places the point inside the
/// stratum.
#[must_use]
pub fn latin_hypercube(domain: &Domain, n: usize, rng: &mut SeededRng) -> Vec<Point> {
    let d = domain.dimensionality();

    // One Fisher-Yates permutation per dimension.
    let mut permutations: Vec<Vec<usize>> = Vec::with_capacity(d);
    for _ in 0..d {
        let mut perm: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = (rng.next() * (i + 1) as f64).floor() as usize;
            perm.swap(i, j);
        }
        permutations.push(perm);
    }

    (0..n)
        .map(|i| {
            domain
                .dimensions
                .iter()
                .enumerate()
                .map(|(j, dim)| {
                    let stratum = permutations[j][i];
                    let u = (stratum as f64 + rng.next()) / n as f64;
                    map_fraction(dim, u)
                })
                .collect()
        })
        .collect()
}

/// Simplified Sobol sample.
///
/// Uses stratified jitter along each dimension independently; a full
/// implementation would use precomputed direction numbers.
#[must_use]
pub fn sobol(domain: &Domain, n: usize, rng: &mut SeededRng) -> Vec<Point> {
    (0..n)
        .map(|i| {
            domain
                .dimensions
                .iter()
                .map(|dim| match dim {
                    Dimension::Categorical { .. } => map_fraction(dim, rng.next()),
                    _ => {
                        let u = (i as f64 + rng.next()) / n as f64;
                        map_fraction(dim, u)
                    }
                })
                .collect()
        })
        .collect()
}

/// Independent uniform draws over the domain.
#[must_use]
pub fn uniform_random(domain: &Domain, n: usize, rng: &mut SeededRng) -> Vec<Point> {
    (0..n)
        .map(|_| {
            domain
                .dimensions
                .iter()
                .map(|dim| match dim {
                    Dimension::Continuous { bounds: (min, max) } => {
                        min + rng.next() * (max - min)
                    }
                    Dimension::Integer { bounds: (min, max) } => {
                        (min + rng.next() * (max - min + 1.0)).floor().min(*max)
                    }
                    Dimension::Categorical { .. } => map_fraction(dim, rng.next()),
                })
                .collect()
        })
        .collect()
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: LHS stratification holds for any seed and size.
        #[test]
        fn prop_lhs_stratification(seed in 0u64..10_000, n in 2usize..20) {
            let domain = Domain::new(vec![Dimension::continuous(0.0, 1.0)]);
            let mut rng = SeededRng::new(seed);
            let samples = latin_hypercube(&domain, n, &mut rng);

            let mut seen = vec![false; n];
            for point in &samples {
                let s = ((point[0] * n as f64).floor() as usize).min(n - 1);
                prop_assert!(!seen[s], "stratum {} occupied twice", s);
                seen[s] = true;
            }
        }

        /// Falsification: every generator respects domain bounds.
        #[test]
        fn prop_samples_in_bounds(seed in 0u64..10_000, n in 1usize..16) {
            let domain = Domain::new(vec![
                Dimension::continuous(-2.0, 3.0),
                Dimension::integer(-4.0, 4.0),
                Dimension::categorical(["x", "y"]),
            ]);
            for method in [DesignMethod::Sobol, DesignMethod::Lhs, DesignMethod::Random] {
                let mut rng = SeededRng::new(seed);
                for point in generate(method, &domain, n, &mut rng) {
                    prop_assert!(domain.validate_point(&point).is_ok());
                }
            }
        }
    }
}
