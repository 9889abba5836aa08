//! Dense linear algebra for Gaussian Process inference.
//!
//! Cholesky factorization and triangular solves over row-major
//! `Vec<Vec<f64>>` matrices. Observation counts in this engine are small
//! (tens to low hundreds), so simple cache-oblivious loops are the right
//! tool; no BLAS, no SIMD.

use crate::error::{BoError, BoResult};

/// Cholesky decomposition `A = L·Lᵀ` of a symmetric positive-definite
/// matrix, returning the lower-triangular factor `L`.
///
/// # Errors
///
/// Returns [`BoError::NumericInstability`] when a pivot is non-positive,
/// i.e. the matrix is not positive definite even after jitter.
pub fn cholesky(a: &[Vec<f64>]) -> BoResult<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[i][k] * l[j][k];
            }

            if i == j {
                let pivot = a[i][i] - sum;
                if pivot <= 0.0 {
                    return Err(BoError::numeric(format!(
                        "covariance not positive definite at pivot {i} ({pivot:.3e})"
                    )));
                }
                l[i][j] = pivot.sqrt();
            } else {
                l[i][j] = (a[i][j] - sum) / l[j][j];
            }
        }
    }

    Ok(l)
}

/// Solve `L·x = b` by forward substitution (`L` lower triangular).
#[must_use]
pub fn solve_lower(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut x = vec![0.0; n];

    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}

/// Solve `Lᵀ·x = b` by back substitution (`L` lower triangular).
#[must_use]
pub fn solve_upper(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut x = vec![0.0; n];

    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}

/// Solve `(L·Lᵀ)·x = b` given the Cholesky factor `L`.
#[must_use]
pub fn solve_cholesky(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let y = solve_lower(l, b);
    solve_upper(l, &y)
}

/// Matrix-vector product `A·x`.
#[must_use]
pub fn mat_vec(a: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
    a.iter()
        .map(|row| row.iter().zip(x.iter()).map(|(r, v)| r * v).sum())
        .collect()
}

/// Add `jitter` to every diagonal entry in place.
pub fn add_jitter(a: &mut [Vec<f64>], jitter: f64) {
    for (i, row) in a.iter_mut().enumerate() {
        row[i] += jitter;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mat_mul_transpose(l: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let n = l.len();
        let mut a = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    a[i][j] += l[i][k] * l[j][k];
                }
            }
        }
        a
    }

    #[test]
    fn test_cholesky_2x2() {
        let a = vec![vec![4.0, 2.0], vec![2.0, 5.0]];
        let l = cholesky(&a).unwrap();

        assert!((l[0][0] - 2.0).abs() < 1e-12);
        assert!((l[1][0] - 1.0).abs() < 1e-12);
        assert!((l[1][1] - 2.0).abs() < 1e-12);
        assert!((l[0][1]).abs() < f64::EPSILON, "upper triangle stays zero");
    }

    #[test]
    fn test_cholesky_roundtrip() {
        let a = vec![
            vec![6.0, 3.0, 4.0],
            vec![3.0, 6.0, 5.0],
            vec![4.0, 5.0, 10.0],
        ];
        let l = cholesky(&a).unwrap();
        let back = mat_mul_transpose(&l);

        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (back[i][j] - a[i][j]).abs() < 1e-10,
                    "L·Lᵀ differs from A at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        let result = cholesky(&a);
        assert!(matches!(result, Err(BoError::NumericInstability { .. })));
    }

    #[test]
    fn test_cholesky_singular_saved_by_jitter() {
        // Two identical rows: singular until jitter is applied.
        let mut a = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        assert!(cholesky(&a).is_err());

        add_jitter(&mut a, 1e-6);
        assert!(cholesky(&a).is_ok());
    }

    #[test]
    fn test_solve_cholesky_recovers_solution() {
        let a = vec![
            vec![6.0, 3.0, 4.0],
            vec![3.0, 6.0, 5.0],
            vec![4.0, 5.0, 10.0],
        ];
        let b = vec![1.0, -2.0, 3.0];
        let l = cholesky(&a).unwrap();
        let x = solve_cholesky(&l, &b);

        let ax = mat_vec(&a, &x);
        for i in 0..3 {
            assert!((ax[i] - b[i]).abs() < 1e-8, "(L·Lᵀ)·x differs from b at {i}");
        }
    }

    #[test]
    fn test_solve_lower_then_upper_is_solve_cholesky() {
        let a = vec![vec![4.0, 2.0], vec![2.0, 5.0]];
        let b = vec![1.0, 2.0];
        let l = cholesky(&a).unwrap();

        let y = solve_lower(&l, &b);
        let x = solve_upper(&l, &y);
        assert_eq!(x, solve_cholesky(&l, &b));
    }

    #[test]
    fn test_mat_vec() {
        let a = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let x = vec![5.0, 6.0];
        assert_eq!(mat_vec(&a, &x), vec![17.0, 39.0]);
    }

    #[test]
    fn test_add_jitter_touches_only_diagonal() {
        let mut a = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        add_jitter(&mut a, 0.5);
        assert_eq!(a, vec![vec![1.5, 2.0], vec![3.0, 4.5]]);
    }
}
