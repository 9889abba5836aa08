//! Gaussian Process surrogate model.
//!
//! Fits a zero-mean GP to the current dataset via Cholesky factorization
//! of `K(X, X) + σ²·I + jitter·I` and answers mean/variance queries at
//! test points. The factor `L` and coefficient vector `alpha` are
//! derived state: recomputed from scratch on every fit, never persisted.
//!
//! With an empty dataset the model falls back to the prior: zero mean,
//! variance equal to the kernel diagonal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::domain::{Domain, Point};
use crate::error::BoResult;
use crate::math::{add_jitter, cholesky, mat_vec, solve_cholesky, solve_lower};
use crate::plugins::Kernel;

/// Read-only view of a fitted surrogate, as consumed by acquisitions.
pub trait Posterior {
    /// Posterior mean at each test point (zero vector when unfitted).
    fn mean(&self, x_star: &[Point]) -> Vec<f64>;

    /// Posterior variance at each test point, clamped to `≥ 0`.
    fn variance(&self, x_star: &[Point]) -> Vec<f64>;

    /// Minimum observed value, `+∞` when no observations exist
    /// (minimization convention).
    fn best_observation(&self) -> f64;

    /// Assumed observation noise standard deviation.
    fn noise(&self) -> f64;

    /// Search space the posterior is defined over.
    fn domain(&self) -> &Domain;

    /// Diagnostic information.
    fn info(&self) -> PosteriorInfo;
}

/// Surrogate diagnostics for alerting and display — never used for
/// correctness decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorInfo {
    /// Kernel lengthscales, when the kernel exposes them.
    pub lengthscales: Option<Vec<f64>>,
    /// Assumed observation noise standard deviation.
    pub noise: f64,
    /// Coarse condition-number estimate of the covariance matrix:
    /// `(max|L_ii| / min|L_ii|)²`. Absent when unfitted.
    pub conditioning: Option<f64>,
}

/// Gaussian Process configuration.
#[derive(Clone)]
pub struct GpConfig {
    /// Covariance model.
    pub kernel: Arc<dyn Kernel>,
    /// Assumed observation noise standard deviation.
    pub noise: f64,
    /// Diagonal stabilizer.
    pub jitter: f64,
    /// Search space.
    pub domain: Domain,
}

/// Gaussian Process surrogate.
pub struct GaussianProcess {
    dataset: Dataset,
    config: GpConfig,
    /// Cholesky factor of the regularized covariance matrix.
    l: Option<Vec<Vec<f64>>>,
    /// Cached solution of `L·Lᵀ·alpha = y`.
    alpha: Option<Vec<f64>>,
}

impl GaussianProcess {
    /// Fit a GP to the dataset. An empty dataset yields the prior model.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BoError::NumericInstability`] when the
    /// regularized covariance is not positive definite.
    pub fn fit(dataset: Dataset, config: GpConfig) -> BoResult<Self> {
        let mut gp = Self {
            dataset,
            config,
            l: None,
            alpha: None,
        };
        gp.refit()?;
        Ok(gp)
    }

    /// Recompute `L` and `alpha` from the current dataset.
    fn refit(&mut self) -> BoResult<()> {
        let n = self.dataset.len();
        if n == 0 {
            self.l = None;
            self.alpha = None;
            return Ok(());
        }

        let x = self.dataset.x();
        let mut k = self.config.kernel.cov(x, x);

        // Observation noise on the diagonal: per-point when the dataset
        // reports it, the assumed global level otherwise.
        match self.dataset.noise() {
            Some(track) => {
                for i in 0..n {
                    k[i][i] += track[i] * track[i];
                }
            }
            None => {
                let noise_var = self.config.noise * self.config.noise;
                for i in 0..n {
                    k[i][i] += noise_var;
                }
            }
        }

        add_jitter(&mut k, self.config.jitter);

        let l = cholesky(&k)?;
        self.alpha = Some(solve_cholesky(&l, self.dataset.y()));
        self.l = Some(l);

        Ok(())
    }

    /// Append one observation and re-fit.
    ///
    /// A rank-one update would be cheaper; the full re-fit keeps the
    /// observable behavior identical and the code small.
    ///
    /// # Errors
    ///
    /// Propagates factorization failure from the re-fit.
    pub fn update(&mut self, x: Point, y: f64) -> BoResult<()> {
        self.dataset.push(x, y, None);
        self.refit()
    }

    /// Number of observations the model is fitted to.
    #[must_use]
    pub fn n_observations(&self) -> usize {
        self.dataset.len()
    }

    fn estimate_conditioning(&self) -> Option<f64> {
        let l = self.l.as_ref()?;
        let diag: Vec<f64> = l
            .iter()
            .enumerate()
            .map(|(i, row)| row[i].abs())
            .filter(|v| *v > 0.0)
            .collect();

        if diag.is_empty() {
            return None;
        }

        let max = diag.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = diag.iter().copied().fold(f64::INFINITY, f64::min);
        Some((max / min).powi(2))
    }
}

impl Posterior for GaussianProcess {
    fn mean(&self, x_star: &[Point]) -> Vec<f64> {
        let Some(alpha) = &self.alpha else {
            return vec![0.0; x_star.len()];
        };

        let k_star = self.config.kernel.cov(x_star, self.dataset.x());
        mat_vec(&k_star, alpha)
    }

    fn variance(&self, x_star: &[Point]) -> Vec<f64> {
        let prior = self.config.kernel.diag(x_star);
        let Some(l) = &self.l else {
            return prior;
        };

        let k_star = self.config.kernel.cov(x_star, self.dataset.x());

        k_star
            .iter()
            .zip(prior)
            .map(|(row, prior_var)| {
                let v = solve_lower(l, row);
                let reduction: f64 = v.iter().map(|vi| vi * vi).sum();
                (prior_var - reduction).max(0.0)
            })
            .collect()
    }

    fn best_observation(&self) -> f64 {
        self.dataset.best().map_or(f64::INFINITY, |(_, y)| y)
    }

    fn noise(&self) -> f64 {
        self.config.noise
    }

    fn domain(&self) -> &Domain {
        &self.config.domain
    }

    fn info(&self) -> PosteriorInfo {
        PosteriorInfo {
            lengthscales: self.config.kernel.lengthscales(),
            noise: self.config.noise,
            conditioning: self.estimate_conditioning(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::Dimension;
    use crate::plugins::kernels::RbfKernel;

    fn unit_domain() -> Domain {
        Domain::new(vec![Dimension::continuous(-10.0, 10.0)])
    }

    fn config(noise: f64, jitter: f64) -> GpConfig {
        GpConfig {
            kernel: Arc::new(RbfKernel::new(1.0, 1.0)),
            noise,
            jitter,
            domain: unit_domain(),
        }
    }

    fn dataset(pairs: &[(f64, f64)]) -> Dataset {
        let mut ds = Dataset::new();
        for &(x, y) in pairs {
            ds.push(vec![x], y, None);
        }
        ds
    }

    #[test]
    fn test_prior_mean_and_variance() {
        let gp = GaussianProcess::fit(Dataset::new(), config(0.0, 1e-10)).unwrap();

        let x_star = vec![vec![0.5], vec![-3.0]];
        assert_eq!(gp.mean(&x_star), vec![0.0, 0.0]);

        // Prior variance equals the kernel diagonal.
        let var = gp.variance(&x_star);
        assert!((var[0] - 1.0).abs() < 1e-12);
        assert!((var[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_prior_best_observation_is_infinite() {
        let gp = GaussianProcess::fit(Dataset::new(), config(0.0, 1e-10)).unwrap();
        assert!(gp.best_observation().is_infinite());
    }

    #[test]
    fn test_posterior_interpolates_observations() {
        let ds = dataset(&[(0.0, 0.0), (1.0, 1.0)]);
        let gp = GaussianProcess::fit(ds, config(0.0, 1e-10)).unwrap();

        let mu = gp.mean(&[vec![0.0], vec![1.0]]);
        assert!((mu[0] - 0.0).abs() < 1e-4);
        assert!((mu[1] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_posterior_variance_vanishes_at_observations() {
        let ds = dataset(&[(0.0, 0.5)]);
        let gp = GaussianProcess::fit(ds, config(0.0, 1e-12)).unwrap();

        let var = gp.variance(&[vec![0.0]]);
        assert!(var[0] >= 0.0);
        assert!(var[0] < 1e-8, "variance at observed point: {}", var[0]);
    }

    #[test]
    fn test_variance_grows_away_from_data() {
        let ds = dataset(&[(0.0, 0.0)]);
        let gp = GaussianProcess::fit(ds, config(0.0, 1e-10)).unwrap();

        let var = gp.variance(&[vec![0.0], vec![5.0]]);
        assert!(var[0] < var[1], "variance should grow away from data");
    }

    #[test]
    fn test_best_observation_is_minimum() {
        let ds = dataset(&[(0.0, 3.0), (1.0, -1.5), (2.0, 2.0)]);
        let gp = GaussianProcess::fit(ds, config(0.0, 1e-10)).unwrap();
        assert!((gp.best_observation() - (-1.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_refits() {
        let ds = dataset(&[(0.0, 1.0)]);
        let mut gp = GaussianProcess::fit(ds, config(0.0, 1e-10)).unwrap();
        assert_eq!(gp.n_observations(), 1);

        gp.update(vec![2.0], -2.0).unwrap();
        assert_eq!(gp.n_observations(), 2);
        assert!((gp.best_observation() - (-2.0)).abs() < f64::EPSILON);

        // The new observation is interpolated after the re-fit.
        let mu = gp.mean(&[vec![2.0]]);
        assert!((mu[0] - (-2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_info_reports_diagnostics() {
        let ds = dataset(&[(0.0, 0.0), (1.0, 1.0)]);
        let gp = GaussianProcess::fit(ds, config(0.1, 1e-8)).unwrap();

        let info = gp.info();
        assert_eq!(info.lengthscales, Some(vec![1.0]));
        assert!((info.noise - 0.1).abs() < f64::EPSILON);
        let conditioning = info.conditioning.unwrap();
        assert!(conditioning >= 1.0);
    }

    #[test]
    fn test_info_unfitted_has_no_conditioning() {
        let gp = GaussianProcess::fit(Dataset::new(), config(0.0, 1e-10)).unwrap();
        assert!(gp.info().conditioning.is_none());
    }

    #[test]
    fn test_duplicate_points_survive_with_jitter() {
        let ds = dataset(&[(1.0, 2.0), (1.0, 2.0)]);
        let gp = GaussianProcess::fit(ds, config(0.0, 1e-6));
        assert!(gp.is_ok(), "jitter must regularize duplicate observations");
    }

    #[test]
    fn test_per_point_noise_overrides_global() {
        let mut ds = Dataset::new();
        ds.push(vec![0.0], 1.0, Some(0.5));
        ds.push(vec![1.0], 2.0, Some(0.0));
        let gp = GaussianProcess::fit(ds, config(0.0, 1e-10)).unwrap();

        // The noisy observation keeps residual variance; the exact one
        // collapses toward zero.
        let var = gp.variance(&[vec![0.0], vec![1.0]]);
        assert!(var[0] > var[1]);
    }

    #[test]
    fn test_noise_accessor_and_domain() {
        let gp = GaussianProcess::fit(Dataset::new(), config(0.25, 1e-10)).unwrap();
        assert!((gp.noise() - 0.25).abs() < f64::EPSILON);
        assert_eq!(gp.domain().dimensionality(), 1);
    }
}
