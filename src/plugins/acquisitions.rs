//! Acquisition strategies: Expected Improvement (reference), Upper
//! Confidence Bound, and Probability of Improvement.
//!
//! Scores are comparable within one posterior only; higher means more
//! promising to evaluate next. The normal CDF uses an erf approximation
//! accurate to ~1e-7 — good enough for ranking candidates, not for
//! certified probability values.

use serde::{Deserialize, Serialize};

use crate::domain::Point;
use crate::gp::Posterior;
use crate::plugins::{
    Acquisition, ParameterBounds, ParameterSchema, ParameterType, PluginKind, PluginManifest,
    RunContext,
};

/// Below this standard deviation a candidate is treated as fully
/// determined and scored zero (avoids division by ~0).
const SIGMA_FLOOR: f64 = 1e-10;

/// Standard normal PDF `φ(z)`.
fn normal_pdf(z: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7; // 1 / sqrt(2π)
    INV_SQRT_2PI * (-0.5 * z * z).exp()
}

/// Standard normal CDF `Φ(z)` via the Abramowitz-Stegun erf approximation.
fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Error function approximation (Abramowitz and Stegun 7.1.26).
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// Expected Improvement.
///
/// `EI(x) = σ(x) · [z·Φ(z) + φ(z)]` with
/// `z = (μ(x) − f* − ξ) / σ(x)`, where `f*` is the best observation and
/// `ξ` an exploration margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedImprovement {
    /// Exploration margin added to the incumbent.
    pub xi: f64,
}

impl ExpectedImprovement {
    /// Create EI with the given exploration margin.
    #[must_use]
    pub const fn new(xi: f64) -> Self {
        Self { xi }
    }
}

impl Default for ExpectedImprovement {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl Acquisition for ExpectedImprovement {
    fn score(&self, candidates: &[Point], posterior: &dyn Posterior, _ctx: &RunContext) -> Vec<f64> {
        let means = posterior.mean(candidates);
        let variances = posterior.variance(candidates);
        let best = posterior.best_observation();

        means
            .iter()
            .zip(variances)
            .map(|(mu, variance)| {
                let sigma = variance.max(0.0).sqrt();
                if sigma < SIGMA_FLOOR {
                    return 0.0;
                }

                let z = (mu - best - self.xi) / sigma;
                sigma * (z * normal_cdf(z) + normal_pdf(z))
            })
            .collect()
    }

    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            kind: PluginKind::Acquisition,
            name: "expected-improvement".to_string(),
            label: "Expected Improvement".to_string(),
            version: "1.0.0".to_string(),
            description: "Improvement expectation with exploration margin xi".to_string(),
            parameters: vec![ParameterSchema {
                key: "xi".to_string(),
                label: "Exploration margin".to_string(),
                parameter_type: ParameterType::Number,
                default: serde_json::json!(0.01),
                bounds: Some(ParameterBounds { min: 0.0, max: 1.0 }),
                choices: None,
            }],
            deterministic: true,
        }
    }
}

/// Upper Confidence Bound (minimization form: `−μ + κ·σ`).
///
/// Tunable exploration through `kappa`; larger values chase uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpperConfidenceBound {
    /// Exploration weight.
    pub kappa: f64,
}

impl UpperConfidenceBound {
    /// Create UCB with the given exploration weight.
    #[must_use]
    pub const fn new(kappa: f64) -> Self {
        Self { kappa }
    }
}

impl Default for UpperConfidenceBound {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Acquisition for UpperConfidenceBound {
    fn score(&self, candidates: &[Point], posterior: &dyn Posterior, _ctx: &RunContext) -> Vec<f64> {
        let means = posterior.mean(candidates);
        let variances = posterior.variance(candidates);

        means
            .iter()
            .zip(variances)
            .map(|(mu, variance)| {
                let sigma = variance.max(0.0).sqrt();
                -mu + self.kappa * sigma
            })
            .collect()
    }

    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            kind: PluginKind::Acquisition,
            name: "ucb".to_string(),
            label: "Upper Confidence Bound".to_string(),
            version: "1.0.0".to_string(),
            description: "Optimism under uncertainty with weight kappa".to_string(),
            parameters: vec![ParameterSchema {
                key: "kappa".to_string(),
                label: "Exploration weight".to_string(),
                parameter_type: ParameterType::Number,
                default: serde_json::json!(2.0),
                bounds: Some(ParameterBounds {
                    min: 0.0,
                    max: 10.0,
                }),
                choices: None,
            }],
            deterministic: true,
        }
    }
}

/// Probability of Improvement — the conservative strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbabilityOfImprovement;

impl Acquisition for ProbabilityOfImprovement {
    fn score(&self, candidates: &[Point], posterior: &dyn Posterior, _ctx: &RunContext) -> Vec<f64> {
        let means = posterior.mean(candidates);
        let variances = posterior.variance(candidates);
        let best = posterior.best_observation();

        means
            .iter()
            .zip(variances)
            .map(|(mu, variance)| {
                let sigma = variance.max(0.0).sqrt();
                if sigma < SIGMA_FLOOR {
                    return if *mu < best { 1.0 } else { 0.0 };
                }

                normal_cdf((best - mu) / sigma)
            })
            .collect()
    }

    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            kind: PluginKind::Acquisition,
            name: "probability-of-improvement".to_string(),
            label: "Probability of Improvement".to_string(),
            version: "1.0.0".to_string(),
            description: "Probability mass below the incumbent".to_string(),
            parameters: Vec::new(),
            deterministic: true,
        }
    }
}
