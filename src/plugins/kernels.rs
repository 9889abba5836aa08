//! Reference kernel: RBF (squared exponential).

use serde::{Deserialize, Serialize};

use crate::domain::Point;
use crate::plugins::{
    Kernel, ParameterBounds, ParameterSchema, ParameterType, PluginKind, PluginManifest,
};

/// RBF (squared exponential) kernel.
///
/// `k(x, x') = variance · exp(−0.5 · ‖x − x'‖² / lengthscale²)`
///
/// Infinitely smooth similarity; the workhorse covariance for continuous
/// search spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RbfKernel {
    /// Lengthscale (shared across dimensions).
    pub lengthscale: f64,
    /// Signal variance.
    pub variance: f64,
}

impl RbfKernel {
    /// Create an RBF kernel with the given lengthscale and signal variance.
    #[must_use]
    pub const fn new(lengthscale: f64, variance: f64) -> Self {
        Self {
            lengthscale,
            variance,
        }
    }

    fn k(&self, x: &[f64], x_prime: &[f64]) -> f64 {
        let sq_dist: f64 = x
            .iter()
            .zip(x_prime.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();

        self.variance * (-0.5 * sq_dist / (self.lengthscale * self.lengthscale)).exp()
    }
}

impl Default for RbfKernel {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Kernel for RbfKernel {
    fn cov(&self, x: &[Point], x_prime: &[Point]) -> Vec<Vec<f64>> {
        x.iter()
            .map(|xi| x_prime.iter().map(|xj| self.k(xi, xj)).collect())
            .collect()
    }

    fn diag(&self, x: &[Point]) -> Vec<f64> {
        vec![self.variance; x.len()]
    }

    fn lengthscales(&self) -> Option<Vec<f64>> {
        Some(vec![self.lengthscale])
    }

    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            kind: PluginKind::Kernel,
            name: "rbf".to_string(),
            label: "RBF (Squared Exponential)".to_string(),
            version: "1.0.0".to_string(),
            description: "Smooth similarity with a single shared lengthscale".to_string(),
            parameters: vec![
                ParameterSchema {
                    key: "lengthscale".to_string(),
                    label: "Lengthscale".to_string(),
                    parameter_type: ParameterType::Number,
                    default: serde_json::json!(1.0),
                    bounds: Some(ParameterBounds {
                        min: 0.01,
                        max: 10.0,
                    }),
                    choices: None,
                },
                ParameterSchema {
                    key: "variance".to_string(),
                    label: "Signal variance".to_string(),
                    parameter_type: ParameterType::Number,
                    default: serde_json::json!(1.0),
                    bounds: Some(ParameterBounds {
                        min: 0.01,
                        max: 10.0,
                    }),
                    choices: None,
                },
            ],
            deterministic: true,
        }
    }
}
