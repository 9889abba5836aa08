//! Reference oracles: the Branin test function and a closure adapter.

use crate::domain::{Dimension, Domain, Point};
use crate::engine::rng::SeededRng;
use crate::error::{BoError, BoResult};
use crate::plugins::{
    Evaluation, Oracle, ParameterBounds, ParameterSchema, ParameterType, PluginKind,
    PluginManifest,
};

/// Relative noise level applied when a noisy Branin oracle is requested.
const BRANIN_RELATIVE_NOISE: f64 = 0.1;

/// Branin function oracle — the classic 2D benchmark with three global
/// minima of value ≈ 0.397887, on `[-5, 10] × [0, 15]`.
///
/// `f(x₁, x₂) = a(x₂ − b·x₁² + c·x₁ − r)² + s(1 − t)·cos(x₁) + s`
/// with `a = 1`, `b = 5.1/(4π²)`, `c = 5/π`, `r = 6`, `s = 10`,
/// `t = 1/(8π)`.
#[derive(Debug, Clone)]
pub struct BraninOracle {
    /// Noise generator; noiseless when absent.
    noise_rng: Option<SeededRng>,
}

impl BraninOracle {
    /// Noiseless Branin oracle.
    #[must_use]
    pub const fn new() -> Self {
        Self { noise_rng: None }
    }

    /// Branin oracle with 10% relative observation noise drawn from a
    /// dedicated seeded stream.
    #[must_use]
    pub const fn with_noise(seed: u64) -> Self {
        Self {
            noise_rng: Some(SeededRng::new(seed)),
        }
    }

    /// The noiseless Branin value at a point.
    #[must_use]
    pub fn value(x1: f64, x2: f64) -> f64 {
        use std::f64::consts::PI;

        let a = 1.0;
        let b = 5.1 / (4.0 * PI * PI);
        let c = 5.0 / PI;
        let r = 6.0;
        let s = 10.0;
        let t = 1.0 / (8.0 * PI);

        let term1 = a * (x2 - b * x1 * x1 + c * x1 - r).powi(2);
        let term2 = s * (1.0 - t) * x1.cos();
        term1 + term2 + s
    }

    /// One of the three global minima (all share f ≈ 0.397887).
    #[must_use]
    pub fn true_optimum() -> (Point, f64) {
        (vec![-std::f64::consts::PI, 12.275], 0.397_887)
    }
}

impl Default for BraninOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for BraninOracle {
    fn evaluate(&mut self, points: &[Point]) -> BoResult<Vec<Evaluation>> {
        points
            .iter()
            .map(|point| {
                if point.len() < 2 {
                    return Err(BoError::oracle("Branin function requires 2D input"));
                }

                let value = Self::value(point[0], point[1]);
                match &mut self.noise_rng {
                    Some(rng) => {
                        let noise_std = BRANIN_RELATIVE_NOISE * value;
                        let y = value + (rng.next() - 0.5) * 2.0 * noise_std;
                        Ok(Evaluation {
                            y,
                            noise_std: Some(noise_std),
                        })
                    }
                    None => Ok(Evaluation {
                        y: value,
                        noise_std: None,
                    }),
                }
            })
            .collect()
    }

    fn domain(&self) -> Domain {
        Domain::new(vec![
            Dimension::continuous(-5.0, 10.0),
            Dimension::continuous(0.0, 15.0),
        ])
    }

    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            kind: PluginKind::Oracle,
            name: "branin".to_string(),
            label: "Branin Function".to_string(),
            version: "1.0.0".to_string(),
            description: "2D benchmark with three global minima".to_string(),
            parameters: vec![ParameterSchema {
                key: "with-noise".to_string(),
                label: "Relative observation noise".to_string(),
                parameter_type: ParameterType::Boolean,
                default: serde_json::json!(false),
                bounds: Some(ParameterBounds { min: 0.0, max: 1.0 }),
                choices: None,
            }],
            deterministic: true,
        }
    }
}

/// Closure adapter: wraps any deterministic objective function and a
/// domain as an [`Oracle`].
pub struct FnOracle {
    domain: Domain,
    f: Box<dyn FnMut(&[f64]) -> f64 + Send>,
}

impl FnOracle {
    /// Wrap an objective function over the given domain.
    pub fn new(domain: Domain, f: impl FnMut(&[f64]) -> f64 + Send + 'static) -> Self {
        Self {
            domain,
            f: Box::new(f),
        }
    }
}

impl std::fmt::Debug for FnOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOracle")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

impl Oracle for FnOracle {
    fn evaluate(&mut self, points: &[Point]) -> BoResult<Vec<Evaluation>> {
        Ok(points
            .iter()
            .map(|point| Evaluation {
                y: (self.f)(point),
                noise_std: None,
            })
            .collect())
    }

    fn domain(&self) -> Domain {
        self.domain.clone()
    }

    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            kind: PluginKind::Oracle,
            name: "fn-oracle".to_string(),
            label: "Closure Oracle".to_string(),
            version: "1.0.0".to_string(),
            description: "Adapter around a user-supplied objective".to_string(),
            parameters: Vec::new(),
            deterministic: true,
        }
    }
}
