//! Reference candidate-search strategy: multi-start local search.
//!
//! Draws random start points from the domain, runs bounded fixed-step
//! coordinate descent on the acquisition surface from each, and returns
//! the top-scoring local optima. Ties keep the earlier start (stable
//! sort), so evaluation order breaks them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::domain::{Dimension, Domain, Point};
use crate::engine::rng::SeededRng;
use crate::engine::sampling::uniform_random;
use crate::plugins::{
    AcquisitionScorer, Optimizer, OptimizerState, ParameterBounds, ParameterSchema, ParameterType,
    PluginKind, PluginManifest, RunContext,
};

/// Multi-start coordinate-descent optimizer.
///
/// Stateless between steps: `initialize` returns a unit state and `tell`
/// is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiStartOptimizer {
    /// Number of random restarts per proposal.
    pub restarts: usize,
    /// Coordinate-descent iterations per restart.
    pub max_iterations: usize,
    /// Fixed per-dimension step, in raw domain units.
    pub step_size: f64,
}

impl MultiStartOptimizer {
    /// Default fixed step, in raw domain units.
    pub const DEFAULT_STEP_SIZE: f64 = 0.1;

    /// Create an optimizer with the given restarts and iteration bound.
    #[must_use]
    pub const fn new(restarts: usize, max_iterations: usize) -> Self {
        Self {
            restarts,
            max_iterations,
            step_size: Self::DEFAULT_STEP_SIZE,
        }
    }

    /// Override the coordinate-descent step size.
    #[must_use]
    pub const fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Fixed-step coordinate descent from `start` on the scorer surface.
    ///
    /// Tries ± one step per dimension, keeps improving moves, clamps to
    /// bounds, and rounds integer dimensions.
    fn local_search(&self, start: Point, scorer: &AcquisitionScorer, domain: &Domain) -> Point {
        let mut current = start;

        for _ in 0..self.max_iterations {
            let current_score = scorer(&[current.clone()])[0];

            for (d, dim) in domain.dimensions.iter().enumerate() {
                let (min, max) = dim.bounds();
                let is_integer = matches!(dim, Dimension::Integer { .. });

                let mut forward = current.clone();
                forward[d] = (current[d] + self.step_size).min(max);
                if is_integer {
                    forward[d] = forward[d].round();
                }
                forward[d] = forward[d].clamp(min, max);

                if scorer(&[forward.clone()])[0] > current_score {
                    current = forward;
                    continue;
                }

                let mut backward = current.clone();
                backward[d] = (current[d] - self.step_size).max(min);
                if is_integer {
                    backward[d] = backward[d].round();
                }
                backward[d] = backward[d].clamp(min, max);

                if scorer(&[backward.clone()])[0] > current_score {
                    current = backward;
                }
            }
        }

        current
    }
}

impl Optimizer for MultiStartOptimizer {
    fn initialize(
        &self,
        _dataset: &Dataset,
        _domain: &Domain,
        _ctx: &RunContext,
        _rng: &mut SeededRng,
    ) -> OptimizerState {
        Box::new(())
    }

    fn ask(
        &self,
        k: usize,
        scorer: &AcquisitionScorer,
        domain: &Domain,
        _ctx: &RunContext,
        rng: &mut SeededRng,
        _state: &mut OptimizerState,
    ) -> Vec<Point> {
        let starts = uniform_random(domain, self.restarts, rng);

        let mut scored: Vec<(Point, f64)> = starts
            .into_iter()
            .map(|start| {
                let optimum = self.local_search(start, scorer, domain);
                let score = scorer(&[optimum.clone()])[0];
                (optimum, score)
            })
            .collect();

        // Stable sort: ties keep discovery order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.into_iter().take(k).map(|(x, _)| x).collect()
    }

    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            kind: PluginKind::Optimizer,
            name: "multi-start".to_string(),
            label: "Multi-Start Local Search".to_string(),
            version: "1.0.0".to_string(),
            description: "Random restarts with fixed-step coordinate descent".to_string(),
            parameters: vec![
                ParameterSchema {
                    key: "restarts".to_string(),
                    label: "Restarts".to_string(),
                    parameter_type: ParameterType::Integer,
                    default: serde_json::json!(10),
                    bounds: Some(ParameterBounds {
                        min: 1.0,
                        max: 100.0,
                    }),
                    choices: None,
                },
                ParameterSchema {
                    key: "max-iterations".to_string(),
                    label: "Iterations per restart".to_string(),
                    parameter_type: ParameterType::Integer,
                    default: serde_json::json!(50),
                    bounds: Some(ParameterBounds {
                        min: 1.0,
                        max: 1000.0,
                    }),
                    choices: None,
                },
            ],
            deterministic: true,
        }
    }
}
