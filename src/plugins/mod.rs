//! Plugin contracts: the capability seams the runner composes.
//!
//! Four strategy roles — [`Kernel`], [`Acquisition`], [`Optimizer`],
//! [`Oracle`] — are expressed as traits with interchangeable
//! implementations selected at configuration time. The runner depends on
//! the abstractions only; concrete strategies are injected fully formed
//! (their parameters are construction state, not call arguments).
//!
//! Contract notes:
//! - Kernel covariance must be symmetric positive semi-definite whenever
//!   both inputs coincide.
//! - Acquisition scores are "higher is more promising to evaluate next".
//! - An optimizer returning zero candidates tells the runner to stop.
//! - Oracle evaluation blocks until complete; the runner never overlaps
//!   evaluations.
//!
//! [`PluginManifest`] is declarative metadata (name, version, parameter
//! schemas). The engine reads parameter values from it and nothing else;
//! compatibility checking and registry concerns live outside this crate.

pub mod acquisitions;
pub mod kernels;
pub mod optimizers;
pub mod oracles;

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Observation};
use crate::domain::{Domain, Point};
use crate::engine::rng::SeededRng;
use crate::error::BoResult;
use crate::gp::Posterior;

/// Strategy role a plugin fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    /// Covariance model.
    Kernel,
    /// Point-selection heuristic.
    Acquisition,
    /// Candidate-search strategy.
    Optimizer,
    /// Black-box objective.
    Oracle,
}

/// Declared parameter value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Real-valued parameter.
    Number,
    /// Integer parameter.
    Integer,
    /// One-of-a-set parameter.
    Categorical,
    /// On/off parameter.
    Boolean,
}

/// Numeric bounds for a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    /// Smallest admissible value.
    pub min: f64,
    /// Largest admissible value.
    pub max: f64,
}

/// Schema entry for one declared plugin parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Machine-readable key (kebab-case).
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Value type.
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    /// Default value.
    pub default: serde_json::Value,
    /// Numeric bounds, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<ParameterBounds>,
    /// Admissible choices for categorical parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

/// Declarative plugin metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Strategy role.
    pub kind: PluginKind,
    /// Machine-readable name (kebab-case).
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Semantic version.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Declared parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
    /// Whether the strategy is deterministic given the shared RNG.
    pub deterministic: bool,
}

impl PluginManifest {
    /// Minimal manifest for strategies that do not declare one.
    #[must_use]
    pub fn anonymous(kind: PluginKind) -> Self {
        Self {
            kind,
            name: "anonymous".to_string(),
            label: "Anonymous".to_string(),
            version: "0.0.0".to_string(),
            description: String::new(),
            parameters: Vec::new(),
            deterministic: true,
        }
    }
}

/// Numeric tolerances threaded through every plugin call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Numerics {
    /// Diagonal stabilizer added to covariance matrices.
    pub jitter: f64,
    /// Solve tolerance.
    pub tolerance: f64,
    /// Largest acceptable covariance condition number (diagnostic).
    pub max_condition: f64,
}

impl Default for Numerics {
    fn default() -> Self {
        Self {
            jitter: 1e-6,
            tolerance: 1e-6,
            max_condition: 1e12,
        }
    }
}

/// Ephemeral per-step facts, reconstructed for every plugin call.
///
/// The RNG handle travels alongside as `&mut SeededRng` rather than
/// inside the context: the acquisition closure and the optimizer borrow
/// the context simultaneously, and the unique RNG borrow cannot live in
/// a shared context under Rust's aliasing rules.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    /// Current step index.
    pub step: usize,
    /// Total evaluation budget.
    pub budget: usize,
    /// Search space.
    pub domain: &'a Domain,
    /// Numeric tolerances.
    pub numerics: Numerics,
}

/// Acquisition scorer closed over the current posterior.
pub type AcquisitionScorer<'a> = dyn Fn(&[Point]) -> Vec<f64> + 'a;

/// Opaque optimizer-owned state, threaded through `initialize`/`ask`/`tell`.
///
/// The runner never inspects or depends on its shape.
pub type OptimizerState = Box<dyn Any + Send>;

/// Covariance model over the search space.
pub trait Kernel: Send + Sync {
    /// Covariance matrix `K(X, X')`, shape `|X| × |X'|`.
    ///
    /// Must be symmetric positive semi-definite when `X = X'`.
    fn cov(&self, x: &[Point], x_prime: &[Point]) -> Vec<Vec<f64>>;

    /// Diagonal of `K(X, X)` — the prior variance at each point.
    fn diag(&self, x: &[Point]) -> Vec<f64>;

    /// Lengthscale hyperparameters, when the kernel has them (diagnostics).
    fn lengthscales(&self) -> Option<Vec<f64>> {
        None
    }

    /// Declarative metadata.
    fn manifest(&self) -> PluginManifest {
        PluginManifest::anonymous(PluginKind::Kernel)
    }
}

/// Point-selection heuristic scoring candidate locations.
pub trait Acquisition: Send + Sync {
    /// Score each candidate against the posterior; higher is more
    /// promising to evaluate next. Returns one score per candidate.
    fn score(&self, candidates: &[Point], posterior: &dyn Posterior, ctx: &RunContext) -> Vec<f64>;

    /// Declarative metadata.
    fn manifest(&self) -> PluginManifest {
        PluginManifest::anonymous(PluginKind::Acquisition)
    }
}

/// Candidate-search strategy maximizing an acquisition scorer over the
/// domain.
pub trait Optimizer: Send + Sync {
    /// Produce the strategy's opaque state at run start.
    fn initialize(
        &self,
        dataset: &Dataset,
        domain: &Domain,
        ctx: &RunContext,
        rng: &mut SeededRng,
    ) -> OptimizerState;

    /// Propose up to `k` candidate points. Returning an empty vector
    /// signals the runner to terminate the run early.
    fn ask(
        &self,
        k: usize,
        scorer: &AcquisitionScorer,
        domain: &Domain,
        ctx: &RunContext,
        rng: &mut SeededRng,
        state: &mut OptimizerState,
    ) -> Vec<Point>;

    /// Observe a completed evaluation (stateful strategies only).
    fn tell(&self, _observation: &Observation, _state: &mut OptimizerState) {}

    /// Declarative metadata.
    fn manifest(&self) -> PluginManifest {
        PluginManifest::anonymous(PluginKind::Optimizer)
    }
}

/// Result of one oracle evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Observed objective value.
    pub y: f64,
    /// Reported noise standard deviation, if the oracle knows it.
    pub noise_std: Option<f64>,
}

/// The black-box objective being minimized.
pub trait Oracle: Send {
    /// Evaluate the objective at each point, blocking until complete.
    ///
    /// # Errors
    ///
    /// Evaluation failures propagate unchanged to the runner's caller;
    /// the engine never retries.
    fn evaluate(&mut self, points: &[Point]) -> BoResult<Vec<Evaluation>>;

    /// The search space this oracle is defined over.
    fn domain(&self) -> Domain;

    /// Declarative metadata.
    fn manifest(&self) -> PluginManifest {
        PluginManifest::anonymous(PluginKind::Oracle)
    }
}
