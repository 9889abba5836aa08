//! Run configuration with YAML schema and validation.
//!
//! Implements Poka-Yoke (mistake-proofing) through:
//! - Type-safe configuration structs
//! - Compile-time schema via serde (`deny_unknown_fields`)
//! - Runtime semantic validation beyond the schema
//!
//! The serializable [`RunSettings`] load from YAML; strategy objects
//! (kernel, acquisition, optimizer, oracle) are injected programmatically
//! through [`BoConfigBuilder`]. A seed plus identical plugins fully
//! determines a run.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

use crate::domain::Domain;
use crate::engine::sampling::DesignMethod;
use crate::error::{BoError, BoResult};
use crate::plugins::{Acquisition, Kernel, Numerics, Optimizer, Oracle};

/// Initial design-of-experiments settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InitialDesign {
    /// Generation method.
    pub method: DesignMethod,
    /// Number of design points evaluated before model-guided search.
    #[validate(range(min = 1))]
    pub n: usize,
}

impl Default for InitialDesign {
    fn default() -> Self {
        Self {
            method: DesignMethod::Lhs,
            n: 5,
        }
    }
}

fn default_jitter() -> f64 {
    1e-6
}

fn default_seed() -> u64 {
    42
}

/// Serializable run settings.
///
/// Everything here is plain data; see [`BoConfig`] for the full
/// configuration including strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RunSettings {
    /// Initial design settings.
    #[serde(default)]
    #[validate(nested)]
    pub initial_design: InitialDesign,

    /// Maximum total oracle evaluations.
    #[validate(range(min = 1))]
    pub budget: usize,

    /// Assumed observation noise standard deviation.
    #[serde(default)]
    pub noise: f64,

    /// Diagonal stabilizer added to every covariance matrix.
    #[serde(default = "default_jitter")]
    pub jitter: f64,

    /// RNG seed — fully determines all stochastic behavior given
    /// identical plugins.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Numeric tolerances passed to every plugin call.
    #[serde(default)]
    pub numerics: Numerics,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            initial_design: InitialDesign::default(),
            budget: 30,
            noise: 0.0,
            jitter: default_jitter(),
            seed: default_seed(),
            numerics: Numerics::default(),
        }
    }
}

impl RunSettings {
    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> BoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> BoResult<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;

        // Poka-Yoke: validate all constraints.
        settings.validate()?;
        settings.validate_semantic()?;

        Ok(settings)
    }

    /// Validate semantic constraints beyond the schema.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a constraint is violated.
    pub fn validate_semantic(&self) -> BoResult<()> {
        if self.budget < self.initial_design.n {
            return Err(BoError::config(format!(
                "Budget {} cannot be smaller than the initial design size {}",
                self.budget, self.initial_design.n
            )));
        }

        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(BoError::config(format!(
                "Observation noise must be finite and non-negative, got {}",
                self.noise
            )));
        }

        if !self.jitter.is_finite() || self.jitter <= 0.0 {
            return Err(BoError::config(format!(
                "Jitter must be finite and positive, got {}",
                self.jitter
            )));
        }

        Ok(())
    }
}

/// Full run configuration: settings plus injected strategies.
pub struct BoConfig {
    /// Search space.
    pub domain: Domain,
    /// Serializable settings.
    pub settings: RunSettings,
    /// Covariance model.
    pub kernel: Arc<dyn Kernel>,
    /// Point-selection heuristic.
    pub acquisition: Arc<dyn Acquisition>,
    /// Candidate-search strategy.
    pub optimizer: Arc<dyn Optimizer>,
    /// The black-box objective.
    pub oracle: Box<dyn Oracle>,
}

impl BoConfig {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> BoConfigBuilder {
        BoConfigBuilder::default()
    }
}

/// Builder for [`BoConfig`].
///
/// Strategies are injected fully formed; the domain defaults to the
/// oracle's when not provided explicitly.
#[derive(Default)]
pub struct BoConfigBuilder {
    domain: Option<Domain>,
    settings: Option<RunSettings>,
    kernel: Option<Arc<dyn Kernel>>,
    acquisition: Option<Arc<dyn Acquisition>>,
    optimizer: Option<Arc<dyn Optimizer>>,
    oracle: Option<Box<dyn Oracle>>,
}

impl BoConfigBuilder {
    /// Set the search space explicitly (defaults to the oracle's domain).
    #[must_use]
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Set the run settings (defaults to [`RunSettings::default`]).
    #[must_use]
    pub fn settings(mut self, settings: RunSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Inject the covariance model.
    #[must_use]
    pub fn kernel(mut self, kernel: impl Kernel + 'static) -> Self {
        self.kernel = Some(Arc::new(kernel));
        self
    }

    /// Inject the point-selection heuristic.
    #[must_use]
    pub fn acquisition(mut self, acquisition: impl Acquisition + 'static) -> Self {
        self.acquisition = Some(Arc::new(acquisition));
        self
    }

    /// Inject the candidate-search strategy.
    #[must_use]
    pub fn optimizer(mut self, optimizer: impl Optimizer + 'static) -> Self {
        self.optimizer = Some(Arc::new(optimizer));
        self
    }

    /// Inject the black-box objective.
    #[must_use]
    pub fn oracle(mut self, oracle: impl Oracle + 'static) -> Self {
        self.oracle = Some(Box::new(oracle));
        self
    }

    /// Build the configuration, failing fast on missing strategies or
    /// invalid settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a strategy is missing or the
    /// settings are invalid.
    pub fn build(self) -> BoResult<BoConfig> {
        let oracle = self
            .oracle
            .ok_or_else(|| BoError::config("Missing oracle strategy"))?;
        let kernel = self
            .kernel
            .ok_or_else(|| BoError::config("Missing kernel strategy"))?;
        let acquisition = self
            .acquisition
            .ok_or_else(|| BoError::config("Missing acquisition strategy"))?;
        let optimizer = self
            .optimizer
            .ok_or_else(|| BoError::config("Missing optimizer strategy"))?;

        let settings = self.settings.unwrap_or_default();
        settings.validate()?;
        settings.validate_semantic()?;

        let domain = self.domain.unwrap_or_else(|| oracle.domain());

        Ok(BoConfig {
            domain,
            settings,
            kernel,
            acquisition,
            optimizer,
            oracle,
        })
    }
}
