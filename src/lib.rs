//! # optimizar
//!
//! Sample-efficient Bayesian optimization for expensive black-box objectives.
//!
//! A reproducible optimization engine implementing:
//! - Gaussian Process surrogate with Cholesky-based fit and inference
//! - Pluggable kernel / acquisition / optimizer / oracle strategies
//! - Deterministic runs from a single seed (Poka-Yoke: no hidden entropy)
//! - A step-wise runner that behaves identically driven step-by-step or
//!   run to completion
//!
//! ## Example
//!
//! ```rust
//! use optimizar::prelude::*;
//! use optimizar::config::InitialDesign;
//! use optimizar::engine::sampling::DesignMethod;
//! use optimizar::plugins::oracles::BraninOracle;
//! use optimizar::plugins::kernels::RbfKernel;
//! use optimizar::plugins::acquisitions::ExpectedImprovement;
//! use optimizar::plugins::optimizers::MultiStartOptimizer;
//!
//! let config = BoConfig::builder()
//!     .oracle(BraninOracle::new())
//!     .kernel(RbfKernel::new(1.0, 1.0))
//!     .acquisition(ExpectedImprovement::new(0.01))
//!     .optimizer(MultiStartOptimizer::new(3, 10))
//!     .settings(RunSettings {
//!         initial_design: InitialDesign { method: DesignMethod::Lhs, n: 3 },
//!         budget: 8,
//!         ..RunSettings::default()
//!     })
//!     .build()
//!     .expect("valid configuration");
//!
//! let mut runner = BoRunner::new(config).expect("runner construction");
//! let final_state = runner.run().expect("run to completion");
//! assert_eq!(final_state.dataset.len(), 8);
//! assert!(final_state.best_so_far.is_finite());
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Manual Horner's method is intentional
    clippy::imprecise_flops,   // Numerical code choices are intentional
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
)]

pub mod config;
pub mod dataset;
pub mod domain;
pub mod engine;
pub mod error;
pub mod gp;
pub mod math;
pub mod plugins;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{BoConfig, BoConfigBuilder, RunSettings};
    pub use crate::dataset::{Dataset, Observation};
    pub use crate::domain::{Dimension, Domain, Point};
    pub use crate::engine::rng::SeededRng;
    pub use crate::engine::runner::{BoRunner, RunStateSnapshot, StepOutcome, StopReason};
    pub use crate::error::{BoError, BoResult};
    pub use crate::gp::{GaussianProcess, Posterior, PosteriorInfo};
}

/// Re-export for public API
pub use error::{BoError, BoResult};
