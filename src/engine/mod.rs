//! Core optimization engine.
//!
//! Implements the step-wise Bayesian optimization loop with:
//! - Deterministic RNG (a seeded LCG, the sole entropy source)
//! - Initial design generation (LHS, simplified Sobol, random)
//! - The fit/ask/evaluate/tell state machine
//! - An auditable, exportable decision trace

pub mod events;
pub mod rng;
pub mod runner;
pub mod sampling;

pub use events::{EventRecord, RunEvent, RunTrace, StopReason};
pub use rng::SeededRng;
pub use runner::{BoRunner, RunStateSnapshot, StepOutcome};
pub use sampling::DesignMethod;
