//! The Bayesian optimization loop.
//!
//! A stateful runner driving: initial design → surrogate fit →
//! acquisition-guided proposal → oracle evaluation → bookkeeping.
//! `NotStarted → InitialDesign → Fitting/Proposing → Done`, with the
//! same observable behavior whether driven one [`BoRunner::step`] at a
//! time or via [`BoRunner::run`].
//!
//! Construction computes the full initial design eagerly; `step()`
//! drains it in order, one evaluation per call — the design is never
//! re-sampled. Once drained, every step fits a fresh Gaussian Process
//! from the accumulated dataset, asks the optimizer for one candidate
//! scored by the acquisition, evaluates it, and updates best-observed
//! bookkeeping.
//!
//! Termination (budget spent, or an empty proposal) is a normal
//! [`StepOutcome`], not an error. Oracle failures propagate unchanged —
//! expensive evaluations are never silently retried.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{BoConfig, RunSettings};
use crate::dataset::{Dataset, Observation};
use crate::domain::{Domain, Point};
use crate::engine::events::{EventRecord, RunEvent, RunTrace};
use crate::engine::rng::SeededRng;
use crate::engine::sampling;
use crate::error::{BoError, BoResult};
use crate::gp::{GaussianProcess, GpConfig, Posterior};
use crate::plugins::{Acquisition, Kernel, Optimizer, OptimizerState, Oracle, RunContext};

pub use crate::engine::events::StopReason;

/// Result of one `step()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More work remains; call `step()` again.
    Continue,
    /// The run is over. Repeated calls keep returning the same outcome.
    Done(StopReason),
}

impl StepOutcome {
    /// True when the run has terminated.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Immutable snapshot of the run state.
///
/// A deep copy: mutating a snapshot never affects the runner. The
/// optimizer's opaque state is not part of the observable surface and is
/// excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStateSnapshot {
    /// Observations in evaluation order.
    pub dataset: Dataset,
    /// Completed step count (= evaluations performed).
    pub step: usize,
    /// Best observed value (`+∞` before the first observation).
    pub best_so_far: f64,
    /// Best observed point (absent before the first observation).
    pub best_x: Option<Point>,
    /// Decision trace so far.
    pub events: Vec<EventRecord>,
}

/// The Bayesian optimization runner.
pub struct BoRunner {
    domain: Domain,
    settings: RunSettings,
    kernel: Arc<dyn Kernel>,
    acquisition: Arc<dyn Acquisition>,
    optimizer: Arc<dyn Optimizer>,
    oracle: Box<dyn Oracle>,
    rng: SeededRng,
    /// Precomputed initial design, drained in order.
    design: Vec<Point>,
    dataset: Dataset,
    step: usize,
    best_so_far: f64,
    best_x: Option<Point>,
    optimizer_state: OptimizerState,
    events: Vec<EventRecord>,
    /// Terminal condition, once reached. Keeps repeated `step()` calls
    /// cheap and stable.
    stop_reason: Option<StopReason>,
}

impl BoRunner {
    /// Construct a runner: validates the domain, precomputes the initial
    /// design, and initializes the optimizer's state.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed domain.
    pub fn new(config: BoConfig) -> BoResult<Self> {
        let BoConfig {
            domain,
            settings,
            kernel,
            acquisition,
            optimizer,
            oracle,
        } = config;

        domain.validate()?;

        let mut rng = SeededRng::new(settings.seed);
        let design = sampling::generate(
            settings.initial_design.method,
            &domain,
            settings.initial_design.n,
            &mut rng,
        );

        let dataset = Dataset::new();
        let numerics = settings.numerics;
        let ctx = RunContext {
            step: 0,
            budget: settings.budget,
            domain: &domain,
            numerics,
        };
        let optimizer_state = optimizer.initialize(&dataset, &domain, &ctx, &mut rng);

        let mut runner = Self {
            domain,
            settings,
            kernel,
            acquisition,
            optimizer,
            oracle,
            rng,
            design,
            dataset,
            step: 0,
            best_so_far: f64::INFINITY,
            best_x: None,
            optimizer_state,
            events: Vec::new(),
            stop_reason: None,
        };

        runner.push_event(RunEvent::InitRun {
            seed: runner.settings.seed,
            design_size: runner.design.len(),
            budget: runner.settings.budget,
        });

        Ok(runner)
    }

    /// Perform one unit of work.
    ///
    /// During the initial design phase each call evaluates the next
    /// unevaluated design point; afterwards each call performs exactly
    /// one fit + propose + evaluate.
    ///
    /// # Errors
    ///
    /// Validation and plugin-contract violations fail fast; oracle
    /// failures propagate unchanged.
    pub fn step(&mut self) -> BoResult<StepOutcome> {
        if let Some(reason) = self.stop_reason {
            return Ok(StepOutcome::Done(reason));
        }
        if self.step >= self.settings.budget {
            return Ok(self.finish(StopReason::BudgetExhausted));
        }

        // Initial design phase: drain the precomputed design in order.
        if self.dataset.len() < self.design.len() {
            let x = self.design[self.dataset.len()].clone();
            self.evaluate_and_record(x)?;
            self.step += 1;
            return Ok(StepOutcome::Continue);
        }

        // Steady state: fit a fresh surrogate from the current dataset.
        let gp = GaussianProcess::fit(
            self.dataset.clone(),
            GpConfig {
                kernel: Arc::clone(&self.kernel),
                noise: self.settings.noise,
                jitter: self.settings.jitter,
                domain: self.domain.clone(),
            },
        )?;
        self.push_event(RunEvent::FitSurrogate {
            kernel: self.kernel.manifest().name,
            noise: self.settings.noise,
            conditioning: gp.info().conditioning,
        });

        // Ask the optimizer for one candidate, scored against this posterior.
        let numerics = self.settings.numerics;
        let ctx = RunContext {
            step: self.step,
            budget: self.settings.budget,
            domain: &self.domain,
            numerics,
        };
        let acquisition = Arc::clone(&self.acquisition);
        let scorer = move |candidates: &[Point]| acquisition.score(candidates, &gp, &ctx);

        let optimizer = Arc::clone(&self.optimizer);
        let candidates = optimizer.ask(
            1,
            &scorer,
            &self.domain,
            &ctx,
            &mut self.rng,
            &mut self.optimizer_state,
        );
        drop(scorer);

        self.push_event(RunEvent::Ask {
            acquisition: self.acquisition.manifest().name,
            optimizer: self.optimizer.manifest().name,
            candidates: candidates.clone(),
        });

        let Some(candidate) = candidates.into_iter().next() else {
            return Ok(self.finish(StopReason::NoCandidateProposed));
        };

        if candidate.len() != self.domain.dimensionality() {
            return Err(BoError::plugin_contract(
                self.optimizer.manifest().name,
                format!(
                    "candidate has {} dimensions, expected {}",
                    candidate.len(),
                    self.domain.dimensionality()
                ),
            ));
        }
        self.domain.validate_point(&candidate)?;

        let observation = self.evaluate_and_record(candidate)?;

        self.optimizer.tell(&observation, &mut self.optimizer_state);
        self.push_event(RunEvent::Tell {
            dataset_size: self.dataset.len(),
        });

        self.step += 1;
        Ok(StepOutcome::Continue)
    }

    /// Run to completion and return the terminal state.
    ///
    /// # Errors
    ///
    /// Propagates the first `step()` failure.
    pub fn run(&mut self) -> BoResult<RunStateSnapshot> {
        loop {
            if self.step()?.is_done() {
                return Ok(self.state());
            }
        }
    }

    /// Immutable snapshot of the current run state (deep copy).
    #[must_use]
    pub fn state(&self) -> RunStateSnapshot {
        RunStateSnapshot {
            dataset: self.dataset.clone(),
            step: self.step,
            best_so_far: self.best_so_far,
            best_x: self.best_x.clone(),
            events: self.events.clone(),
        }
    }

    /// Completed step count.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.step
    }

    /// Best observed value so far (`+∞` before the first observation).
    #[must_use]
    pub const fn best_so_far(&self) -> f64 {
        self.best_so_far
    }

    /// True once a terminal outcome has been returned.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.stop_reason.is_some()
    }

    /// The decision trace so far.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Export the decision trace for audit or replay.
    pub fn trace(&self) -> RunTrace {
        RunTrace::new(self.events.clone())
    }

    /// Append a free-form annotation to the decision trace.
    pub fn annotate(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.push_event(RunEvent::Annotation { note });
    }

    /// Evaluate one point via the oracle, record the event, append to
    /// the dataset, and advance best-observed bookkeeping.
    fn evaluate_and_record(&mut self, x: Point) -> BoResult<Observation> {
        let evaluations = self.oracle.evaluate(std::slice::from_ref(&x))?;
        let Some(evaluation) = evaluations.into_iter().next() else {
            return Err(BoError::plugin_contract(
                self.oracle.manifest().name,
                "oracle returned no evaluation for a single-point request",
            ));
        };

        self.push_event(RunEvent::Eval {
            oracle: self.oracle.manifest().name,
            x: x.clone(),
            y: evaluation.y,
            noise_std: evaluation.noise_std,
        });

        self.dataset.push(x.clone(), evaluation.y, evaluation.noise_std);

        if evaluation.y < self.best_so_far {
            self.best_so_far = evaluation.y;
            self.best_x = Some(x.clone());
        }

        Ok(Observation {
            x,
            y: evaluation.y,
            noise_std: evaluation.noise_std,
        })
    }

    /// Mark the run terminal, recording a single `Done` event.
    fn finish(&mut self, reason: StopReason) -> StepOutcome {
        if self.stop_reason.is_none() {
            self.stop_reason = Some(reason);
            let final_best = self.best_so_far;
            self.push_event(RunEvent::Done { reason, final_best });
        }
        StepOutcome::Done(reason)
    }

    fn push_event(&mut self, event: RunEvent) {
        self.events.push(EventRecord::now(self.step, event));
    }
}
