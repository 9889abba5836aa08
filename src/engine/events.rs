//! Run event log: an ordered, step-tagged record of every decision the
//! runner makes, sufficient to reconstruct a run's trace without
//! re-executing it.
//!
//! Traces export as bincode-serialized, zstd-compressed payloads with a
//! blake3 integrity hash. Import verifies the hash before decoding.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::Point;
use crate::error::{BoError, BoResult};

/// Why a run reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The evaluation budget is spent.
    BudgetExhausted,
    /// The optimizer proposed no candidate — a hard stop, not a retry
    /// trigger.
    NoCandidateProposed,
}

/// One decision-trace entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunEvent {
    /// Run initialized.
    InitRun {
        /// RNG seed.
        seed: u64,
        /// Number of initial-design points.
        design_size: usize,
        /// Total evaluation budget.
        budget: usize,
    },
    /// A fresh surrogate was fitted.
    FitSurrogate {
        /// Kernel plugin name.
        kernel: String,
        /// Assumed observation noise.
        noise: f64,
        /// Covariance conditioning estimate, when fitted.
        conditioning: Option<f64>,
    },
    /// The optimizer proposed candidates.
    Ask {
        /// Acquisition plugin name.
        acquisition: String,
        /// Optimizer plugin name.
        optimizer: String,
        /// Proposed candidate points.
        candidates: Vec<Point>,
    },
    /// The oracle evaluated a point.
    Eval {
        /// Oracle plugin name.
        oracle: String,
        /// Evaluated location.
        x: Point,
        /// Observed value.
        y: f64,
        /// Reported noise standard deviation, if any.
        noise_std: Option<f64>,
    },
    /// The optimizer was told about an observation.
    Tell {
        /// Dataset size after the append.
        dataset_size: usize,
    },
    /// The run reached a terminal state.
    Done {
        /// Terminal condition.
        reason: StopReason,
        /// Best observed value at termination.
        final_best: f64,
    },
    /// Free-form caller annotation.
    Annotation {
        /// The note.
        note: String,
    },
}

/// A [`RunEvent`] tagged with its step index and wall-clock timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Step index at which the event was recorded.
    pub step: usize,
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: u64,
    /// The event.
    pub event: RunEvent,
}

impl EventRecord {
    /// Record an event at the given step, stamped with the current time.
    #[must_use]
    pub fn now(step: usize, event: RunEvent) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        Self {
            step,
            timestamp_ms,
            event,
        }
    }
}

/// An exported, verifiable run trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTrace {
    /// The ordered event records.
    pub records: Vec<EventRecord>,
}

/// On-disk layout of an exported trace.
#[derive(Serialize, Deserialize)]
struct TracePackage {
    /// Blake3 hash of the compressed payload.
    hash: [u8; 32],
    /// Zstd-compressed bincode payload.
    data: Vec<u8>,
}

impl RunTrace {
    /// Wrap an event sequence as a trace.
    #[must_use]
    pub fn new(records: Vec<EventRecord>) -> Self {
        Self { records }
    }

    /// Export as compressed bytes with an integrity hash.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or compression fails.
    pub fn export(&self, compression_level: i32) -> BoResult<Vec<u8>> {
        let serialized =
            bincode::serialize(&self.records).map_err(|e| BoError::serialization(e.to_string()))?;
        let compressed = zstd::encode_all(&serialized[..], compression_level)?;
        let hash = blake3::hash(&compressed);

        bincode::serialize(&TracePackage {
            hash: *hash.as_bytes(),
            data: compressed,
        })
        .map_err(|e| BoError::serialization(e.to_string()))
    }

    /// Import a previously exported trace, verifying integrity.
    ///
    /// # Errors
    ///
    /// Returns [`BoError::TraceIntegrity`] when the hash does not match,
    /// or a serialization error when decoding fails.
    pub fn import(bytes: &[u8]) -> BoResult<Self> {
        let package: TracePackage =
            bincode::deserialize(bytes).map_err(|e| BoError::serialization(e.to_string()))?;

        let computed = blake3::hash(&package.data);
        if computed.as_bytes() != &package.hash {
            return Err(BoError::TraceIntegrity);
        }

        let decompressed = zstd::decode_all(&package.data[..])?;
        let records = bincode::deserialize(&decompressed)
            .map_err(|e| BoError::serialization(e.to_string()))?;

        Ok(Self { records })
    }
}
