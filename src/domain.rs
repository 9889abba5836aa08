//! Search-space descriptors and validation.
//!
//! A [`Domain`] is an ordered sequence of [`Dimension`]s: continuous and
//! integer intervals plus categorical level sets. Points are fixed-length
//! numeric vectors; categorical components carry the index of the level.
//!
//! Validation is pure and side-effect free. The runner invokes it
//! defensively before trusting externally supplied points — values are
//! rejected, never silently clamped (Poka-Yoke).

use serde::{Deserialize, Serialize};

use crate::error::{BoError, BoResult};

/// A candidate or observed location in the search space.
///
/// Length always equals the domain's dimension count; categorical
/// components store a level index.
pub type Point = Vec<f64>;

/// One axis of the search space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Dimension {
    /// Real-valued interval, closed bounds `[min, max]`.
    Continuous {
        /// Lower and upper bound.
        bounds: (f64, f64),
    },
    /// Integer-valued interval, closed bounds `[min, max]`.
    Integer {
        /// Lower and upper bound.
        bounds: (f64, f64),
    },
    /// Finite set of labeled levels, addressed by index.
    Categorical {
        /// Ordered level labels.
        levels: Vec<String>,
    },
}

impl Dimension {
    /// Continuous dimension over `[min, max]`.
    #[must_use]
    pub const fn continuous(min: f64, max: f64) -> Self {
        Self::Continuous { bounds: (min, max) }
    }

    /// Integer dimension over `[min, max]`.
    #[must_use]
    pub const fn integer(min: f64, max: f64) -> Self {
        Self::Integer { bounds: (min, max) }
    }

    /// Categorical dimension over the given levels.
    #[must_use]
    pub fn categorical<S: Into<String>>(levels: impl IntoIterator<Item = S>) -> Self {
        Self::Categorical {
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    /// Numeric bounds of this dimension.
    ///
    /// Categorical dimensions map to `[0, levels - 1]`.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Continuous { bounds } | Self::Integer { bounds } => *bounds,
            Self::Categorical { levels } => (0.0, (levels.len().saturating_sub(1)) as f64),
        }
    }
}

/// Ordered collection of dimensions describing the search space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// The dimensions, in point order.
    pub dimensions: Vec<Dimension>,
}

impl Domain {
    /// Create a domain from dimensions.
    #[must_use]
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.dimensions.len()
    }

    /// Per-dimension numeric bounds (categorical maps to `[0, levels - 1]`).
    #[must_use]
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.dimensions.iter().map(Dimension::bounds).collect()
    }

    /// True when every dimension is continuous.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.dimensions
            .iter()
            .all(|dim| matches!(dim, Dimension::Continuous { .. }))
    }

    /// Validate the domain's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BoError::Validation`] when there are no dimensions, when
    /// continuous/integer bounds are inverted or equal, or when a
    /// categorical dimension has no levels.
    pub fn validate(&self) -> BoResult<()> {
        if self.dimensions.is_empty() {
            return Err(BoError::validation("Domain must have at least one dimension"));
        }

        for (i, dim) in self.dimensions.iter().enumerate() {
            match dim {
                Dimension::Continuous { bounds } | Dimension::Integer { bounds } => {
                    let (min, max) = *bounds;
                    if !min.is_finite() || !max.is_finite() {
                        return Err(BoError::validation(format!(
                            "Non-finite bounds [{min}, {max}] for dimension {i}"
                        )));
                    }
                    if min >= max {
                        return Err(BoError::validation(format!(
                            "Invalid bounds [{min}, {max}] for dimension {i}"
                        )));
                    }
                }
                Dimension::Categorical { levels } => {
                    if levels.is_empty() {
                        return Err(BoError::validation(format!(
                            "Categorical dimension {i} must have at least one level"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate a point against this domain.
    ///
    /// # Errors
    ///
    /// Returns [`BoError::Validation`] when the point's length mismatches
    /// the dimension count, a continuous value lies outside its bounds, an
    /// integer value is non-integral or out of bounds, or a categorical
    /// index falls outside `[0, level_count)`.
    pub fn validate_point(&self, x: &[f64]) -> BoResult<()> {
        if x.len() != self.dimensions.len() {
            return Err(BoError::validation(format!(
                "Point dimension mismatch: expected {}, got {}",
                self.dimensions.len(),
                x.len()
            )));
        }

        for (i, (dim, &value)) in self.dimensions.iter().zip(x.iter()).enumerate() {
            match dim {
                Dimension::Continuous { bounds } => {
                    let (min, max) = *bounds;
                    if !value.is_finite() || value < min || value > max {
                        return Err(BoError::validation(format!(
                            "Value {value} out of bounds [{min}, {max}] for dimension {i}"
                        )));
                    }
                }
                Dimension::Integer { bounds } => {
                    let (min, max) = *bounds;
                    if value.fract() != 0.0 || value < min || value > max {
                        return Err(BoError::validation(format!(
                            "Value {value} must be an integer in [{min}, {max}] for dimension {i}"
                        )));
                    }
                }
                Dimension::Categorical { levels } => {
                    let index = value.round();
                    if index < 0.0 || index >= levels.len() as f64 {
                        return Err(BoError::validation(format!(
                            "Categorical index {index} out of range [0, {}) for dimension {i}",
                            levels.len()
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
