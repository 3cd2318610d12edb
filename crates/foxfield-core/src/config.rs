use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Simulation configuration. Species life-cycle constants are compile-time
/// tables in `species`; only the field shape, the seed, and the initial
/// seeding densities are configurable.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Number of rows in the field.
    pub depth: usize,
    /// Number of columns in the field.
    pub width: usize,
    /// Per-cell probability of seeding a rabbit during `populate`.
    pub rabbit_creation_probability: f64,
    /// Per-cell probability of seeding a fox during `populate`.
    pub fox_creation_probability: f64,
    /// Per-cell probability of seeding a bear during `populate`.
    pub bear_creation_probability: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            depth: 80,
            width: 120,
            rabbit_creation_probability: 0.08,
            fox_creation_probability: 0.02,
            bear_creation_probability: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidFieldSize,
    FieldTooLarge { max: usize, actual: usize },
    CreationProbabilityOutOfRange { species: &'static str, value: f64 },
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::InvalidFieldSize => {
                write!(f, "field depth and width must both be positive")
            }
            SimConfigError::FieldTooLarge { max, actual } => {
                write!(f, "field cell count ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::CreationProbabilityOutOfRange { species, value } => {
                write!(
                    f,
                    "{species} creation probability ({value}) must lie in [0, 1] and sum to at most 1"
                )
            }
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_FIELD_CELLS: usize = 1 << 22;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.depth == 0 || self.width == 0 {
            return Err(SimConfigError::InvalidFieldSize);
        }
        let cells = self
            .depth
            .checked_mul(self.width)
            .ok_or(SimConfigError::InvalidFieldSize)?;
        if cells > Self::MAX_FIELD_CELLS {
            return Err(SimConfigError::FieldTooLarge {
                max: Self::MAX_FIELD_CELLS,
                actual: cells,
            });
        }
        for (species, value) in [
            ("rabbit", self.rabbit_creation_probability),
            ("fox", self.fox_creation_probability),
            ("bear", self.bear_creation_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimConfigError::CreationProbabilityOutOfRange { species, value });
            }
        }
        let total = self.rabbit_creation_probability
            + self.fox_creation_probability
            + self.bear_creation_probability;
        if total > 1.0 {
            return Err(SimConfigError::CreationProbabilityOutOfRange {
                species: "combined",
                value: total,
            });
        }
        Ok(())
    }
}
