//! Discrete-time, grid-based predator-prey simulation engine.
//!
//! Rabbits, foxes, and bears share a bounded field; each step every living
//! animal ages, may hunger, may hunt, may breed, and may move or die. The
//! simulator drives a single-threaded, step-synchronous sweep over the
//! roster with deterministic behavior per configured seed.

pub mod animal;
pub mod config;
pub mod field;
pub mod location;
pub mod simulator;
pub mod species;

pub use animal::{Animal, Vitality};
pub use config::{SimConfig, SimConfigError};
pub use field::Field;
pub use location::Location;
pub use simulator::{
    ExperimentError, PopulationStats, RunSummary, Simulator, StepMetrics,
};
pub use species::{HungerTraits, Species, SpeciesTraits};
