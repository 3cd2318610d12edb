mod lifecycle;
pub mod metrics;
#[cfg(test)]
mod tests;

pub use metrics::*;

use crate::animal::Animal;
use crate::config::{SimConfig, SimConfigError};
use crate::field::Field;
use crate::location::Location;
use crate::species::Species;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

/// Step-synchronous simulator owning the field, the animal roster, and the
/// seeded random source. All mutation happens inside `step`; between steps
/// the roster contains only living animals with consistent field placement.
pub struct Simulator {
    pub(crate) animals: Vec<Animal>,
    pub(crate) field: Field,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) next_animal_id: u32,
    pub(crate) step_index: usize,
    pub(crate) births_last_step: usize,
    pub(crate) deaths_last_step: usize,
    pub(crate) total_births: usize,
    pub(crate) total_deaths: usize,
    pub(crate) lifespans: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl Simulator {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Build an empty, validated simulator. Call `populate` (or place
    /// animals through a custom seeding routine) before stepping.
    pub fn try_new(config: SimConfig) -> Result<Self, SimConfigError> {
        config.validate()?;
        let field = Field::new(config.depth, config.width);
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self {
            animals: Vec::new(),
            field,
            config,
            rng,
            next_animal_id: 0,
            step_index: 0,
            births_last_step: 0,
            deaths_last_step: 0,
            total_births: 0,
            total_deaths: 0,
            lifespans: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn alive_count(&self) -> usize {
        self.animals.iter().filter(|a| a.is_alive()).count()
    }

    pub fn species_count(&self, species: Species) -> usize {
        self.animals
            .iter()
            .filter(|a| a.is_alive() && a.species == species)
            .count()
    }

    fn next_animal_id_checked(&mut self) -> Option<u32> {
        if self.next_animal_id == u32::MAX {
            return None;
        }
        let id = self.next_animal_id;
        self.next_animal_id += 1;
        Some(id)
    }

    /// Seed the field from the configured per-cell creation probabilities.
    /// Seeded animals get a random age and, for predators, a random food
    /// level, so the population does not breed or starve in lockstep.
    pub fn populate(&mut self) {
        let bear_p = self.config.bear_creation_probability;
        let fox_p = self.config.fox_creation_probability;
        let rabbit_p = self.config.rabbit_creation_probability;
        for row in 0..self.field.depth() {
            for col in 0..self.field.width() {
                let draw = self.rng.random::<f64>();
                let species = if draw < bear_p {
                    Species::Bear
                } else if draw < bear_p + fox_p {
                    Species::Fox
                } else if draw < bear_p + fox_p + rabbit_p {
                    Species::Rabbit
                } else {
                    continue;
                };
                let Some(id) = self.next_animal_id_checked() else {
                    return;
                };
                let location = Location::new(row, col);
                let animal = Animal::with_random_age(id, species, location, &mut self.rng);
                let slot = self.animals.len() as u32;
                self.field.place(slot, location);
                self.animals.push(animal);
            }
        }
    }

    /// Discard the current population and counters, re-seed the random
    /// source from the configured seed, and repopulate. A reset simulator is
    /// indistinguishable from a freshly populated one.
    pub fn reset(&mut self) {
        self.animals.clear();
        self.field = Field::new(self.config.depth, self.config.width);
        self.rng = ChaCha12Rng::seed_from_u64(self.config.seed);
        self.next_animal_id = 0;
        self.step_index = 0;
        self.births_last_step = 0;
        self.deaths_last_step = 0;
        self.total_births = 0;
        self.total_deaths = 0;
        self.lifespans.clear();
        self.populate();
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Run `steps` steps, collecting metrics every `sample_every` steps (and
    /// at the final step).
    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        self.lifespans.clear();
        let births_before = self.total_births;
        let deaths_before = self.total_deaths;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics(step));
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            final_alive_count: self.alive_count(),
            samples,
            lifespans: std::mem::take(&mut self.lifespans),
            total_births: self.total_births - births_before,
            total_deaths: self.total_deaths - deaths_before,
        })
    }
}
