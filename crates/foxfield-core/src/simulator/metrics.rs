use super::Simulator;
use crate::species::Species;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub alive_count: usize,
    pub rabbit_count: usize,
    pub fox_count: usize,
    pub bear_count: usize,
    pub birth_count: usize,
    pub death_count: usize,
    pub mean_age: f32,
    /// Mean food level across living predators (foxes and bears).
    pub mean_predator_food: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PopulationStats {
    pub alive_count: usize,
    pub rabbit_count: usize,
    pub fox_count: usize,
    pub bear_count: usize,
    pub total_births: usize,
    pub total_deaths: usize,
}

impl PopulationStats {
    /// A run stays interesting while at least two species are represented.
    pub fn is_viable(&self) -> bool {
        [self.rabbit_count, self.fox_count, self.bear_count]
            .iter()
            .filter(|count| **count > 0)
            .count()
            >= 2
    }
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub final_alive_count: usize,
    pub samples: Vec<StepMetrics>,
    /// Ages at death for every animal that died during the run.
    #[serde(default)]
    pub lifespans: Vec<u32>,
    #[serde(default)]
    pub total_births: usize,
    #[serde(default)]
    pub total_deaths: usize,
}

impl Simulator {
    pub fn population_stats(&self) -> PopulationStats {
        let mut stats = PopulationStats {
            total_births: self.total_births,
            total_deaths: self.total_deaths,
            ..PopulationStats::default()
        };
        for animal in self.animals.iter().filter(|a| a.is_alive()) {
            stats.alive_count += 1;
            match animal.species {
                Species::Rabbit => stats.rabbit_count += 1,
                Species::Fox => stats.fox_count += 1,
                Species::Bear => stats.bear_count += 1,
            }
        }
        stats
    }

    pub(crate) fn collect_step_metrics(&self, step: usize) -> StepMetrics {
        let stats = self.population_stats();
        let mut age_sum = 0u64;
        let mut food_sum = 0u64;
        let mut predator_count = 0usize;
        for animal in self.animals.iter().filter(|a| a.is_alive()) {
            age_sum += u64::from(animal.age().unwrap_or(0));
            if let Some(food) = animal.food_level() {
                food_sum += u64::from(food);
                predator_count += 1;
            }
        }
        StepMetrics {
            step,
            alive_count: stats.alive_count,
            rabbit_count: stats.rabbit_count,
            fox_count: stats.fox_count,
            bear_count: stats.bear_count,
            birth_count: self.births_last_step,
            death_count: self.deaths_last_step,
            mean_age: age_sum as f32 / stats.alive_count.max(1) as f32,
            mean_predator_food: food_sum as f32 / predator_count.max(1) as f32,
        }
    }
}
