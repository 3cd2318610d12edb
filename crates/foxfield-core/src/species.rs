use serde::{Deserialize, Serialize};
use std::fmt;

/// The species of an animal. Each variant carries a compile-time constant
/// table; species traits are never runtime configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Rabbit,
    Fox,
    Bear,
}

/// Hunger model for predator species. Prey species have none.
#[derive(Clone, Copy, Debug)]
pub struct HungerTraits {
    /// Edible species with their food values, in priority order.
    pub diet: &'static [(Species, u32)],
    /// Food level ceiling; eating saturates here.
    pub max_food_level: u32,
    /// Food level a newborn starts with, and the exclusive bound for the
    /// random food level of initially seeded animals.
    pub newborn_food_level: u32,
}

/// Life-cycle constants shared by every member of a species.
#[derive(Clone, Copy, Debug)]
pub struct SpeciesTraits {
    pub breeding_age: u32,
    pub max_age: u32,
    pub breeding_probability: f64,
    pub max_litter_size: u32,
    pub hunger: Option<HungerTraits>,
}

const RABBIT: SpeciesTraits = SpeciesTraits {
    breeding_age: 5,
    max_age: 40,
    breeding_probability: 0.12,
    max_litter_size: 4,
    hunger: None,
};

const FOX: SpeciesTraits = SpeciesTraits {
    breeding_age: 15,
    max_age: 150,
    breeding_probability: 0.08,
    max_litter_size: 2,
    hunger: Some(HungerTraits {
        diet: &[(Species::Rabbit, 9)],
        max_food_level: 9,
        newborn_food_level: 9,
    }),
};

const BEAR: SpeciesTraits = SpeciesTraits {
    breeding_age: 30,
    max_age: 300,
    breeding_probability: 0.05,
    max_litter_size: 1,
    hunger: Some(HungerTraits {
        // Foxes are checked before rabbits at each scanned cell.
        diet: &[(Species::Fox, 5), (Species::Rabbit, 2)],
        max_food_level: 8,
        newborn_food_level: 5,
    }),
};

impl Species {
    pub const fn traits(self) -> &'static SpeciesTraits {
        match self {
            Species::Rabbit => &RABBIT,
            Species::Fox => &FOX,
            Species::Bear => &BEAR,
        }
    }

    /// Food value of `prey` to this species, or `None` if inedible.
    pub fn food_value(self, prey: Species) -> Option<u32> {
        self.traits()
            .hunger
            .as_ref()
            .and_then(|h| h.diet.iter().find(|(p, _)| *p == prey))
            .map(|(_, value)| *value)
    }

    pub fn is_predator(self) -> bool {
        self.traits().hunger.is_some()
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Rabbit => write!(f, "rabbit"),
            Species::Fox => write!(f, "fox"),
            Species::Bear => write!(f, "bear"),
        }
    }
}
