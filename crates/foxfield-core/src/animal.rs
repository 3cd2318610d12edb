use crate::location::Location;
use crate::species::Species;
use rand::Rng;

/// Explicit alive/dead state. Dead animals carry no location or food level,
/// so position can never be queried after death.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vitality {
    Alive {
        age: u32,
        food_level: u32,
        location: Location,
    },
    Dead,
}

/// A single animal in the roster. Shared life-cycle transitions live here;
/// species-specific behavior is driven by the simulator from the species
/// trait table.
#[derive(Clone, Debug)]
pub struct Animal {
    pub id: u32,
    pub species: Species,
    pub(crate) vitality: Vitality,
}

impl Animal {
    pub(crate) fn with_state(
        id: u32,
        species: Species,
        age: u32,
        food_level: u32,
        location: Location,
    ) -> Self {
        Self {
            id,
            species,
            vitality: Vitality::Alive {
                age,
                food_level,
                location,
            },
        }
    }

    /// A newborn: age zero, species newborn food level, placed at `location`.
    pub(crate) fn newborn(id: u32, species: Species, location: Location) -> Self {
        let food = species
            .traits()
            .hunger
            .map(|h| h.newborn_food_level)
            .unwrap_or(0);
        Self::with_state(id, species, 0, food, location)
    }

    /// An initially seeded animal: random age in `[0, max_age)` and, for
    /// predators, random food level in `[0, newborn_food_level)`.
    pub(crate) fn with_random_age<R: Rng>(
        id: u32,
        species: Species,
        location: Location,
        rng: &mut R,
    ) -> Self {
        let traits = species.traits();
        let age = rng.random_range(0..traits.max_age);
        let food = traits
            .hunger
            .map(|h| rng.random_range(0..h.newborn_food_level))
            .unwrap_or(0);
        Self::with_state(id, species, age, food, location)
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.vitality, Vitality::Alive { .. })
    }

    pub fn vitality(&self) -> &Vitality {
        &self.vitality
    }

    pub fn location(&self) -> Option<Location> {
        match self.vitality {
            Vitality::Alive { location, .. } => Some(location),
            Vitality::Dead => None,
        }
    }

    pub fn age(&self) -> Option<u32> {
        match self.vitality {
            Vitality::Alive { age, .. } => Some(age),
            Vitality::Dead => None,
        }
    }

    /// Current food level; `None` for dead animals and for species without a
    /// hunger model.
    pub fn food_level(&self) -> Option<u32> {
        match self.vitality {
            Vitality::Alive { food_level, .. } if self.species.is_predator() => Some(food_level),
            _ => None,
        }
    }

    /// Breeding eligibility: alive and at least the species breeding age.
    pub fn can_breed(&self) -> bool {
        match self.vitality {
            Vitality::Alive { age, .. } => age >= self.species.traits().breeding_age,
            Vitality::Dead => false,
        }
    }

    pub(crate) fn increment_age(&mut self) {
        if let Vitality::Alive { age, .. } = &mut self.vitality {
            *age += 1;
        }
    }

    /// Old-age death is strict: an animal at exactly `max_age` is still
    /// viable; one more increment kills it.
    pub(crate) fn past_max_age(&self) -> bool {
        match self.vitality {
            Vitality::Alive { age, .. } => age > self.species.traits().max_age,
            Vitality::Dead => false,
        }
    }

    pub(crate) fn increment_hunger(&mut self) {
        if let Vitality::Alive { food_level, .. } = &mut self.vitality {
            *food_level = food_level.saturating_sub(1);
        }
    }

    pub(crate) fn starved(&self) -> bool {
        match self.vitality {
            Vitality::Alive { food_level, .. } => {
                self.species.is_predator() && food_level == 0
            }
            Vitality::Dead => false,
        }
    }

    /// Add `value` to the food level, saturating at the species maximum.
    pub(crate) fn eat(&mut self, value: u32) {
        let Some(hunger) = self.species.traits().hunger else {
            return;
        };
        if let Vitality::Alive { food_level, .. } = &mut self.vitality {
            *food_level = (*food_level + value).min(hunger.max_food_level);
        }
    }

    /// Transition to `Dead`, returning the vacated location the first time.
    /// The caller is responsible for clearing the field cell.
    pub(crate) fn set_dead(&mut self) -> Option<Location> {
        match self.vitality {
            Vitality::Alive { location, .. } => {
                self.vitality = Vitality::Dead;
                Some(location)
            }
            Vitality::Dead => None,
        }
    }

    /// Update the recorded location, returning the previous one. The caller
    /// owns the corresponding field clear/place pair.
    pub(crate) fn relocate(&mut self, new_location: Location) -> Option<Location> {
        match &mut self.vitality {
            Vitality::Alive { location, .. } => {
                let old = *location;
                *location = new_location;
                Some(old)
            }
            Vitality::Dead => None,
        }
    }
}
