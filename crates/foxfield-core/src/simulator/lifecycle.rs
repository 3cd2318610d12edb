use super::Simulator;
use crate::animal::Animal;
use crate::location::Location;
use crate::species::{Species, SpeciesTraits};
use rand::Rng;

/// Litter size: number of successes in `max_litter_size` independent
/// Bernoulli trials, each candidate offspring equally likely.
pub(crate) fn sample_litter<R: Rng>(traits: &SpeciesTraits, rng: &mut R) -> u32 {
    let mut births = 0;
    for _ in 0..traits.max_litter_size {
        if rng.random::<f64>() < traits.breeding_probability {
            births += 1;
        }
    }
    births
}

impl Simulator {
    /// Advance the simulation one step.
    ///
    /// The sweep covers a snapshot of the roster in slot order. Newborns are
    /// placed in the field immediately but collected in a side buffer and
    /// appended to the roster only after the sweep, so they never act in the
    /// step of their birth. Animals killed mid-sweep clear their cell at the
    /// moment of death and are skipped if their own turn has not yet come.
    pub fn step(&mut self) {
        self.step_index = self.step_index.saturating_add(1);
        self.births_last_step = 0;
        self.deaths_last_step = 0;

        let roster_len = self.animals.len();
        let mut newborns: Vec<Animal> = Vec::new();
        for idx in 0..roster_len {
            if !self.animals[idx].is_alive() {
                continue;
            }
            self.act(idx, &mut newborns);
        }
        self.animals.append(&mut newborns);
        self.prune_dead();
    }

    /// One animal's turn: age, hunger (predators), breeding, then movement
    /// or feeding. An animal with nowhere to move dies of overcrowding.
    pub(crate) fn act(&mut self, idx: usize, newborns: &mut Vec<Animal>) {
        self.animals[idx].increment_age();
        if self.animals[idx].past_max_age() {
            self.kill(idx);
            return;
        }
        if self.animals[idx].species.is_predator() {
            self.animals[idx].increment_hunger();
            if self.animals[idx].starved() {
                self.kill(idx);
                return;
            }
        }

        self.give_birth(idx, newborns);

        let Some(origin) = self.animals[idx].location() else {
            return;
        };
        let destination = match self.find_food(idx, origin, newborns) {
            Some((victim, value, location)) => {
                self.kill_slot(victim, newborns);
                self.animals[idx].eat(value);
                Some(location)
            }
            None => self.field.free_adjacent_location(origin, &mut self.rng),
        };
        match destination {
            Some(location) => self.move_animal(idx, location),
            None => self.kill(idx),
        }
    }

    /// Scan the adjacency of `origin` for the first live edible occupant.
    /// Returns its slot, its food value, and the cell it vacates. The scan
    /// order is fixed within one call (rotated between calls).
    ///
    /// Slots at or past the roster length belong to newborns placed earlier
    /// in the same sweep; as in the rest of the sweep, a newborn is an
    /// ordinary occupant from the moment of its birth, so it can be eaten
    /// before it ever acts.
    pub(crate) fn find_food(
        &mut self,
        idx: usize,
        origin: Location,
        newborns: &[Animal],
    ) -> Option<(usize, u32, Location)> {
        let species = self.animals[idx].species;
        if !species.is_predator() {
            return None;
        }
        for location in self.field.adjacent_locations(origin, &mut self.rng) {
            let Some(slot) = self.field.occupant_at(location) else {
                continue;
            };
            let slot = slot as usize;
            let other = if slot < self.animals.len() {
                &self.animals[slot]
            } else {
                &newborns[slot - self.animals.len()]
            };
            if !other.is_alive() {
                continue;
            }
            if let Some(value) = species.food_value(other.species) {
                return Some((slot, value, location));
            }
        }
        None
    }

    /// Sample a litter for an eligible breeder and place the newborns into
    /// free adjacent cells.
    pub(crate) fn give_birth(&mut self, idx: usize, newborns: &mut Vec<Animal>) {
        if !self.animals[idx].can_breed() {
            return;
        }
        let species = self.animals[idx].species;
        let births = sample_litter(species.traits(), &mut self.rng);
        if births == 0 {
            return;
        }
        let Some(origin) = self.animals[idx].location() else {
            return;
        };
        let free = self.field.free_adjacent_locations(origin, &mut self.rng);
        self.place_litter(species, births, &free, newborns);
    }

    /// Place up to `births` newborns, one per free cell in enumeration
    /// order. Births beyond the available free cells are silently dropped.
    /// Each newborn occupies its cell immediately; its roster slot is the
    /// index it will hold once the sweep's side buffer is appended.
    pub(crate) fn place_litter(
        &mut self,
        species: Species,
        births: u32,
        free: &[Location],
        newborns: &mut Vec<Animal>,
    ) {
        for &location in free.iter().take(births as usize) {
            let Some(id) = self.next_animal_id_checked() else {
                return;
            };
            let slot = (self.animals.len() + newborns.len()) as u32;
            self.field.place(slot, location);
            newborns.push(Animal::newborn(id, species, location));
            self.births_last_step += 1;
            self.total_births += 1;
        }
    }

    /// Move an animal to `destination`, keeping its recorded location and
    /// the field cells consistent. The destination must be free or about to
    /// be vacated by the mover itself; anything else is a caller bug.
    pub(crate) fn move_animal(&mut self, idx: usize, destination: Location) {
        debug_assert!(
            self.field
                .occupant_at(destination)
                .is_none_or(|slot| slot as usize == idx),
            "destination cell is owned by another animal"
        );
        if let Some(old) = self.animals[idx].relocate(destination) {
            self.field.clear(old);
            self.field.place(idx as u32, destination);
        }
    }

    /// Mark a roster animal dead and clear its cell synchronously, so no
    /// later-acting animal in the same sweep can observe it as a valid
    /// occupant. Idempotent.
    pub(crate) fn kill(&mut self, idx: usize) {
        let age = self.animals[idx].age();
        if let Some(location) = self.animals[idx].set_dead() {
            self.record_death(location, age);
        }
    }

    /// Kill by slot, resolving same-step newborn slots into the side buffer.
    pub(crate) fn kill_slot(&mut self, slot: usize, newborns: &mut [Animal]) {
        if slot < self.animals.len() {
            self.kill(slot);
            return;
        }
        let newborn = &mut newborns[slot - self.animals.len()];
        let age = newborn.age();
        if let Some(location) = newborn.set_dead() {
            self.record_death(location, age);
        }
    }

    fn record_death(&mut self, location: Location, age: Option<u32>) {
        self.field.clear(location);
        if let Some(age) = age {
            self.lifespans.push(age);
        }
        self.deaths_last_step += 1;
        self.total_deaths += 1;
    }

    /// Drop dead animals from the roster and re-point every surviving
    /// animal's field cell at its compacted slot.
    pub(crate) fn prune_dead(&mut self) {
        if self.animals.iter().all(|a| a.is_alive()) {
            return;
        }
        let old_animals = std::mem::take(&mut self.animals);
        let mut kept = Vec::with_capacity(old_animals.len());
        for animal in old_animals {
            let Some(location) = animal.location() else {
                continue;
            };
            let slot = kept.len() as u32;
            self.field.place(slot, location);
            kept.push(animal);
        }
        self.animals = kept;
    }
}
