use super::lifecycle::sample_litter;
use super::*;
use crate::animal::Animal;
use crate::species::SpeciesTraits;
use std::collections::HashSet;

fn small_config(depth: usize, width: usize) -> SimConfig {
    SimConfig {
        seed: 7,
        depth,
        width,
        rabbit_creation_probability: 0.0,
        fox_creation_probability: 0.0,
        bear_creation_probability: 0.0,
    }
}

fn empty_sim(depth: usize, width: usize) -> Simulator {
    Simulator::try_new(small_config(depth, width)).unwrap()
}

/// Place an animal with explicit age and food level, bypassing `populate`.
fn spawn(sim: &mut Simulator, species: Species, age: u32, food: u32, location: Location) -> usize {
    let id = sim.next_animal_id_checked().unwrap();
    let slot = sim.animals.len();
    sim.field.place(slot as u32, location);
    sim.animals
        .push(Animal::with_state(id, species, age, food, location));
    slot
}

fn assert_roster_field_consistent(sim: &Simulator) {
    let mut seen = HashSet::new();
    for (slot, animal) in sim.animals().iter().enumerate() {
        assert!(animal.is_alive(), "roster holds a dead animal after a step");
        let location = animal.location().unwrap();
        assert_eq!(
            sim.field().occupant_at(location),
            Some(slot as u32),
            "field cell does not point back at roster slot {slot}"
        );
        assert!(seen.insert(location), "two animals share {location}");
    }
    assert_eq!(sim.field().occupied_count(), sim.animals().len());
}

#[test]
fn roster_and_field_stay_consistent_over_many_steps() {
    let config = SimConfig {
        seed: 3,
        depth: 30,
        width: 30,
        ..SimConfig::default()
    };
    let mut sim = Simulator::try_new(config).unwrap();
    sim.populate();
    assert_roster_field_consistent(&sim);
    for _ in 0..25 {
        sim.step();
        assert_roster_field_consistent(&sim);
    }
}

#[test]
fn animal_at_max_age_dies_on_next_step() {
    let mut sim = empty_sim(10, 10);
    spawn(
        &mut sim,
        Species::Rabbit,
        Species::Rabbit.traits().max_age,
        0,
        Location::new(5, 5),
    );
    sim.step();
    assert!(sim.animals().is_empty());
    assert_eq!(sim.field().occupied_count(), 0);
    assert_eq!(sim.population_stats().total_deaths, 1);
}

#[test]
fn animal_below_max_age_survives_the_step() {
    let mut sim = empty_sim(10, 10);
    let id = {
        spawn(
            &mut sim,
            Species::Rabbit,
            Species::Rabbit.traits().max_age - 1,
            0,
            Location::new(5, 5),
        );
        sim.animals()[0].id
    };
    sim.step();
    let survivor = sim
        .animals()
        .iter()
        .find(|a| a.id == id)
        .expect("rabbit at max_age - 1 must survive one more step");
    assert_eq!(survivor.age(), Some(Species::Rabbit.traits().max_age));
}

#[test]
fn predator_starves_when_food_runs_out() {
    let mut sim = empty_sim(10, 10);
    spawn(&mut sim, Species::Fox, 1, 1, Location::new(5, 5));
    sim.step();
    assert!(sim.animals().is_empty());
    assert_eq!(sim.field().occupied_count(), 0);
}

#[test]
fn surrounded_animal_dies_of_overcrowding_and_frees_its_cell() {
    let mut sim = empty_sim(3, 3);
    let center = Location::new(1, 1);
    spawn(&mut sim, Species::Rabbit, 1, 0, center);
    for row in 0..3 {
        for col in 0..3 {
            let location = Location::new(row, col);
            if location != center {
                spawn(&mut sim, Species::Rabbit, 1, 0, location);
            }
        }
    }
    let mut newborns = Vec::new();
    sim.act(0, &mut newborns);
    assert!(!sim.animals[0].is_alive());
    assert_eq!(sim.field().occupant_at(center), None);
    assert!(newborns.is_empty());
    assert_eq!(sim.deaths_last_step, 1);
}

#[test]
fn litter_sampling_counts_independent_successes() {
    let certain = SpeciesTraits {
        breeding_age: 1,
        max_age: 10,
        breeding_probability: 1.0,
        max_litter_size: 3,
        hunger: None,
    };
    let barren = SpeciesTraits {
        breeding_probability: 0.0,
        ..certain
    };
    let mut rng = rand_chacha::ChaCha12Rng::seed_from_u64(5);
    for _ in 0..20 {
        assert_eq!(sample_litter(&certain, &mut rng), 3);
        assert_eq!(sample_litter(&barren, &mut rng), 0);
    }
}

#[test]
fn litter_placement_fills_distinct_free_cells() {
    let mut sim = empty_sim(5, 5);
    let origin = Location::new(2, 2);
    spawn(&mut sim, Species::Rabbit, 10, 0, origin);

    let free = sim.field.free_adjacent_locations(origin, &mut sim.rng);
    assert_eq!(free.len(), 8);
    let mut newborns = Vec::new();
    sim.place_litter(Species::Rabbit, 3, &free, &mut newborns);

    assert_eq!(newborns.len(), 3);
    let mut cells = HashSet::new();
    for (offset, newborn) in newborns.iter().enumerate() {
        let location = newborn.location().unwrap();
        assert!(free.contains(&location));
        assert!(cells.insert(location));
        assert_eq!(newborn.age(), Some(0));
        // Newborn cells already point at the slots the side buffer will
        // occupy once appended.
        assert_eq!(
            sim.field().occupant_at(location),
            Some((1 + offset) as u32)
        );
    }
    // The breeder itself has not moved.
    assert_eq!(sim.field().occupant_at(origin), Some(0));
    assert_eq!(sim.births_last_step, 3);
}

#[test]
fn excess_births_beyond_free_cells_are_dropped() {
    let mut sim = empty_sim(5, 5);
    let origin = Location::new(0, 0);
    spawn(&mut sim, Species::Rabbit, 10, 0, origin);
    let free = sim.field.free_adjacent_locations(origin, &mut sim.rng);
    assert_eq!(free.len(), 3);
    let mut newborns = Vec::new();
    sim.place_litter(Species::Rabbit, 10, &free, &mut newborns);
    assert_eq!(newborns.len(), 3);
    assert_eq!(sim.births_last_step, 3);
}

#[test]
fn underage_animal_does_not_breed() {
    let mut sim = empty_sim(5, 5);
    spawn(&mut sim, Species::Rabbit, 1, 0, Location::new(2, 2));
    let mut newborns = Vec::new();
    sim.give_birth(0, &mut newborns);
    assert!(newborns.is_empty());
    assert_eq!(sim.births_last_step, 0);
}

#[test]
fn newborns_do_not_act_in_their_birth_step() {
    let mut sim = empty_sim(5, 5);
    spawn(&mut sim, Species::Rabbit, 10, 0, Location::new(2, 2));
    let parent_id = sim.animals()[0].id;
    sim.step();
    for animal in sim.animals() {
        if animal.id != parent_id {
            assert_eq!(animal.age(), Some(0), "newborn acted in its birth step");
        }
    }
    assert_roster_field_consistent(&sim);
}

#[test]
fn lone_prey_moves_to_an_adjacent_cell() {
    let mut sim = empty_sim(3, 3);
    let center = Location::new(1, 1);
    spawn(&mut sim, Species::Rabbit, 1, 0, center);
    sim.step();

    assert_eq!(sim.animals().len(), 1);
    let rabbit = &sim.animals()[0];
    let location = rabbit.location().unwrap();
    assert_ne!(location, center);
    assert!(location.row.abs_diff(center.row) <= 1);
    assert!(location.col.abs_diff(center.col) <= 1);
    assert_eq!(sim.field().occupant_at(center), None);
    assert_eq!(sim.field().occupant_at(location), Some(0));
}

#[test]
fn fox_eats_adjacent_rabbit_and_takes_its_cell() {
    let mut sim = empty_sim(5, 5);
    spawn(&mut sim, Species::Fox, 1, 5, Location::new(2, 2));
    spawn(&mut sim, Species::Rabbit, 1, 0, Location::new(2, 3));
    sim.step();

    assert_eq!(sim.animals().len(), 1);
    let fox = &sim.animals()[0];
    assert_eq!(fox.species, Species::Fox);
    assert_eq!(fox.location(), Some(Location::new(2, 3)));
    // 4 (after hunger) + 9 saturates at the fox maximum of 9.
    assert_eq!(fox.food_level(), Some(9));
    assert_eq!(sim.field().occupied_count(), 1);
    assert_eq!(sim.population_stats().total_deaths, 1);
}

#[test]
fn predator_can_eat_a_newborn_placed_earlier_in_the_sweep() {
    let mut sim = empty_sim(5, 5);
    spawn(&mut sim, Species::Rabbit, 10, 0, Location::new(1, 1));
    spawn(&mut sim, Species::Fox, 1, 5, Location::new(3, 3));

    // Mid-sweep state: the rabbit has already bred and its kit occupies a
    // cell adjacent to the fox, under the slot it will hold after the merge.
    let mut newborns = Vec::new();
    sim.place_litter(Species::Rabbit, 1, &[Location::new(2, 2)], &mut newborns);
    assert_eq!(sim.field().occupant_at(Location::new(2, 2)), Some(2));

    // The fox's only edible neighbor is the newborn.
    sim.act(1, &mut newborns);
    let fox = &sim.animals[1];
    assert_eq!(fox.location(), Some(Location::new(2, 2)));
    assert_eq!(fox.food_level(), Some(9));
    assert!(!newborns[0].is_alive());
    assert_eq!(sim.deaths_last_step, 1);

    // Merge and consolidate as `step` would.
    sim.animals.append(&mut newborns);
    sim.prune_dead();
    assert_eq!(sim.animals().len(), 2);
    assert_roster_field_consistent(&sim);
}

#[test]
fn sweep_stays_consistent_when_predators_hunt_among_newborns() {
    // A dense block of breeding-age rabbits next to foxes guarantees that
    // predators repeatedly scan cells occupied by same-step newborns.
    let mut sim = empty_sim(6, 6);
    for row in 0..3 {
        for col in 0..3 {
            spawn(&mut sim, Species::Rabbit, 10, 0, Location::new(row, col));
        }
    }
    spawn(&mut sim, Species::Fox, 16, 9, Location::new(3, 3));
    spawn(&mut sim, Species::Fox, 16, 9, Location::new(0, 4));
    for _ in 0..30 {
        sim.step();
        assert_roster_field_consistent(&sim);
    }
}

#[test]
fn bear_eats_adjacent_fox_and_gains_its_food_value() {
    let mut sim = empty_sim(5, 5);
    spawn(&mut sim, Species::Bear, 1, 3, Location::new(2, 2));
    spawn(&mut sim, Species::Fox, 1, 5, Location::new(1, 1));
    sim.step();

    assert_eq!(sim.animals().len(), 1);
    let bear = &sim.animals()[0];
    assert_eq!(bear.species, Species::Bear);
    assert_eq!(bear.location(), Some(Location::new(1, 1)));
    // 2 (after hunger) + 5, below the bear maximum of 8.
    assert_eq!(bear.food_level(), Some(7));
}

#[test]
fn feeding_saturates_at_the_predator_maximum() {
    let mut sim = empty_sim(5, 5);
    let max = Species::Bear.traits().hunger.unwrap().max_food_level;
    spawn(&mut sim, Species::Bear, 1, max, Location::new(2, 2));
    spawn(&mut sim, Species::Rabbit, 1, 0, Location::new(2, 3));
    sim.step();

    let bear = sim
        .animals()
        .iter()
        .find(|a| a.species == Species::Bear)
        .unwrap();
    // max - 1 after hunger, + 2 from the rabbit, capped at max.
    assert_eq!(bear.food_level(), Some(max));
}

#[test]
fn populate_is_deterministic_per_seed_and_reset_reproduces_it() {
    let config = SimConfig {
        seed: 99,
        depth: 20,
        width: 20,
        ..SimConfig::default()
    };
    let mut a = Simulator::try_new(config.clone()).unwrap();
    let mut b = Simulator::try_new(config).unwrap();
    a.populate();
    b.populate();
    assert_eq!(a.population_stats(), b.population_stats());
    for (x, y) in a.animals().iter().zip(b.animals()) {
        assert_eq!(x.id, y.id);
        assert_eq!(x.species, y.species);
        assert_eq!(x.location(), y.location());
        assert_eq!(x.age(), y.age());
    }

    let fresh_stats = a.population_stats();
    a.run_experiment(5, 1);
    a.reset();
    assert_eq!(a.population_stats(), fresh_stats);
    assert_eq!(a.step_index(), 0);
}

#[test]
fn population_stats_count_per_species() {
    let mut sim = empty_sim(5, 5);
    spawn(&mut sim, Species::Rabbit, 1, 0, Location::new(0, 0));
    spawn(&mut sim, Species::Rabbit, 1, 0, Location::new(0, 2));
    spawn(&mut sim, Species::Fox, 1, 5, Location::new(4, 4));
    let stats = sim.population_stats();
    assert_eq!(stats.alive_count, 3);
    assert_eq!(stats.rabbit_count, 2);
    assert_eq!(stats.fox_count, 1);
    assert_eq!(stats.bear_count, 0);
    assert!(stats.is_viable());
    assert_eq!(sim.species_count(Species::Rabbit), 2);
}

#[test]
fn single_species_population_is_not_viable() {
    let mut sim = empty_sim(5, 5);
    spawn(&mut sim, Species::Rabbit, 1, 0, Location::new(0, 0));
    assert!(!sim.population_stats().is_viable());
}

#[test]
fn experiment_rejects_zero_sample_every() {
    let mut sim = empty_sim(5, 5);
    assert!(matches!(
        sim.try_run_experiment(10, 0),
        Err(ExperimentError::InvalidSampleEvery)
    ));
}

#[test]
fn experiment_rejects_excessive_steps() {
    let mut sim = empty_sim(5, 5);
    assert!(matches!(
        sim.try_run_experiment(Simulator::MAX_EXPERIMENT_STEPS + 1, 1),
        Err(ExperimentError::TooManySteps { .. })
    ));
}

#[test]
fn experiment_samples_every_interval_and_final_step() {
    let mut sim = empty_sim(5, 5);
    let summary = sim.try_run_experiment(5, 2).unwrap();
    let sampled: Vec<usize> = summary.samples.iter().map(|m| m.step).collect();
    assert_eq!(sampled, vec![2, 4, 5]);
    assert_eq!(summary.final_alive_count, 0);
    assert_eq!(summary.schema_version, 1);
}

#[test]
fn try_new_rejects_invalid_config() {
    let config = SimConfig {
        width: 0,
        ..SimConfig::default()
    };
    assert!(matches!(
        Simulator::try_new(config),
        Err(SimConfigError::InvalidFieldSize)
    ));
}

#[test]
fn lifespans_record_ages_at_death() {
    let mut sim = empty_sim(10, 10);
    spawn(
        &mut sim,
        Species::Rabbit,
        Species::Rabbit.traits().max_age,
        0,
        Location::new(5, 5),
    );
    let summary = sim.try_run_experiment(1, 1).unwrap();
    assert_eq!(summary.lifespans, vec![Species::Rabbit.traits().max_age + 1]);
    assert_eq!(summary.total_deaths, 1);
}
