//! Properties that must hold after every command, whatever the player types.

use std::collections::HashSet;

use proptest::prelude::*;

use delve::world::{Direction, EntityId};
use delve::{GameState, initialize_world, process_command};

const WORLD: &str = include_str!("../worlds/test_world.toml");

const COMMANDS: &[&str] = &[
    "n",
    "s",
    "e",
    "w",
    "go up",
    "take key",
    "take sword",
    "take pendant",
    "take coin",
    "take bag",
    "take statue",
    "take mouse",
    "drop key",
    "drop sword",
    "drop pendant",
    "drop bag",
    "drop coin",
    "unlock chest with key",
    "unlock east with key",
    "unlock chest with coin",
    "inspect chest",
    "inspect room",
    "look",
    "i",
    "use key",
    "quit",
    "dance",
];

fn check_ownership(game: &GameState) -> Result<(), TestCaseError> {
    let world = &game.world;
    for (id, entity) in world.entities() {
        if entity.is_room() || id == world.inventory() {
            continue;
        }
        let holders = world.holders(id);
        prop_assert_eq!(holders.len(), 1, "{} held by {:?}", entity.id, holders);
    }
    Ok(())
}

fn check_symmetry(game: &GameState) -> Result<(), TestCaseError> {
    let world = &game.world;
    for room in world.rooms() {
        for direction in Direction::ALL {
            if let Some(target) = world.neighbour(room, direction) {
                prop_assert_eq!(world.neighbour(target, direction.opposite()), Some(room));
            }
        }
    }
    Ok(())
}

fn unlocked(game: &GameState) -> HashSet<EntityId> {
    game.world
        .entities()
        .filter(|(_, e)| e.is_container() && !e.is_locked())
        .map(|(id, _)| id)
        .collect()
}

proptest! {
    #[test]
    fn every_item_has_exactly_one_owner(
        commands in prop::collection::vec(prop::sample::select(COMMANDS.to_vec()), 0..60)
    ) {
        let mut game = initialize_world(WORLD).unwrap();
        game.describe_current_room();

        for command in commands {
            process_command(&mut game, command);
            check_ownership(&game)?;
        }
    }

    #[test]
    fn links_and_locks_never_regress(
        commands in prop::collection::vec(prop::sample::select(COMMANDS.to_vec()), 0..60)
    ) {
        let mut game = initialize_world(WORLD).unwrap();
        let mut opened = unlocked(&game);

        for command in commands {
            process_command(&mut game, command);
            check_symmetry(&game)?;

            let now = unlocked(&game);
            prop_assert!(opened.is_subset(&now), "something was re-locked by {}", command);
            opened = now;
        }
    }

    #[test]
    fn player_always_stands_in_a_room(
        commands in prop::collection::vec(prop::sample::select(COMMANDS.to_vec()), 0..60)
    ) {
        let mut game = initialize_world(WORLD).unwrap();

        for command in commands {
            process_command(&mut game, command);
            prop_assert!(game.world[game.player.location].is_room());
        }
    }
}
