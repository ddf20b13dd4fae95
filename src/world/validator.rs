use std::collections::HashSet;

use super::model::{Direction, EntityId, World};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Structural checks over a fully built world. An empty result means the world is playable.
pub fn validate_world(world: &World) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    if world.rooms().next().is_none() {
        errors.push(ValidationError::new("world has no rooms"));
    }

    match world.start_room() {
        Some(start) if world[start].is_room() => {}
        Some(start) => errors.push(ValidationError::new(format!(
            "start_room '{}' is not a room",
            world[start].id
        ))),
        None => errors.push(ValidationError::new("world has no start_room")),
    }

    // Links must be symmetric
    for room in world.rooms() {
        for direction in Direction::ALL {
            let Some(target) = world.neighbour(room, direction) else {
                continue;
            };
            if world.neighbour(target, direction.opposite()) != Some(room) {
                errors.push(ValidationError::new(format!(
                    "room '{}' links {} to '{}' but the link is not returned",
                    world[room].id, direction, world[target].id
                )));
            }
        }
    }

    // Every item lives in exactly one container
    for (id, entity) in world.entities() {
        if entity.is_room() || id == world.inventory() {
            continue;
        }

        let holders = world.holders(id);
        match holders.len() {
            1 => {}
            0 => errors.push(ValidationError::new(format!(
                "item '{}' is not inside anything",
                entity.id
            ))),
            n => errors.push(ValidationError::new(format!(
                "item '{}' is held by {} containers",
                entity.id, n
            ))),
        }

        if !entity.hidden && entity.keywords.is_empty() {
            errors.push(ValidationError::new(format!(
                "item '{}' has no keywords and cannot be referenced",
                entity.id
            )));
        }
    }

    // Containment must bottom out in a room or the inventory
    let reachable = reachable_from_roots(world);
    for (id, entity) in world.entities() {
        if !entity.is_room() && id != world.inventory() && !reachable.contains(&id) {
            errors.push(ValidationError::new(format!(
                "item '{}' is part of a containment cycle",
                entity.id
            )));
        }
    }

    errors
}

fn reachable_from_roots(world: &World) -> HashSet<EntityId> {
    let mut seen: HashSet<EntityId> = HashSet::new();
    let mut stack: Vec<EntityId> = world.rooms().collect();
    stack.push(world.inventory());

    while let Some(next) = stack.pop() {
        for &child in world.contents(next) {
            if seen.insert(child) {
                stack.push(child);
            }
        }
    }

    seen
}
