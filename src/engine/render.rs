use crate::engine::output::Output;
use crate::world::{EntityId, World};

/// First-visit rendering: the description only appears the first time.
pub fn render_room(out: &mut Output, world: &mut World, room: EntityId) {
    let description = world.describe(room);

    out.title(description.name);
    if let Some(desc) = description.desc {
        out.say(desc);
    }
    out.set_exits(exits_line(world, room));
}

/// Full rendering for `look`; leaves the visited flag alone.
pub fn render_look(out: &mut Output, world: &World, room: EntityId) {
    out.title(world[room].name.clone());
    out.say(world[room].desc.trim());

    let names: Vec<&str> = world
        .visible_contents(room)
        .into_iter()
        .map(|id| world[id].name.as_str())
        .collect();
    if !names.is_empty() {
        out.say(format!("You see: {}.", names.join(", ")));
    }

    out.set_exits(exits_line(world, room));
}

pub fn exits_line(world: &World, room: EntityId) -> String {
    let exits = world.exits(room);
    if exits.is_empty() {
        return "Exits: (none)".to_string();
    }

    let list = exits
        .into_iter()
        .map(|d| d.as_str())
        .collect::<Vec<&str>>()
        .join(", ");
    format!("Exits: {}", list)
}
