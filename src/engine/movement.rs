use tracing::debug;

use crate::engine::output::Output;
use crate::engine::render::render_room;
use crate::world::{Direction, Player, World};

/// Direction words the parser knows but no room can link.
const VERTICAL: [&str; 4] = ["up", "down", "u", "d"];

/// Returns true if the player changed rooms.
pub fn handle_move(out: &mut Output, world: &mut World, player: &mut Player, token: &str) -> bool {
    let token = token.trim().to_lowercase();

    let Some(direction) = Direction::parse(&token) else {
        if VERTICAL.iter().any(|v| *v == token) {
            out.say("You can't go that way.");
        } else {
            out.say("I don't know what direction that is.");
        }
        return false;
    };

    let Some(target) = world.neighbour(player.location, direction) else {
        out.say("You can't go that way.");
        return false;
    };

    if world[target].is_locked() {
        out.say("The way is locked.");
        return false;
    }

    debug!(
        from = %world[player.location].id,
        to = %world[target].id,
        %direction,
        "player moved"
    );
    player.location = target;
    render_room(out, world, target);
    true
}
