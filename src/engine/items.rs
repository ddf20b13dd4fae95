use tracing::debug;

use crate::config::KeyPolicy;
use crate::engine::output::Output;
use crate::world::{Direction, EntityId, Player, UnlockOutcome, World};

/// Inventory first, then the current room. Returns the item and its direct parent.
pub fn find_item(world: &World, player: &Player, name: &str) -> Option<(EntityId, EntityId)> {
    world
        .search_for_item(player.inventory, name)
        .or_else(|| world.search_for_item(player.location, name))
}

pub fn handle_inventory(out: &mut Output, world: &World, player: &Player) {
    let carried = world.visible_contents(player.inventory);

    if carried.is_empty() {
        out.say("You aren't carrying anything.");
        return;
    }

    let mut lines = vec!["You have:".to_string()];
    lines.extend(carried.into_iter().map(|id| format!("    {}", world[id].name)));
    out.say(lines.join("\n"));
}

pub fn handle_take(out: &mut Output, world: &mut World, player: &Player, name: &str) {
    if world.search_for_item(player.inventory, name).is_some() {
        out.say("You already have that.");
        return;
    }

    let Some((item, parent)) = world.search_for_item(player.location, name) else {
        out.say("I can't find that.");
        return;
    };

    if !world[item].portable {
        out.say("You can't take that!");
        return;
    }

    if world.transfer(item, parent, player.inventory) {
        debug!(item = %world[item].id, from = %world[parent].id, "item taken");
        out.say(format!("Took {}.", world[item].name.to_lowercase()));
    }
}

pub fn handle_drop(out: &mut Output, world: &mut World, player: &Player, name: &str) {
    let Some((item, parent)) = world.search_for_item(player.inventory, name) else {
        out.say("You don't have that.");
        return;
    };

    if world.transfer(item, parent, player.location) {
        debug!(item = %world[item].id, to = %world[player.location].id, "item dropped");
        out.say(format!("Dropped {}.", world[item].name.to_lowercase()));
    }
}

pub fn handle_inspect(out: &mut Output, world: &World, player: &Player, name: &str) {
    let name = name.trim().to_lowercase();
    let room = &world[player.location];

    if name == "room" || name == room.name.to_lowercase() {
        out.say(room.desc.clone());
        return;
    }

    let Some((item, _)) = find_item(world, player, &name) else {
        out.say("I can't find that.");
        return;
    };

    let entity = &world[item];
    if entity.is_container() && !entity.is_locked() {
        let listing = world.display_contents(item);
        if entity.desc.trim().is_empty() {
            out.say(listing);
        } else {
            out.say(format!("{}\n{}", entity.desc, listing));
        }
    } else {
        out.say(entity.desc.clone());
    }
}

/// Unlock `target_name` with `key_name`. On success the revealed contents move out into
/// whatever held the container, so they stay reachable without re-opening it.
pub fn handle_unlock(
    out: &mut Output,
    world: &mut World,
    player: &Player,
    target_name: &str,
    key_name: &str,
) {
    let key = match world.config.key_policy {
        KeyPolicy::Inventory => world.search_for_item(player.inventory, key_name),
        KeyPolicy::Reachable => find_item(world, player, key_name),
    };
    let Some((key, _)) = key else {
        out.say("You don't have that key!");
        return;
    };

    // A direction names the neighbouring room, for locked doors.
    let target = find_item(world, player, target_name).or_else(|| {
        let direction = Direction::parse(target_name)?;
        let room = world.neighbour(player.location, direction)?;
        Some((room, player.location))
    });
    let Some((target, parent)) = target else {
        out.say("I can't find that.");
        return;
    };

    if !world[target].is_container() {
        out.say("You can't unlock that.");
        return;
    }

    match world.unlock(target, key) {
        UnlockOutcome::AlreadyUnlocked => out.say("It doesn't seem to be locked."),
        UnlockOutcome::WrongKey => out.say("The key doesn't seem to fit."),
        UnlockOutcome::NotLockable => out.say("You can't unlock that."),
        UnlockOutcome::Unlocked(listing) => {
            debug!(target = %world[target].id, key = %world[key].id, "unlocked");
            out.event(format!("The {} unlocks.", world[target].name.to_lowercase()));

            if world[target].is_room() {
                return;
            }

            out.say(listing);
            let revealed = world.contents(target).to_vec();
            for child in revealed {
                world.transfer(child, target, parent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Entity;

    struct Fixture {
        world: World,
        player: Player,
        room: EntityId,
        key: EntityId,
        chest: EntityId,
        sword: EntityId,
    }

    fn fixture() -> Fixture {
        let mut world = World::new("t", "T", "");
        let room = world.add(Entity::room("room", "Test Room", "A test room.")).unwrap();
        let key = world.add(Entity::item("key", "Key", "Rusty.")).unwrap();
        let chest = world
            .add(Entity::container("chest", "Old Chest", "Mossy.", true).with_keywords(["chest"]))
            .unwrap();
        let sword = world.add(Entity::item("sword", "Sword", "Sharp.")).unwrap();
        world.insert(room, key).unwrap();
        world.insert(room, chest).unwrap();
        world.insert(chest, sword).unwrap();
        world.set_key(chest, key).unwrap();

        let player = Player {
            location: room,
            inventory: world.inventory(),
        };
        Fixture {
            world,
            player,
            room,
            key,
            chest,
            sword,
        }
    }

    #[test]
    fn take_moves_exactly_once() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_take(&mut out, &mut f.world, &f.player, "key");
        assert!(out.contains("Took key."));
        assert_eq!(f.world.holders(f.key), vec![f.player.inventory]);

        let mut out = Output::new();
        handle_take(&mut out, &mut f.world, &f.player, "key");
        assert!(out.contains("You already have that."));
        assert_eq!(f.world.holders(f.key), vec![f.player.inventory]);
    }

    #[test]
    fn fixed_items_stay_put() {
        let mut f = fixture();
        f.world.get_mut(f.chest).portable = false;

        let mut out = Output::new();
        handle_take(&mut out, &mut f.world, &f.player, "chest");
        assert!(out.contains("You can't take that!"));
        assert_eq!(f.world.holders(f.chest), vec![f.room]);
    }

    #[test]
    fn locked_contents_cannot_be_taken() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_take(&mut out, &mut f.world, &f.player, "sword");
        assert!(out.contains("I can't find that."));
        assert_eq!(f.world.holders(f.sword), vec![f.chest]);
    }

    #[test]
    fn unlock_requires_carried_key_by_default() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_unlock(&mut out, &mut f.world, &f.player, "chest", "key");
        assert!(out.contains("You don't have that key!"));
        assert!(f.world[f.chest].is_locked());
    }

    #[test]
    fn reachable_policy_accepts_key_on_the_floor() {
        let mut f = fixture();
        f.world.config.key_policy = KeyPolicy::Reachable;

        let mut out = Output::new();
        handle_unlock(&mut out, &mut f.world, &f.player, "chest", "key");
        assert!(out.contains("The old chest unlocks."));
        assert!(!f.world[f.chest].is_locked());
        assert_eq!(f.world.holders(f.key), vec![f.room]);
    }

    #[test]
    fn unlock_reveals_and_relocates_contents() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_take(&mut out, &mut f.world, &f.player, "key");

        let mut out = Output::new();
        handle_unlock(&mut out, &mut f.world, &f.player, "chest", "key");
        assert_eq!(
            out.lines(),
            vec!["The old chest unlocks.", "The old chest contains:", "    Sword"]
        );
        assert_eq!(f.world.holders(f.sword), vec![f.room]);

        let mut out = Output::new();
        handle_unlock(&mut out, &mut f.world, &f.player, "chest", "key");
        assert!(out.contains("It doesn't seem to be locked."));
    }

    #[test]
    fn unlocking_plain_items_is_refused() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_take(&mut out, &mut f.world, &f.player, "key");

        let mut out = Output::new();
        handle_unlock(&mut out, &mut f.world, &f.player, "key", "key");
        assert!(out.contains("You can't unlock that."));

        let mut out = Output::new();
        handle_unlock(&mut out, &mut f.world, &f.player, "wardrobe", "key");
        assert!(out.contains("I can't find that."));
    }

    #[test]
    fn inspect_shows_contents_of_open_containers_only() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_inspect(&mut out, &f.world, &f.player, "chest");
        assert_eq!(out.lines(), vec!["Mossy."]);

        f.world.get_mut(f.chest).container.as_mut().unwrap().locked = false;
        let mut out = Output::new();
        handle_inspect(&mut out, &f.world, &f.player, "chest");
        assert_eq!(out.lines(), vec!["Mossy.", "The old chest contains:", "    Sword"]);

        let mut out = Output::new();
        handle_inspect(&mut out, &f.world, &f.player, "test room");
        assert_eq!(out.lines(), vec!["A test room."]);
    }

    #[test]
    fn drop_returns_items_to_the_room() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_drop(&mut out, &mut f.world, &f.player, "key");
        assert!(out.contains("You don't have that."));

        handle_take(&mut out, &mut f.world, &f.player, "key");
        let mut out = Output::new();
        handle_drop(&mut out, &mut f.world, &f.player, "key");
        assert!(out.contains("Dropped key."));
        assert_eq!(f.world.holders(f.key), vec![f.room]);
    }

    #[test]
    fn inventory_lists_visible_items() {
        let mut f = fixture();
        let mut out = Output::new();
        handle_inventory(&mut out, &f.world, &f.player);
        assert!(out.contains("You aren't carrying anything."));

        handle_take(&mut out, &mut f.world, &f.player, "key");
        let mut out = Output::new();
        handle_inventory(&mut out, &f.world, &f.player);
        assert_eq!(out.lines(), vec!["You have:", "    Key"]);
    }
}
