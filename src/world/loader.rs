use serde::Deserialize;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::model::{Direction, Entity, EntityId, World};
use super::validator::validate_world;
use crate::config::EngineConfig;
use crate::error::WorldError;

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct WorldFile {
    world: WorldHeader,
    #[serde(default)]
    engine: EngineConfig, // optional [engine]
    #[serde(default)]
    room: Vec<RoomConfig>, // [[room]] blocks
    #[serde(default)]
    item: Vec<ItemConfig>, // [[item]] blocks
}

#[derive(Deserialize)]
struct WorldHeader {
    id: String,
    name: String,
    start_room: String,
    #[serde(default)]
    desc: String,
}

#[derive(Deserialize)]
struct RoomConfig {
    id: String,
    name: String,
    #[serde(default)]
    desc: String,

    #[serde(default)]
    locked: bool,

    #[serde(default)]
    key: Option<String>,

    #[serde(default)]
    exit: Vec<ExitConfig>, // [[room.exit]]
}

#[derive(Deserialize)]
struct ExitConfig {
    direction: String,
    target: String,
}

#[derive(Deserialize)]
struct ItemConfig {
    /// Falls back to the primary name when omitted.
    #[serde(default)]
    id: Option<String>,

    /// "Primary Name|alias|another alias"
    name: String,

    /// Where the item starts: "room:hall", "item:chest" or "inventory".
    #[serde(alias = "location")]
    start_location: String,

    #[serde(default)]
    desc: String,

    #[serde(default)]
    keywords: Vec<String>,

    #[serde(default)]
    portable: Option<bool>,

    #[serde(default)]
    interactable: Option<bool>,

    #[serde(default)]
    hidden: bool,

    #[serde(default)]
    kind: Option<String>, // "simple" or "container"

    #[serde(default)]
    locked: bool,

    #[serde(default)]
    key: Option<String>,
}

enum StartLocation {
    Room(String),
    Item(String),
    Inventory,
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Load a world from a .toml file on disk.
pub fn load_world_from_file(path: &Path) -> Result<World, WorldError> {
    let contents = fs::read_to_string(path)?;
    load_world_from_str(&contents)
}

/// Build and validate a world from TOML text. Any inconsistency aborts construction.
pub fn load_world_from_str(contents: &str) -> Result<World, WorldError> {
    let file: WorldFile = toml::from_str(contents)?;

    if file.world.id.trim().is_empty() {
        return Err(WorldError::EmptyField { field: "world.id" });
    }
    if file.world.start_room.trim().is_empty() {
        return Err(WorldError::EmptyField {
            field: "world.start_room",
        });
    }

    let mut world = World::new(
        file.world.id,
        file.world.name,
        normalize_multiline_desc(&file.world.desc),
    );
    world.config = file.engine;

    // Rooms first so item locations and exits can resolve against them.
    for rc in &file.room {
        if rc.name.trim().is_empty() {
            return Err(WorldError::EmptyName(rc.id.clone()));
        }
        let room = Entity::room(&rc.id, rc.name.trim(), normalize_multiline_desc(&rc.desc))
            .locked(rc.locked);
        world.add(room)?;
    }

    // Items are added, then placed, in file order; that order is the search order.
    let mut placements: Vec<(EntityId, StartLocation, Option<String>)> = Vec::new();

    for ic in file.item {
        let (primary_name, aliases) = parse_name_and_aliases(&ic.name);
        let id = ic.id.clone().unwrap_or_else(|| primary_name.to_lowercase());
        if primary_name.is_empty() {
            return Err(WorldError::EmptyName(id));
        }

        let start_location = parse_start_location(&ic.start_location)?;
        let desc = normalize_multiline_desc(&ic.desc);

        let entity = match ic.kind.as_deref().map(str::to_lowercase).as_deref() {
            Some("container") => Entity::container(&id, &primary_name, desc, ic.locked),
            Some("simple") | None => Entity::item(&id, &primary_name, desc),
            Some(other) => {
                warn!(item = %id, kind = other, "unknown item kind, defaulting to simple");
                Entity::item(&id, &primary_name, desc)
            }
        };

        if !entity.is_container() && (ic.locked || ic.key.is_some()) {
            warn!(item = %id, "lock settings on a non-container are ignored");
        }

        let entity = entity
            .with_keywords(aliases)
            .with_keywords(&ic.keywords)
            .portable(ic.portable.unwrap_or(true))
            .interactable(ic.interactable.unwrap_or(true))
            .hidden(ic.hidden);

        let key = if entity.is_container() { ic.key } else { None };
        let handle = world.add(entity)?;
        placements.push((handle, start_location, key));
    }

    for (handle, location, key) in placements {
        let holder = resolve_location(&world, &location)?;
        world.insert(holder, handle)?;

        if let Some(key_id) = key {
            attach_key(&mut world, handle, &key_id)?;
        }
    }

    for rc in &file.room {
        let room = world
            .lookup(&rc.id)
            .ok_or_else(|| WorldError::UnknownRoom(rc.id.clone()))?;

        if let Some(key_id) = &rc.key {
            attach_key(&mut world, room, key_id)?;
        }

        for exit in &rc.exit {
            let direction = Direction::parse(&exit.direction)
                .ok_or_else(|| WorldError::UnknownDirection(exit.direction.clone()))?;
            let target = lookup_room(&world, &exit.target)?;
            world.link_neighbour(room, direction, target)?;
        }
    }

    let start = lookup_room(&world, &file.world.start_room)?;
    world.set_start_room(start)?;

    let errors = validate_world(&world);
    if !errors.is_empty() {
        return Err(WorldError::Invalid(errors));
    }

    for (_, entity) in world.entities() {
        if let Some(props) = &entity.container {
            if props.locked && props.key.is_none() {
                warn!(id = %entity.id, "locked with no key; it can never be opened");
            }
        }
    }

    info!(
        world = %world.id,
        entities = world.entities().count(),
        "world loaded"
    );

    Ok(world)
}

fn lookup_room(world: &World, id: &str) -> Result<EntityId, WorldError> {
    match world.lookup(id) {
        Some(room) if world[room].is_room() => Ok(room),
        _ => Err(WorldError::UnknownRoom(id.to_string())),
    }
}

fn resolve_location(world: &World, location: &StartLocation) -> Result<EntityId, WorldError> {
    match location {
        StartLocation::Inventory => Ok(world.inventory()),
        StartLocation::Room(id) => lookup_room(world, id),
        StartLocation::Item(id) => {
            let holder = world
                .lookup(id)
                .ok_or_else(|| WorldError::UnknownItem(id.clone()))?;
            if !world[holder].is_container() || world[holder].is_room() {
                return Err(WorldError::NotAContainer(id.clone()));
            }
            Ok(holder)
        }
    }
}

fn attach_key(world: &mut World, owner: EntityId, key_id: &str) -> Result<(), WorldError> {
    let key = world.lookup(key_id).ok_or_else(|| WorldError::UnknownKey {
        owner: world[owner].id.clone(),
        key: key_id.to_string(),
    })?;
    world.set_key(owner, key)
}

/// Fold TOML line wrapping: a single newline becomes a space, one blank line a line
/// break, two or more a paragraph break. Indentation is dropped.
fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut blank_run = 0usize;

    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }

        if !result.is_empty() {
            result.push_str(match blank_run {
                0 => " ",
                1 => "\n",
                _ => "\n\n",
            });
        }
        result.push_str(line);
        blank_run = 0;
    }

    result
}

////////////////////////////
/// ITEM PARSE HELPERS   ///
////////////////////////////

fn parse_start_location(s: &str) -> Result<StartLocation, WorldError> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("inventory") {
        return Ok(StartLocation::Inventory);
    }

    let parsed = if let Some(rest) = s.strip_prefix("room:") {
        Some(StartLocation::Room(rest.trim().to_string()))
    } else {
        s.strip_prefix("item:")
            .map(|rest| StartLocation::Item(rest.trim().to_string()))
    };

    match parsed {
        Some(StartLocation::Room(id) | StartLocation::Item(id)) if id.is_empty() => {
            Err(WorldError::InvalidLocation(s.to_string()))
        }
        Some(location) => Ok(location),
        None => Err(WorldError::InvalidLocation(s.to_string())),
    }
}

fn parse_name_and_aliases(raw: &str) -> (String, Vec<String>) {
    let mut parts = raw.split('|').map(str::trim).filter(|s| !s.is_empty());

    let primary = parts.next().unwrap_or_default().to_string();
    let aliases = parts.map(str::to_string).collect();
    (primary, aliases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyPolicy;

    const MINIMAL: &str = r#"
        [world]
        id = "mini"
        name = "Mini"
        start_room = "hall"

        [[room]]
        id = "hall"
        name = "Hall"
        desc = """
            A long hall.
            Dusty.

            Quiet.
        """

        [[room.exit]]
        direction = "n"
        target = "attic"

        [[room]]
        id = "attic"
        name = "Attic"

        [[item]]
        name = "Old Lamp|lamp|lantern"
        start_location = "room:hall"
        desc = "Brass."

        [[item]]
        id = "box"
        name = "Box"
        kind = "container"
        locked = true
        key = "old lamp"
        start_location = "room:attic"
    "#;

    #[test]
    fn loads_rooms_items_and_links() {
        let world = load_world_from_str(MINIMAL).unwrap();
        let hall = world.lookup("hall").unwrap();
        let attic = world.lookup("attic").unwrap();
        let lamp = world.lookup("old lamp").unwrap();
        let boxed = world.lookup("box").unwrap();

        assert_eq!(world.start_room(), Some(hall));
        assert_eq!(world[hall].desc, "A long hall. Dusty.\nQuiet.");
        assert_eq!(world.neighbour(hall, Direction::North), Some(attic));
        assert_eq!(world.neighbour(attic, Direction::South), Some(hall));
        assert_eq!(world.contents(hall), &[lamp]);
        assert!(world[lamp].matches("lantern"));
        assert!(world[lamp].matches("old lamp"));
        assert!(world[boxed].is_locked());
        assert_eq!(world[boxed].container.as_ref().unwrap().key, Some(lamp));
        assert_eq!(world.config.key_policy, KeyPolicy::Inventory);
    }

    #[test]
    fn reverse_exit_declared_twice_fails_fast() {
        let doubled = MINIMAL.replace(
            "[[room]]\n        id = \"attic\"\n        name = \"Attic\"",
            "[[room]]\n        id = \"attic\"\n        name = \"Attic\"\n\n        [[room.exit]]\n        direction = \"south\"\n        target = \"hall\"",
        );
        assert!(matches!(
            load_world_from_str(&doubled),
            Err(WorldError::NeighbourTaken { .. })
        ));
    }

    #[test]
    fn bad_direction_fails_fast() {
        let bad = MINIMAL.replace("direction = \"n\"", "direction = \"up\"");
        assert!(matches!(
            load_world_from_str(&bad),
            Err(WorldError::UnknownDirection(d)) if d == "up"
        ));
    }

    #[test]
    fn unknown_references_are_rejected() {
        let bad_room = MINIMAL.replace("room:attic", "room:cellar");
        assert!(matches!(
            load_world_from_str(&bad_room),
            Err(WorldError::UnknownRoom(r)) if r == "cellar"
        ));

        let bad_key = MINIMAL.replace("key = \"old lamp\"", "key = \"crowbar\"");
        assert!(matches!(
            load_world_from_str(&bad_key),
            Err(WorldError::UnknownKey { key, .. }) if key == "crowbar"
        ));

        let bad_start = MINIMAL.replace("start_room = \"hall\"", "start_room = \"box\"");
        assert!(matches!(
            load_world_from_str(&bad_start),
            Err(WorldError::UnknownRoom(_))
        ));
    }

    #[test]
    fn items_cannot_start_inside_plain_items() {
        let bad = MINIMAL.replace(
            "start_location = \"room:attic\"",
            "start_location = \"item:old lamp\"",
        );
        assert!(matches!(
            load_world_from_str(&bad),
            Err(WorldError::NotAContainer(_))
        ));
    }

    #[test]
    fn location_is_accepted_for_start_location() {
        let short = MINIMAL.replace("start_location = \"room:hall\"", "location = \"room:hall\"");
        let world = load_world_from_str(&short).unwrap();
        let hall = world.lookup("hall").unwrap();
        let lamp = world.lookup("old lamp").unwrap();
        assert_eq!(world.holders(lamp), vec![hall]);
    }

    #[test]
    fn location_syntax_is_checked() {
        assert!(matches!(
            parse_start_location("room:"),
            Err(WorldError::InvalidLocation(_))
        ));
        assert!(matches!(
            parse_start_location("shelf"),
            Err(WorldError::InvalidLocation(_))
        ));
        assert!(matches!(
            parse_start_location(" Inventory "),
            Ok(StartLocation::Inventory)
        ));
    }

    #[test]
    fn names_split_into_aliases() {
        let (primary, aliases) = parse_name_and_aliases(" Rusty Key | key ||rusty key ");
        assert_eq!(primary, "Rusty Key");
        assert_eq!(aliases, vec!["key", "rusty key"]);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            load_world_from_str("[world\nid = 1"),
            Err(WorldError::Parse(_))
        ));
    }
}
