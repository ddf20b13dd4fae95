use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use crate::config::EngineConfig;
use crate::error::WorldError;

//////////////////////////////
/// GAME STRUCTS AND ENUMS ///
//////////////////////////////

/// Index of an entity inside a [`World`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical order, also used when listing exits.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Full word or single-letter shortcut, case-insensitive.
    pub fn parse(token: &str) -> Option<Direction> {
        match token.trim().to_lowercase().as_str() {
            "north" | "n" => Some(Direction::North),
            "east" | "e" => Some(Direction::East),
            "south" | "s" => Some(Direction::South),
            "west" | "w" => Some(Direction::West),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    fn slot(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Containment capability. Contents keep insertion order, which is also search order.
#[derive(Debug, Clone, Default)]
pub struct ContainerProps {
    pub contents: Vec<EntityId>,
    pub locked: bool,
    pub key: Option<EntityId>,
}

/// Topology capability carried by rooms.
#[derive(Debug, Clone, Default)]
pub struct RoomProps {
    pub visited: bool,
    pub neighbours: [Option<EntityId>; 4],
}

/// Base record shared by items, containers and rooms.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Lower-cased aliases a typed noun is matched against.
    pub keywords: Vec<String>,
    pub desc: String,
    pub portable: bool,
    pub interactable: bool,
    pub hidden: bool,
    pub container: Option<ContainerProps>,
    pub room: Option<RoomProps>,
}

impl Entity {
    /// A plain portable item; its lower-cased name is its first keyword.
    pub fn item(id: impl Into<String>, name: impl Into<String>, desc: impl Into<String>) -> Self {
        let name = name.into();
        Entity {
            id: id.into(),
            keywords: vec![name.to_lowercase()],
            name,
            desc: desc.into(),
            portable: true,
            interactable: true,
            hidden: false,
            container: None,
            room: None,
        }
    }

    pub fn container(
        id: impl Into<String>,
        name: impl Into<String>,
        desc: impl Into<String>,
        locked: bool,
    ) -> Self {
        Entity {
            container: Some(ContainerProps {
                locked,
                ..ContainerProps::default()
            }),
            ..Entity::item(id, name, desc)
        }
    }

    /// Rooms are never matched by keyword; they are addressed by name or "room".
    pub fn room(id: impl Into<String>, name: impl Into<String>, desc: impl Into<String>) -> Self {
        Entity {
            keywords: Vec::new(),
            portable: false,
            interactable: false,
            container: Some(ContainerProps::default()),
            room: Some(RoomProps::default()),
            ..Entity::item(id, name, desc)
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !self.keywords.contains(&kw) {
                self.keywords.push(kw);
            }
        }
        self
    }

    pub fn portable(mut self, portable: bool) -> Self {
        self.portable = portable;
        self
    }

    pub fn interactable(mut self, interactable: bool) -> Self {
        self.interactable = interactable;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        if let Some(props) = self.container.as_mut() {
            props.locked = locked;
        }
        self
    }

    pub fn matches(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.keywords.iter().any(|kw| *kw == word)
    }

    pub fn is_room(&self) -> bool {
        self.room.is_some()
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.container.as_ref().is_some_and(|c| c.locked)
    }
}

pub enum UnlockOutcome {
    AlreadyUnlocked,
    WrongKey,
    NotLockable,
    /// Carries the listing of the now-visible contents.
    Unlocked(String),
}

/// What a room shows when described.
pub struct Description {
    pub name: String,
    /// Present only on the first visit.
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub location: EntityId,
    pub inventory: EntityId,
}

/// Arena holding every entity of one game session.
///
/// Cloning a `World` yields a fully independent copy: links are indices, never references.
#[derive(Debug, Clone)]
pub struct World {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub config: EngineConfig,
    start_room: Option<EntityId>,
    entities: Vec<Entity>,
    index: HashMap<String, EntityId>,
}

/// Reserved id of the player's inventory container.
pub const INVENTORY_ID: &str = "inventory";

impl World {
    pub fn new(id: impl Into<String>, name: impl Into<String>, desc: impl Into<String>) -> Self {
        let inventory = Entity {
            keywords: Vec::new(),
            portable: false,
            interactable: false,
            hidden: true,
            ..Entity::container(INVENTORY_ID, "Inventory", "The things you carry.", false)
        };

        let mut index = HashMap::new();
        index.insert(INVENTORY_ID.to_string(), EntityId(0));

        World {
            id: id.into(),
            name: name.into(),
            desc: desc.into(),
            config: EngineConfig::default(),
            start_room: None,
            entities: vec![inventory],
            index,
        }
    }

    pub fn inventory(&self) -> EntityId {
        EntityId(0)
    }

    pub fn start_room(&self) -> Option<EntityId> {
        self.start_room
    }

    pub fn set_start_room(&mut self, room: EntityId) -> Result<(), WorldError> {
        if !self[room].is_room() {
            return Err(WorldError::NotARoom(self[room].id.clone()));
        }
        self.start_room = Some(room);
        Ok(())
    }

    pub fn add(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        if self.index.contains_key(&entity.id) {
            return Err(WorldError::DuplicateId(entity.id));
        }
        let id = EntityId(self.entities.len());
        self.index.insert(entity.id.clone(), id);
        self.entities.push(entity);
        Ok(id)
    }

    pub fn lookup(&self, id: &str) -> Option<EntityId> {
        self.index.get(id).copied()
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().enumerate().map(|(i, e)| (EntityId(i), e))
    }

    pub fn rooms(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities().filter(|(_, e)| e.is_room()).map(|(id, _)| id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0]
    }

    pub fn contents(&self, container: EntityId) -> &[EntityId] {
        self[container]
            .container
            .as_ref()
            .map(|c| c.contents.as_slice())
            .unwrap_or(&[])
    }

    /// Place `item` inside `container` at world-build time.
    pub fn insert(&mut self, container: EntityId, item: EntityId) -> Result<(), WorldError> {
        if self[item].is_room() {
            return Err(WorldError::NotAContainer(self[item].id.clone()));
        }
        let owner = self[container].id.clone();
        let props = self
            .get_mut(container)
            .container
            .as_mut()
            .ok_or(WorldError::NotAContainer(owner))?;
        if !props.contents.contains(&item) {
            props.contents.push(item);
        }
        Ok(())
    }

    pub fn set_key(&mut self, container: EntityId, key: EntityId) -> Result<(), WorldError> {
        let owner = self[container].id.clone();
        let props = self
            .get_mut(container)
            .container
            .as_mut()
            .ok_or(WorldError::NotAContainer(owner))?;
        props.key = Some(key);
        Ok(())
    }

    /// Move `item` from `from` to `to`. Nothing changes unless both are containers and
    /// `item` is actually in `from`.
    pub fn transfer(&mut self, item: EntityId, from: EntityId, to: EntityId) -> bool {
        if !self[to].is_container() || !self.contents(from).contains(&item) {
            return false;
        }
        if let Some(props) = self.get_mut(from).container.as_mut() {
            props.contents.retain(|&c| c != item);
        }
        if let Some(props) = self.get_mut(to).container.as_mut() {
            if !props.contents.contains(&item) {
                props.contents.push(item);
            }
        }
        true
    }

    /// Every container currently holding `item`. A consistent world yields exactly one.
    pub fn holders(&self, item: EntityId) -> Vec<EntityId> {
        self.entities()
            .filter(|(_, e)| {
                e.container
                    .as_ref()
                    .is_some_and(|c| c.contents.contains(&item))
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Depth-first search in insertion order for an entity whose keywords contain `name`.
    /// Nested locked containers are opaque. Returns the match and its direct parent.
    pub fn search_for_item(
        &self,
        container: EntityId,
        name: &str,
    ) -> Option<(EntityId, EntityId)> {
        for &child in self.contents(container) {
            let entity = &self[child];
            if entity.matches(name) {
                return Some((child, container));
            }
            if entity.is_container() && !entity.is_locked() {
                if let Some(hit) = self.search_for_item(child, name) {
                    return Some(hit);
                }
            }
        }
        None
    }

    pub fn unlock(&mut self, container: EntityId, key: EntityId) -> UnlockOutcome {
        let Some(props) = self.get_mut(container).container.as_mut() else {
            return UnlockOutcome::NotLockable;
        };
        if !props.locked {
            return UnlockOutcome::AlreadyUnlocked;
        }
        if props.key != Some(key) {
            return UnlockOutcome::WrongKey;
        }
        props.locked = false;
        UnlockOutcome::Unlocked(self.display_contents(container))
    }

    /// Listing of non-hidden contents, one level deep into unlocked nested containers.
    pub fn display_contents(&self, container: EntityId) -> String {
        let name = self[container].name.to_lowercase();
        let visible = self.visible_contents(container);

        if visible.is_empty() {
            return format!("The {} is empty.", name);
        }

        let mut lines = vec![format!("The {} contains:", name)];
        for child in visible {
            let entity = &self[child];
            lines.push(format!("    {}", entity.name));
            if entity.is_container() && !entity.is_locked() {
                for inner in self.visible_contents(child) {
                    lines.push(format!("        {}", self[inner].name));
                }
            }
        }
        lines.join("\n")
    }

    pub fn visible_contents(&self, container: EntityId) -> Vec<EntityId> {
        self.contents(container)
            .iter()
            .copied()
            .filter(|&c| !self[c].hidden)
            .collect()
    }

    /// Name, plus the description on the first call only. Marks the room visited.
    pub fn describe(&mut self, room: EntityId) -> Description {
        let entity = self.get_mut(room);
        let first_visit = match entity.room.as_mut() {
            Some(props) if !props.visited => {
                props.visited = true;
                true
            }
            _ => false,
        };

        Description {
            name: entity.name.clone(),
            desc: first_visit.then(|| entity.desc.clone()),
        }
    }

    pub fn neighbour(&self, room: EntityId, direction: Direction) -> Option<EntityId> {
        self[room]
            .room
            .as_ref()
            .and_then(|r| r.neighbours[direction.slot()])
    }

    pub fn exits(&self, room: EntityId) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.neighbour(room, d).is_some())
            .collect()
    }

    /// Link `room` to `target` in `direction`, and `target` back in the opposite direction.
    /// Either slot already being taken means the static world is corrupt.
    pub fn link_neighbour(
        &mut self,
        room: EntityId,
        direction: Direction,
        target: EntityId,
    ) -> Result<(), WorldError> {
        for id in [room, target] {
            if !self[id].is_room() {
                return Err(WorldError::NotARoom(self[id].id.clone()));
            }
        }
        if self.neighbour(room, direction).is_some() {
            return Err(WorldError::NeighbourTaken {
                room: self[room].id.clone(),
                direction,
            });
        }
        if self.neighbour(target, direction.opposite()).is_some() {
            return Err(WorldError::NeighbourTaken {
                room: self[target].id.clone(),
                direction: direction.opposite(),
            });
        }

        if let Some(props) = self.get_mut(room).room.as_mut() {
            props.neighbours[direction.slot()] = Some(target);
        }
        if let Some(props) = self.get_mut(target).room.as_mut() {
            props.neighbours[direction.opposite().slot()] = Some(room);
        }
        Ok(())
    }
}

impl Index<EntityId> for World {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }
}
