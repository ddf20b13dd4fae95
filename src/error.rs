use std::io;

use thiserror::Error;

use crate::world::{Direction, ValidationError};

/// Errors raised while building a world from static data.
///
/// Gameplay mistakes never surface here; they are rendered as player-facing text.
/// Anything in this enum means the world definition itself is corrupt.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("failed to read world file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse world file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} may not be empty")]
    EmptyField { field: &'static str },

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("'{0}' has an empty name")]
    EmptyName(String),

    #[error("unknown room '{0}'")]
    UnknownRoom(String),

    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("'{owner}' references missing key '{key}'")]
    UnknownKey { owner: String, key: String },

    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    #[error("'{0}' is not a container")]
    NotAContainer(String),

    #[error("'{0}' is not a room")]
    NotARoom(String),

    #[error("room '{room}' already has a neighbour to the {direction}")]
    NeighbourTaken { room: String, direction: Direction },

    #[error("invalid location '{0}': expected 'room:<id>', 'item:<id>' or 'inventory'")]
    InvalidLocation(String),

    #[error("world failed validation: {}", .0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<ValidationError>),
}
