mod loader;
mod model;
mod validator;

pub use loader::{load_world_from_file, load_world_from_str};

pub use model::{
    ContainerProps, Description, Direction, Entity, EntityId, INVENTORY_ID, Player, RoomProps,
    UnlockOutcome, World,
};
pub use validator::{ValidationError, validate_world};
