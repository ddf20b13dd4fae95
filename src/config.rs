use serde::Deserialize;

/// Where a key has to be for `unlock` to accept it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// The key must be carried.
    #[default]
    Inventory,
    /// The key only has to be findable from where the player stands.
    Reachable,
}

/// Engine knobs read from the optional `[engine]` table of a world file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub key_policy: KeyPolicy,
}
