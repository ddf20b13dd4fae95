pub mod config;
pub mod engine;
pub mod error;
pub mod world;

use serde::Serialize;
use tracing::debug;

use engine::{
    Category, Command, CommandTable, NoPrompt, Output, Prompt, find_item, handle_drop,
    handle_inspect, handle_inventory, handle_move, handle_take, handle_unlock, render_look,
    render_room,
};
use world::{Player, World};

pub use config::{EngineConfig, KeyPolicy};
pub use error::WorldError;
pub use world::{load_world_from_file, load_world_from_str};

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Continue,
    Quit,
    /// The command is recognized but the engine has no behaviour for it yet.
    NotImplemented(Category),
}

/// One game session. Clone a freshly initialized state to give each session its own world.
#[derive(Debug, Clone)]
pub struct GameState {
    pub world: World,
    pub player: Player,
    commands: &'static CommandTable,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[derive(Serialize)]
    struct WasmStepResult {
        blocks: Vec<engine::OutputBlock>,
        outcome: Outcome,
    }

    #[wasm_bindgen]
    pub struct WasmGame {
        state: GameState,
        initialized: bool,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Create a new game from a TOML world string. Call `init()` to get the initial render.
        #[wasm_bindgen(constructor)]
        pub fn new(world_toml: &str) -> Result<WasmGame, JsValue> {
            let state =
                initialize_world(world_toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WasmGame {
                state,
                initialized: false,
            })
        }

        /// Initial render of the starting room.
        #[wasm_bindgen]
        pub fn init(&mut self) -> JsValue {
            self.initialized = true;
            let out = self.state.describe_current_room();
            to_value(&WasmStepResult {
                blocks: out.blocks,
                outcome: Outcome::Continue,
            })
            .unwrap_or(JsValue::NULL)
        }

        /// Process one command. The browser cannot answer follow-up questions, so they
        /// come back as the response instead, and `quit` is always declined.
        #[wasm_bindgen]
        pub fn step(&mut self, input: &str) -> JsValue {
            let (out, outcome) = if self.initialized {
                process_command(&mut self.state, input)
            } else {
                self.initialized = true;
                process_opening_command(&mut self.state, input)
            };
            to_value(&WasmStepResult {
                blocks: out.blocks,
                outcome,
            })
            .unwrap_or(JsValue::NULL)
        }
    }
}

/// Parse a TOML world and place a player in its starting room.
pub fn initialize_world(world_toml: &str) -> Result<GameState, WorldError> {
    GameState::new(load_world_from_str(world_toml)?)
}

/// Run one command with no way to ask follow-up questions.
pub fn process_command(state: &mut GameState, input: &str) -> (Output, Outcome) {
    state.step(input, &mut NoPrompt)
}

/// Like `process_command`, for a host that never asked for the initial render: the
/// starting room comes first, then the command's own response.
pub fn process_opening_command(state: &mut GameState, input: &str) -> (Output, Outcome) {
    let mut out = state.describe_current_room();
    let (response, outcome) = process_command(state, input);
    out.blocks.extend(response.blocks);
    (out, outcome)
}

impl GameState {
    pub fn new(world: World) -> Result<Self, WorldError> {
        let location = world.start_room().ok_or(WorldError::EmptyField {
            field: "world.start_room",
        })?;
        let player = Player {
            location,
            inventory: world.inventory(),
        };

        Ok(GameState {
            world,
            player,
            commands: CommandTable::standard(),
        })
    }

    /// Initial render; counts as the first visit to the starting room.
    pub fn describe_current_room(&mut self) -> Output {
        let mut out = Output::new();
        render_room(&mut out, &mut self.world, self.player.location);
        out
    }

    /// Process a single player input. Missing arguments are asked for through `prompt`
    /// before anything is dispatched.
    pub fn step(&mut self, input: &str, prompt: &mut dyn Prompt) -> (Output, Outcome) {
        let mut out = Output::new();
        let command = self.commands.parse(input);
        debug!(input, category = ?command.category(), "dispatching command");

        let outcome = match command {
            Command::Empty => Outcome::Continue,
            Command::Unknown(_) => {
                out.say("I don't understand.");
                Outcome::Continue
            }
            Command::Quit => {
                let answer = prompt.ask("Are you sure you want to quit? (y/n)");
                if answer.is_some_and(|a| a.trim().to_lowercase().starts_with('y')) {
                    out.say("Ending the game...");
                    Outcome::Quit
                } else {
                    out.say("Okay.");
                    Outcome::Continue
                }
            }
            Command::Move(direction) => {
                if let Some(direction) = require(&mut out, prompt, direction, "Move where?") {
                    handle_move(&mut out, &mut self.world, &mut self.player, &direction);
                }
                Outcome::Continue
            }
            Command::Inventory => {
                handle_inventory(&mut out, &self.world, &self.player);
                Outcome::Continue
            }
            Command::Take(name) => {
                if let Some(name) = require(&mut out, prompt, name, "Take what?") {
                    handle_take(&mut out, &mut self.world, &self.player, &name);
                }
                Outcome::Continue
            }
            Command::Drop(name) => {
                if let Some(name) = require(&mut out, prompt, name, "Drop what?") {
                    handle_drop(&mut out, &mut self.world, &self.player, &name);
                }
                Outcome::Continue
            }
            Command::Use(name) => {
                if let Some(name) = &name {
                    if find_item(&self.world, &self.player, name).is_none() {
                        out.say("I can't find that.");
                        return (out, Outcome::Continue);
                    }
                }
                out.say("You can't do that yet.");
                Outcome::NotImplemented(Category::Interact)
            }
            Command::Unlock { target, key } => {
                let Some(target) = require(&mut out, prompt, target, "Unlock what?") else {
                    return (out, Outcome::Continue);
                };
                if let Some(key) = require(&mut out, prompt, key, "Unlock it with what?") {
                    handle_unlock(&mut out, &mut self.world, &self.player, &target, &key);
                }
                Outcome::Continue
            }
            Command::Inspect(name) => {
                if let Some(name) = require(&mut out, prompt, name, "Inspect what?") {
                    handle_inspect(&mut out, &self.world, &self.player, &name);
                }
                Outcome::Continue
            }
            Command::Look => {
                render_look(&mut out, &self.world, self.player.location);
                Outcome::Continue
            }
            Command::Help => {
                let mut lines = vec!["Commands:".to_string()];
                for (category, tokens) in self.commands.entries() {
                    lines.push(format!("    {}: {}", category.as_str(), tokens.join(", ")));
                }
                out.say(lines.join("\n"));
                Outcome::Continue
            }
        };

        (out, outcome)
    }
}

/// Use `arg` if given, otherwise ask. With no answer the question is the response.
fn require(
    out: &mut Output,
    prompt: &mut dyn Prompt,
    arg: Option<String>,
    question: &str,
) -> Option<String> {
    if arg.is_some() {
        return arg;
    }

    match prompt.ask(question) {
        Some(answer) if !answer.trim().is_empty() => Some(answer.trim().to_lowercase()),
        _ => {
            out.say(question);
            None
        }
    }
}
