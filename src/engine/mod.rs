mod commands;
mod items;
mod movement;
mod output;
mod prompt;
mod render;

pub use commands::{Category, Command, CommandTable};

pub use items::{
    find_item, handle_drop, handle_inspect, handle_inventory, handle_take, handle_unlock,
};

pub use movement::handle_move;
pub use output::{Output, OutputBlock};
pub use prompt::{NoPrompt, Prompt, ScriptedPrompt};
pub use render::{exits_line, render_look, render_room};
