use std::sync::OnceLock;

use serde::Serialize;

use crate::world::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Quit,
    Move,
    Inventory,
    Take,
    Drop,
    Interact,
    Unlock,
    Inspect,
    Look,
    Help,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Quit => "quit",
            Category::Move => "move",
            Category::Inventory => "inventory",
            Category::Take => "take",
            Category::Drop => "drop",
            Category::Interact => "interact",
            Category::Unlock => "unlock",
            Category::Inspect => "inspect",
            Category::Look => "look",
            Category::Help => "help",
        }
    }
}

/// A parsed line of player input. `None` arguments still have to be asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Unknown(String),
    Quit,
    Move(Option<String>),
    Inventory,
    Take(Option<String>),
    Drop(Option<String>),
    Use(Option<String>),
    Unlock {
        target: Option<String>,
        key: Option<String>,
    },
    Inspect(Option<String>),
    Look,
    Help,
}

impl Command {
    pub fn category(&self) -> Option<Category> {
        Some(match self {
            Command::Empty | Command::Unknown(_) => return None,
            Command::Quit => Category::Quit,
            Command::Move(_) => Category::Move,
            Command::Inventory => Category::Inventory,
            Command::Take(_) => Category::Take,
            Command::Drop(_) => Category::Drop,
            Command::Use(_) => Category::Interact,
            Command::Unlock { .. } => Category::Unlock,
            Command::Inspect(_) => Category::Inspect,
            Command::Look => Category::Look,
            Command::Help => Category::Help,
        })
    }
}

/// Keyword sets per category. Built once, never mutated.
#[derive(Debug)]
pub struct CommandTable {
    entries: Vec<(Category, Vec<&'static str>)>,
}

static STANDARD: OnceLock<CommandTable> = OnceLock::new();

impl CommandTable {
    pub fn new(entries: Vec<(Category, Vec<&'static str>)>) -> Self {
        CommandTable { entries }
    }

    /// The process-wide default vocabulary.
    pub fn standard() -> &'static CommandTable {
        STANDARD.get_or_init(|| {
            CommandTable::new(vec![
                (Category::Quit, vec!["quit", "q"]),
                (
                    Category::Move,
                    vec![
                        "move", "go", "walk", "n", "e", "s", "w", "north", "east", "south", "west",
                    ],
                ),
                (Category::Inventory, vec!["inventory", "i"]),
                (Category::Take, vec!["take", "grab", "get"]),
                (Category::Drop, vec!["drop", "discard"]),
                (Category::Interact, vec!["use"]),
                (Category::Unlock, vec!["unlock", "open"]),
                (Category::Inspect, vec!["inspect", "examine", "describe"]),
                (Category::Look, vec!["look", "l"]),
                (Category::Help, vec!["help", "h"]),
            ])
        })
    }

    pub fn categorize(&self, token: &str) -> Option<Category> {
        self.entries
            .iter()
            .find(|(_, tokens)| tokens.iter().any(|t| *t == token))
            .map(|(category, _)| *category)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Category, &[&'static str])> {
        self.entries.iter().map(|(c, t)| (*c, t.as_slice()))
    }

    /// Lower-case, split on whitespace, and classify by the first word.
    pub fn parse(&self, input: &str) -> Command {
        let lower = input.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();

        let Some((&verb, rest)) = tokens.split_first() else {
            return Command::Empty;
        };
        let arg = join(rest);

        match self.categorize(verb) {
            None => Command::Unknown(verb.to_string()),
            Some(Category::Quit) => Command::Quit,
            Some(Category::Move) => {
                if Direction::parse(verb).is_some() {
                    Command::Move(Some(verb.to_string()))
                } else {
                    Command::Move(arg)
                }
            }
            Some(Category::Inventory) => Command::Inventory,
            Some(Category::Take) => Command::Take(arg),
            Some(Category::Drop) => Command::Drop(arg),
            Some(Category::Interact) => Command::Use(arg),
            Some(Category::Unlock) => match rest.iter().position(|&t| t == "with") {
                Some(idx) => Command::Unlock {
                    target: join(&rest[..idx]),
                    key: join(&rest[idx + 1..]),
                },
                None => Command::Unlock {
                    target: arg,
                    key: None,
                },
            },
            Some(Category::Inspect) => Command::Inspect(arg),
            Some(Category::Look) => Command::Look,
            Some(Category::Help) => Command::Help,
        }
    }
}

fn join(tokens: &[&str]) -> Option<String> {
    (!tokens.is_empty()).then(|| tokens.join(" "))
}
