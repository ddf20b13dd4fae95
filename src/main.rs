use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use delve::engine::{Output, OutputBlock, Prompt};
use delve::{GameState, Outcome, load_world_from_file};

#[derive(Debug, Parser)]
#[command(version, about = "Explore a text adventure world.", long_about = None)]
struct Arguments {
    /// World definition to play.
    #[arg(default_value = "worlds/test_world.toml")]
    world: PathBuf,
}

/// Answers follow-up questions from the terminal.
struct ConsolePrompt<R> {
    input: R,
}

impl<R: BufRead> ConsolePrompt<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead> Prompt for ConsolePrompt<R> {
    fn ask(&mut self, question: &str) -> Option<String> {
        println!("{}", question);
        self.read_line().ok().flatten()
    }
}

fn flush_output(out: Output) {
    let mut printed_anything = false;

    for block in out.blocks {
        match block {
            OutputBlock::Title(t) => println!("\n{}", t),
            OutputBlock::Text(line) => println!("{}", line),
            OutputBlock::Event(ev) => {
                if printed_anything {
                    println!();
                }
                println!("{}", ev);
            }
            OutputBlock::Exits(exits) => println!("\n{}", exits),
        }
        printed_anything = true;
    }
}

fn main() -> ExitCode {
    let arguments = Arguments::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let world = match load_world_from_file(&arguments.world) {
        Ok(w) => w,
        Err(e) => {
            eprintln!(
                "Failed to load world file '{}': {e}",
                arguments.world.display()
            );
            return ExitCode::FAILURE;
        }
    };

    println!("Welcome to {}!", world.name);
    if !world.desc.trim().is_empty() {
        println!("{}", world.desc.trim());
    }
    println!("Type 'help' for a list of commands.");

    let mut state = match GameState::new(world) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start game: {e}");
            return ExitCode::FAILURE;
        }
    };
    flush_output(state.describe_current_room());

    let mut prompt = ConsolePrompt {
        input: io::stdin().lock(),
    };

    loop {
        let line = match prompt.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                println!("\nGoodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        };

        let (out, outcome) = state.step(&line, &mut prompt);
        flush_output(out);

        if outcome == Outcome::Quit {
            break;
        }
    }

    ExitCode::SUCCESS
}
