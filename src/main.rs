#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process::exit;

use clac::cli::{Cli, Commands};
use clac::ollama::OllamaSuggester;
use clac::{Engine, Resolution};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Suggest { line }) => print_suggestions(&line),
        Some(Commands::Specs) => {
            let engine = Engine::with_builtins();
            for name in engine.registry().names() {
                println!("{name}");
            }
            Ok(())
        }
        Some(Commands::Handoff { command }) => clac::cache::write_handoff(&command),
        Some(Commands::ClearHandoff) => clac::cache::clear_handoff(),
        Some(Commands::Prompt { prompt, model }) => {
            let suggester = OllamaSuggester::new(&model);
            for suggestion in suggester.complete(&prompt)? {
                println!("{}", suggestion.name);
            }
            Ok(())
        }
        None => {
            if let Some(line) = cli.line {
                print_suggestions(&line)
            } else {
                eprintln!("Usage: clac <line> | clac suggest <line> | clac specs");
                exit(2);
            }
        }
    }
}

fn print_suggestions(line: &str) -> Result<()> {
    let mut engine = Engine::with_builtins();
    let resolution = engine.load_suggestions(line);
    render(&resolution);
    Ok(())
}

fn render(resolution: &Resolution) {
    if resolution.suggestions.is_empty() {
        if let Some(argument) = &resolution.argument {
            println!("{}", format!("<{argument}>").bright_yellow());
        }
        return;
    }

    for suggestion in &resolution.suggestions {
        let prefix = suggestion.kind.display_prefix();
        if suggestion.description.is_empty() {
            println!("{} {}", prefix.dimmed(), suggestion.name.bright_green());
        } else {
            println!(
                "{} {} {}",
                prefix.dimmed(),
                suggestion.name.bright_green(),
                suggestion.description.dimmed()
            );
        }
    }
}
