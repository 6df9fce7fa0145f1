#![warn(clippy::all, clippy::pedantic)]

use clap::{Parser, Subcommand};

use crate::ollama::DEFAULT_MODEL;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Command line to complete (shorthand for `suggest`)
    pub line: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve suggestions for a partially typed command line
    Suggest {
        /// The partially typed command line
        line: String,
    },
    /// List the registered root commands
    Specs,
    /// Persist an accepted command for the shell binding to read back
    Handoff {
        /// The accepted command line
        command: String,
    },
    /// Truncate the hand-off file
    ClearHandoff,
    /// Ask a local Ollama model for completion candidates
    Prompt {
        /// Prompt to send
        prompt: String,
        /// Model to use (overrides default)
        #[arg(long, default_value_t = DEFAULT_MODEL.to_string())]
        model: String,
    },
}
