//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Switchboard - resilient multi-provider LLM text generation
#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(about = "Resilient multi-provider LLM text generation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate text from a prompt
    Generate(GenerateArgs),

    /// Probe providers and show estimated usage
    Usage {
        /// Providers to probe (defaults to all)
        #[arg(long = "provider")]
        provider: Vec<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Arguments for `generate`
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// The user prompt
    pub prompt: String,

    /// Stored preference such as `gemini:gemini-2.5-flash`
    #[arg(long, default_value = "groq")]
    pub provider: String,

    /// Model, overriding any model in `--provider`
    #[arg(long)]
    pub model: Option<String>,

    /// System instruction
    #[arg(long)]
    pub system: Option<String>,

    /// Ask for a JSON object response
    #[arg(long)]
    pub json: bool,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
