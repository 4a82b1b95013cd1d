//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Magicbook - illustrated, narrated books from a prompt
#[derive(Parser, Debug)]
#[command(name = "magicbook")]
#[command(about = "Generate illustrated, narrated books from a prompt", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the layered lookup)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a book from a prompt and fill in its media
    Generate {
        /// What the book should be about
        prompt: String,

        /// Narration voice (defaults to the configured voice)
        #[arg(long)]
        voice: Option<String>,
    },

    /// List stored books, newest first
    List {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate a stored book's media and write it to a directory
    Render {
        /// Book key (`book:1a2b3c4d` or `1a2b3c4d`)
        key: String,

        /// Output directory
        #[arg(long, short, default_value = ".")]
        output: PathBuf,

        /// Narration voice (defaults to the configured voice)
        #[arg(long)]
        voice: Option<String>,
    },

    /// Remove a cached image or narration clip
    Evict {
        /// Text the media was generated from
        text: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
    /// Book keys only (for scripting)
    KeysOnly,
}
