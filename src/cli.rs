//! CLI definitions for Clarify.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Clarify CLI.
#[derive(Parser)]
#[command(name = "clarify")]
#[command(about = "Simplify, summarize or bionic-read text in a page, reversibly")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.clarify/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Select text in a saved page and transform it
    Transform {
        /// HTML page to read
        #[arg(short, long)]
        input: PathBuf,

        /// Text to select (first occurrence)
        #[arg(short, long)]
        select: String,

        /// simplify, summarize or bionic-read
        #[arg(short, long, default_value = "simplify")]
        mode: String,

        /// Splice the result into the page
        #[arg(long)]
        apply: bool,

        /// Where to write the modified page
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore every transformed region in a saved page
    Restore {
        /// HTML page to read
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the restored page (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask a question about a saved page
    Ask {
        /// HTML page to read
        #[arg(short, long)]
        input: PathBuf,

        /// The question
        question: String,
    },

    /// Manage the API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum KeyAction {
    /// Save a new API key
    Set {
        /// The key
        key: String,
    },

    /// Show where the current key comes from
    Show,

    /// Remove the saved key
    Clear,
}
