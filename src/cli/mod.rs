//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::OutputFormat;
use crate::domain::Priority;

/// Fathom to Linear - turn Fathom meeting summary emails into Linear issues.
#[derive(Parser, Debug)]
#[command(name = "fathom-linear")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format: markdown, html, json, or table.
    #[arg(short, long, default_value = "markdown", global = true)]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract action items and next steps from a saved mail page.
    Extract {
        /// Saved HTML of the mail page.
        file: PathBuf,

        /// Use this text instead of extracting from the page.
        #[arg(short, long)]
        selection: Option<String>,

        /// Read the file immediately instead of waiting for it.
        #[arg(long)]
        no_wait: bool,
    },

    /// Convert edited HTML notes to Linear markdown.
    Convert {
        /// HTML fragment to convert.
        file: PathBuf,
    },

    /// Compose a Linear issue from edited notes.
    Draft {
        /// Edited HTML notes.
        file: PathBuf,

        /// Mail page the notes came from (adds source information).
        #[arg(short, long)]
        email: Option<PathBuf>,

        /// Issue title (defaults to the meeting title of --email).
        #[arg(short, long)]
        title: Option<String>,

        /// Team id or name (defaults to the last used team).
        #[arg(long)]
        team: Option<String>,

        /// Assignee (defaults to the last used assignee).
        #[arg(short, long)]
        assignee: Option<String>,

        /// Priority: urgent, high, medium, low.
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Open the prefilled issue link in the browser.
        #[arg(long)]
        open_url: bool,
    },

    /// List the configured teams.
    Teams,

    /// Inspect or change remembered preferences.
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Print one preference.
    Get {
        key: String,
    },
    /// Store one preference.
    Set {
        key: String,
        value: String,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Write the default configuration file if it is missing.
    Init,
    /// Print the configuration file path.
    Path,
    /// Print the effective configuration.
    Show,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
