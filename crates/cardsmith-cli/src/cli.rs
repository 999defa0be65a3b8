//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cardsmith CLI - Turn notes, PDFs and scans into study flashcards.
#[derive(Debug, Parser)]
#[command(name = "cardsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CARDSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage user accounts
    Account(AccountArgs),

    /// Log in as an existing user
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Generate flashcards from documents
    Generate(GenerateArgs),

    /// List your saved decks
    Decks,

    /// Show the cards of a deck
    Show(DeckArgs),

    /// Delete a deck
    Delete(DeleteArgs),

    /// Review a deck interactively
    Review(DeckArgs),

    /// Export a deck as a JSON array
    Export(ExportArgs),

    /// Import a deck from a JSON array
    Import(ImportArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for account management.
#[derive(Debug, Parser)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub action: AccountAction,
}

/// Account actions.
#[derive(Debug, Subcommand)]
pub enum AccountAction {
    /// Create a new user
    Create {
        /// Username
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
}

/// Arguments for the login command.
#[derive(Debug, Parser)]
pub struct LoginArgs {
    /// Username
    pub username: String,

    /// Password
    #[arg(short, long)]
    pub password: String,
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Files to read (.txt, .pdf, images)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Save the generated cards as a deck with this name
    #[arg(short, long)]
    pub save: Option<String>,

    /// Also save when the engine fails or Ctrl-C stops the run part way through
    #[arg(long, requires = "save")]
    pub save_partial: bool,

    /// Maximum chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Drop cards whose question repeats an earlier one
    #[arg(long)]
    pub dedupe: bool,

    /// Model to use instead of the configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Chat template for the model (phi3, chatml, llama3)
    #[arg(short, long)]
    pub template: Option<String>,
}

/// Arguments naming a single deck.
#[derive(Debug, Parser)]
pub struct DeckArgs {
    /// Deck ID
    pub id: String,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Deck ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Deck ID
    pub id: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// JSON file with `[{"question": ..., "answer": ...}]`
    pub file: PathBuf,

    /// Name of the new deck
    #[arg(short, long)]
    pub name: String,
}

/// Arguments for configuration commands.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Generator settings to start from (default, compact, thorough)
        #[arg(long, default_value = "default")]
        preset: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
