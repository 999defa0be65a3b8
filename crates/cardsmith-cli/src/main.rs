//! Cardsmith CLI - Turn study material into flashcards with a local LLM.

use cardsmith_cli::commands;
use cardsmith_cli::{Cli, Command, Config, Formatter};
use cardsmith_store::SqliteStore;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over -v.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> cardsmith_cli::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
        Command::Logout => {
            commands::execute_logout(&mut config, &config_path, &formatter)?;
        }
        Command::Whoami => {
            commands::execute_whoami(&config, &formatter)?;
        }
        Command::Generate(args) => {
            commands::execute_generate(args, &config, &formatter)?;
        }
        Command::Account(args) => {
            let mut store = commands::open_store(&config)?;
            commands::execute_account(args, &mut store, &formatter)?;
        }
        Command::Login(args) => {
            let store = commands::open_store(&config)?;
            commands::execute_login(args, &store, &mut config, &config_path, &formatter)?;
        }
        Command::Decks => {
            let (owner, store) = open_user_store(&config)?;
            commands::execute_decks(&store, &owner, &formatter)?;
        }
        Command::Show(args) => {
            let (owner, store) = open_user_store(&config)?;
            commands::execute_show(args, &store, &owner, &formatter)?;
        }
        Command::Delete(args) => {
            let (owner, mut store) = open_user_store(&config)?;
            commands::execute_delete(args, &mut store, &owner, &formatter)?;
        }
        Command::Review(args) => {
            let (owner, store) = open_user_store(&config)?;
            commands::execute_review(args, &store, &owner, &formatter)?;
        }
        Command::Export(args) => {
            let (owner, store) = open_user_store(&config)?;
            commands::execute_export(args, &store, &owner, &formatter)?;
        }
        Command::Import(args) => {
            let (owner, mut store) = open_user_store(&config)?;
            commands::execute_import(args, &mut store, &owner, &formatter)?;
        }
    }

    Ok(())
}

/// The session user and an open store; deck commands need both.
fn open_user_store(config: &Config) -> cardsmith_cli::Result<(String, SqliteStore)> {
    let owner = config.session.require_user()?.to_string();
    let store = commands::open_store(config)?;
    Ok((owner, store))
}
