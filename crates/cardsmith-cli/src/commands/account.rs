//! Account and session commands.

use crate::cli::{AccountAction, AccountArgs, LoginArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use cardsmith_domain::traits::UserStore;
use std::path::Path;

/// Execute an account command.
pub fn execute_account<S>(args: AccountArgs, store: &mut S, formatter: &Formatter) -> Result<()>
where
    S: UserStore,
    CliError: From<S::Error>,
{
    match args.action {
        AccountAction::Create { username, password } => {
            store.create_user(&username, &password)?;
            println!(
                "{}",
                formatter.success(&format!("Created user '{}'", username.trim()))
            );
        }
    }
    Ok(())
}

/// Verify credentials and record the session user.
pub fn execute_login<S>(
    args: LoginArgs,
    store: &S,
    config: &mut Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()>
where
    S: UserStore,
    CliError: From<S::Error>,
{
    if !store.verify_credentials(&args.username, &args.password)? {
        return Err(CliError::AuthenticationFailed);
    }

    let username = args.username.trim().to_string();
    config.session.username = Some(username.clone());
    config.save_to(config_path)?;

    println!("{}", formatter.success(&format!("Logged in as {}", username)));
    Ok(())
}

/// Clear the session user.
pub fn execute_logout(config: &mut Config, config_path: &Path, formatter: &Formatter) -> Result<()> {
    match config.session.username.take() {
        Some(username) => {
            config.save_to(config_path)?;
            println!("{}", formatter.success(&format!("Logged out {}", username)));
        }
        None => println!("{}", formatter.info("Not logged in")),
    }
    Ok(())
}

/// Print the session user.
pub fn execute_whoami(config: &Config, formatter: &Formatter) -> Result<()> {
    match &config.session.username {
        Some(username) => println!("{}", username),
        None => println!("{}", formatter.info("Not logged in")),
    }
    Ok(())
}
