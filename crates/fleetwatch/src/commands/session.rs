//! Login and logout handlers.

use std::io::{self, IsTerminal, Write};

use secrecy::SecretString;

use fleetwatch_core::Dashboard;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;

pub async fn login(
    dashboard: &Dashboard,
    args: LoginArgs,
    global: &GlobalOpts,
    config: &fleetwatch_config::Config,
) -> Result<(), CliError> {
    let username = match args.username.or_else(|| config.username.clone()) {
        Some(u) => u,
        None => prompt_username()?,
    };

    let password = match args.password {
        Some(p) => SecretString::from(p),
        None => SecretString::from(rpassword::prompt_password("Password: ")?),
    };

    dashboard.login(&username, &password).await?;

    if !global.quiet {
        eprintln!("Logged in as {username}");
    }
    Ok(())
}

pub fn logout(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    dashboard.logout()?;

    if !global.quiet {
        eprintln!("Logged out");
    }
    Ok(())
}

fn prompt_username() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "required in non-interactive mode (pass --username)".into(),
        });
    }

    eprint!("Username: ");
    io::stderr().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    let username = username.trim().to_owned();

    if username.is_empty() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(username)
}
