//! Command handlers, one module per resource area.

pub mod agents;
pub mod reports;
pub mod scan;
pub mod session;

use fleetwatch_config::Config;
use fleetwatch_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(
    command: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
    config: &Config,
) -> Result<(), CliError> {
    match command {
        Command::Login(args) => session::login(dashboard, args, global, config).await,
        Command::Logout => session::logout(dashboard, global),
        Command::Agents(args) => agents::handle(dashboard, args, global).await,
        Command::Reports(args) => {
            reports::handle(dashboard, args, global, &config.defaults).await
        }
        Command::Scan(args) => scan::handle(dashboard, args, global).await,
    }
}
