mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleetwatch_core::Dashboard;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = fleetwatch_config::load_config_or_default();
    let dashboard = build_dashboard(&cli.global, &config)?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &dashboard, &cli.global, &config).await
}

/// Build the dashboard from the config file with CLI flag overrides.
fn build_dashboard(
    global: &cli::GlobalOpts,
    config: &fleetwatch_config::Config,
) -> Result<Dashboard, CliError> {
    let server = match global.server.as_deref() {
        Some(s) => s,
        None => config.server()?,
    };

    let mut transport = config.transport();
    if global.insecure {
        transport.tls = fleetwatch_core::TlsMode::DangerAcceptInvalid;
    } else if let Some(ref ca_path) = global.ca_cert {
        transport.tls = fleetwatch_core::TlsMode::CustomCa(ca_path.clone());
    }
    if let Some(secs) = global.timeout {
        transport.timeout = std::time::Duration::from_secs(secs);
    }

    let store = fleetwatch_config::default_token_store();
    Ok(Dashboard::new(server, &transport, store)?)
}
