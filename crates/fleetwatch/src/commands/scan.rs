//! Scan command handler.

use fleetwatch_core::{Command as CoreCommand, Dashboard};

use crate::cli::{GlobalOpts, ScanArgs};
use crate::error::CliError;

pub async fn handle(
    dashboard: &Dashboard,
    args: ScanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (command, target) = if args.all {
        (CoreCommand::TriggerScanAll, "all agents".to_owned())
    } else {
        // clap's arg group guarantees one of the two is present.
        let agent_id = args.agent_id.ok_or_else(|| CliError::Validation {
            field: "agent_id".into(),
            reason: "an agent id or --all is required".into(),
        })?;
        let target = format!("agent {agent_id}");
        (CoreCommand::scan(agent_id), target)
    };

    let receipt = dashboard.execute(command).await?;

    if !global.quiet {
        eprintln!("Scan requested for {target}");
        if !receipt.invalidated.is_empty() {
            eprintln!("Stale data dropped: {}", receipt.invalidated.join(", "));
        }
    }
    Ok(())
}
