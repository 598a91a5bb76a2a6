//! Agent command handlers.

use tabled::Tabled;

use fleetwatch_core::{Agent, Dashboard, display};

use crate::cli::{AgentsArgs, AgentsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl AgentRow {
    fn from_agent(a: &Agent, color: bool) -> Self {
        Self {
            id: display::short_id(&a.id),
            hostname: a.hostname.clone(),
            os: display::os_label(&a.os, a.os_version.as_deref()),
            ip: display::ip_label(a.ip.as_deref()),
            status: output::agent_status_label(a.status, color),
            last_seen: display::local_time(a.last_seen),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn agent_detail(a: &Agent) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID:          {}\n", a.id));
    out.push_str(&format!("Hostname:    {}\n", a.hostname));
    out.push_str(&format!(
        "OS:          {}\n",
        display::os_label(&a.os, a.os_version.as_deref())
    ));
    out.push_str(&format!("IP:          {}\n", display::ip_label(a.ip.as_deref())));
    out.push_str(&format!("Status:      {}\n", a.status));
    out.push_str(&format!("Last seen:   {}\n", display::local_time(a.last_seen)));
    out.push_str(&format!(
        "Registered:  {}",
        display::local_time(a.registered_at)
    ));
    if let Some(ref metadata) = a.metadata {
        if !metadata.is_empty() {
            out.push_str("\nMetadata:\n");
            for (key, value) in metadata {
                out.push_str(&format!("  {key}: {value}\n"));
            }
            out.pop();
        }
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: AgentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        AgentsCommand::List => {
            let list = dashboard.agents().await?;
            let out = output::render_list(
                &global.output,
                &list.agents,
                |a| AgentRow::from_agent(a, color),
                |a| a.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgentsCommand::Show { agent_id } => {
            let agent = dashboard.agent(&agent_id).await?;
            let out =
                output::render_single(&global.output, &*agent, agent_detail, |a| a.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
