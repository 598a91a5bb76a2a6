//! Report command handlers.

use tabled::Tabled;

use fleetwatch_config::Defaults;
use fleetwatch_core::{Dashboard, Report, ReportDetail, display};

use crate::cli::{GlobalOpts, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Score")]
    score: String,
}

impl ReportRow {
    fn from_report(r: &Report, color: bool) -> Self {
        Self {
            id: display::short_id(&r.id),
            agent: display::short_id(&r.agent_id),
            time: display::local_time(r.timestamp),
            mode: display::mode_label(r.mode.as_deref()),
            status: output::report_status_label(r.overall_status, color),
            score: display::score_percent(r.overall_score),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn report_detail(r: &ReportDetail) -> String {
    let payload = serde_json::to_string_pretty(&r.payload)
        .unwrap_or_else(|_| "(unrenderable payload)".into());

    format!(
        "ID:      {}\n\
         Agent:   {}\n\
         Time:    {}\n\
         Mode:    {}\n\
         Status:  {}\n\
         Score:   {}\n\
         Payload:\n{payload}",
        r.id,
        r.agent_id,
        display::local_time(r.timestamp),
        display::mode_label(r.mode.as_deref()),
        r.overall_status,
        display::score_percent(r.overall_score),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: ReportsArgs,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ReportsCommand::List { agent, limit } => {
            let limit = limit.or(Some(defaults.report_limit));
            let list = dashboard.reports(agent.as_deref(), limit).await?;
            let out = output::render_list(
                &global.output,
                &list.reports,
                |r| ReportRow::from_report(r, color),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Show { report_id } => {
            let report = dashboard.report(&report_id).await?;
            let out =
                output::render_single(&global.output, &report, report_detail, |r| r.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
