//! Clap derive structures for the `fleetwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fleetwatch -- monitoring dashboard for a compliance-agent fleet
#[derive(Debug, Parser)]
#[command(
    name = "fleetwatch",
    version,
    about = "Monitor compliance agents and scan results from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Dashboard API server base URL
    #[arg(long, short = 's', env = "FLEETWATCH_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLEETWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FLEETWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM)
    #[arg(long, env = "FLEETWATCH_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "FLEETWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// End the session and discard the stored token
    Logout,

    /// Inspect registered agents
    #[command(alias = "ag", alias = "a")]
    Agents(AgentsArgs),

    /// List and inspect compliance reports
    #[command(alias = "rep", alias = "r")]
    Reports(ReportsArgs),

    /// Trigger on-demand compliance scans
    Scan(ScanArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted if omitted)
    #[arg(long, short = 'u', env = "FLEETWATCH_USERNAME")]
    pub username: Option<String>,

    /// Password (prompted if omitted; prefer the prompt over this flag)
    #[arg(long, env = "FLEETWATCH_PASSWORD", hide_env = true)]
    pub password: Option<String>,
}

// ── Agents ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AgentsArgs {
    #[command(subcommand)]
    pub command: AgentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AgentsCommand {
    /// List all registered agents
    #[command(alias = "ls")]
    List,

    /// Show one agent in detail
    Show {
        /// Agent id
        agent_id: String,
    },
}

// ── Reports ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// List recent reports, fleet-wide or per agent
    #[command(alias = "ls")]
    List {
        /// Only reports from this agent
        #[arg(long, short = 'a')]
        agent: Option<String>,

        /// Maximum number of reports to return
        #[arg(long, short = 'n')]
        limit: Option<u32>,
    },

    /// Show one report with its full payload
    Show {
        /// Report id
        report_id: String,
    },
}

// ── Scan ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ScanArgs {
    /// Agent to scan
    pub agent_id: Option<String>,

    /// Scan every registered agent
    #[arg(long)]
    pub all: bool,
}
