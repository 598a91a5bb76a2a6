// fleetwatch-api: Async Rust client for the fleet-management REST API.

pub mod client;
pub mod error;
pub mod token;
pub mod transport;
pub mod types;

pub use client::FleetClient;
pub use error::Error;
pub use token::TokenCell;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    Agent, AgentList, AgentStatus, Report, ReportDetail, ReportList, ReportQuery, ReportStatus,
    TokenResponse,
};
