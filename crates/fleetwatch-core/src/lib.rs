// fleetwatch-core: Session, caching, and command logic for the fleet
// monitoring dashboard. Presentation layers (CLI today) depend on this
// crate and never on fleetwatch-api directly.

pub mod cache;
pub mod command;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod session;
pub mod view;

pub use cache::{CacheEntry, ResourceCache};
pub use command::{Command, CommandReceipt};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use session::{MemoryTokenStore, Session, TokenStore};
pub use view::{View, ViewRouter};

// Re-export the wire types presentation layers render.
pub use fleetwatch_api::{
    Agent, AgentList, AgentStatus, Report, ReportDetail, ReportList, ReportStatus, TlsMode,
    TransportConfig,
};
