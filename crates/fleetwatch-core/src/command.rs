// ── Dashboard commands ──

/// Mutating actions the dashboard can dispatch against the fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request an on-demand compliance scan on one agent.
    TriggerScan { agent_id: String },
    /// Request a scan across every registered agent.
    TriggerScanAll,
}

impl Command {
    pub fn scan(agent_id: impl Into<String>) -> Self {
        Self::TriggerScan {
            agent_id: agent_id.into(),
        }
    }
}

/// Outcome of a successfully dispatched [`Command`].
///
/// `invalidated` lists the cache keys dropped so the next read re-fetches
/// data the command may have changed. A failed dispatch produces no receipt
/// and leaves every cache entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReceipt {
    pub invalidated: Vec<String>,
}

impl CommandReceipt {
    pub fn new(mut invalidated: Vec<String>) -> Self {
        invalidated.sort();
        invalidated.dedup();
        Self { invalidated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_sorts_and_dedups_keys() {
        let receipt = CommandReceipt::new(vec![
            "reports:all".into(),
            "agents".into(),
            "reports:all".into(),
        ]);
        assert_eq!(receipt.invalidated, vec!["agents", "reports:all"]);
    }
}
