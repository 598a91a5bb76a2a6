// ── Display formatting ──
//
// Rendering rules shared by every presentation surface, so a score or a
// missing field reads identically in a table, a detail view, and plain
// output.

use chrono::{DateTime, Local, Utc};

/// Render a 0.0..=1.0 compliance score as a percentage with one decimal.
pub fn score_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Scan mode label; agents that never reported a mode ran a standard scan.
pub fn mode_label(mode: Option<&str>) -> String {
    match mode {
        Some(m) if !m.is_empty() => m.to_owned(),
        _ => "standard".to_owned(),
    }
}

/// Agent IP address, or a placeholder when none was reported.
pub fn ip_label(ip: Option<&str>) -> String {
    match ip {
        Some(ip) if !ip.is_empty() => ip.to_owned(),
        _ => "N/A".to_owned(),
    }
}

/// `os` plus version when known, e.g. `linux 6.8`.
pub fn os_label(os: &str, os_version: Option<&str>) -> String {
    match os_version {
        Some(v) if !v.is_empty() => format!("{os} {v}"),
        _ => os.to_owned(),
    }
}

/// Timestamps are stored in UTC and rendered in the viewer's timezone.
pub fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Abbreviate long identifiers for table columns.
///
/// Truncation counts characters, not bytes; ids are server-supplied and
/// not guaranteed to be ASCII.
pub fn short_id(id: &str) -> String {
    match id.char_indices().nth(8) {
        Some((idx, _)) => format!("{}...", &id[..idx]),
        None => id.to_owned(),
    }
}
