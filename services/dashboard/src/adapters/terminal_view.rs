//! services/dashboard/src/adapters/terminal_view.rs
//!
//! A `DashboardView` that writes plain text to any `Write` sink (stdout in the
//! binary). Chat turns are printed as their raw text; the sanitized markup is
//! only logged, since a terminal has no use for anchors or `<br>`.

use club_dashboard_core::domain::{Author, ChatTurn, HealthStatus, LeaderboardSnapshot, Scope};
use club_dashboard_core::ports::DashboardView;
use std::io::Write;
use std::sync::Mutex;
use tracing::{debug, warn};

pub struct TerminalView<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consumes the view and hands back the sink.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

/// Formats the members view: one card line per member plus the totals.
pub fn members_lines(snapshot: &LeaderboardSnapshot) -> Vec<String> {
    let mut lines = vec![format!(
        "== Members ({}) == members: {} | distance: {:.0} km | activities: {}",
        snapshot.scope,
        snapshot.member_count,
        snapshot.aggregate_distance_km,
        snapshot.aggregate_activities
    )];
    lines.extend(snapshot.rows.iter().map(|row| {
        format!(
            "({}) {:<20} {:>8} km  {} activities",
            row.avatar_initial().unwrap_or(' '),
            row.display_name,
            row.distance_label(),
            row.activity_count
        )
    }));
    lines
}

/// Formats the leaderboard view, medals included.
pub fn leaderboard_lines(snapshot: &LeaderboardSnapshot) -> Vec<String> {
    let mut lines = vec![format!("== Leaderboard ({}) ==", snapshot.scope)];
    if snapshot.is_empty() {
        lines.push("(no entries)".to_string());
    }
    lines.extend(snapshot.rows.iter().map(|row| {
        let medal = row.medal().map(|m| m.as_str()).unwrap_or("");
        format!(
            "#{:<3} {:<6} ({}) {:<20} {:>8} km  {} runs",
            row.rank,
            medal,
            row.avatar_initial().unwrap_or(' '),
            row.display_name,
            row.distance_label(),
            row.activity_count
        )
    }));
    lines
}

impl<W: Write + Send> DashboardView for TerminalView<W> {
    fn set_status(&self, status: HealthStatus) {
        self.emit(&format!("[status] {}", status.label()));
    }

    fn render_members(&self, snapshot: &LeaderboardSnapshot) {
        self.emit(&members_lines(snapshot).join("\n"));
    }

    fn render_leaderboard(&self, snapshot: &LeaderboardSnapshot) {
        self.emit(&leaderboard_lines(snapshot).join("\n"));
    }

    fn leaderboard_unavailable(&self, scope: Scope) {
        self.emit(&format!("== Leaderboard ({}) ==\nFailed to load leaderboard.", scope));
    }

    fn set_active_filter(&self, scope: Scope) {
        debug!("Active leaderboard filter: {}", scope);
    }

    fn append_turn(&self, turn: &ChatTurn, markup: &str) {
        debug!(markup, "Chat turn rendered");
        let who = match turn.author {
            Author::User => "you",
            Author::Bot => "bot",
        };
        self.emit(&format!("{}> {}", who, turn.text));
    }

    fn show_typing(&self) {
        self.emit("bot is typing...");
    }

    fn hide_typing(&self) {}

    fn notice(&self, text: &str) {
        self.emit(text);
    }
}
