//! crates/club_dashboard_core/src/domain.rs
//!
//! Defines the pure, core data structures for the dashboard.
//! These structs are independent of any transport or display technology.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Leaderboard
//=========================================================================================

/// The leaderboard aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Week,
    Month,
    Year,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Week => "week",
            Scope::Month => "month",
            Scope::Year => "year",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Scope::Week),
            "month" => Ok(Scope::Month),
            "year" => Ok(Scope::Year),
            other => Err(format!("unknown scope '{}'", other)),
        }
    }
}

/// Query parameters for one leaderboard request, computed fresh from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodQuery {
    pub scope: Scope,
    /// Calendar year for Month/Year, ISO week-year for Week.
    pub year: i32,
    /// 1-based calendar month, Month scope only.
    pub month: Option<u32>,
    /// ISO-8601 week number, Week scope only.
    pub iso_week: Option<u32>,
}

impl PeriodQuery {
    /// The query string pairs in the order the backend expects them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("scope", self.scope.to_string()), ("year", self.year.to_string())];
        if let Some(month) = self.month {
            pairs.push(("month", month.to_string()));
        }
        if let Some(week) = self.iso_week {
            pairs.push(("week", week.to_string()));
        }
        pairs
    }
}

/// Podium decoration for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Gold => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
        }
    }
}

/// A single normalized leaderboard entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    /// 1-based position in the normalized list.
    pub rank: usize,
    pub display_name: String,
    pub total_distance_km: f64,
    pub activity_count: u64,
}

impl LeaderboardRow {
    pub fn medal(&self) -> Option<Medal> {
        Medal::for_rank(self.rank)
    }

    /// First character of the display name, used for the avatar bubble.
    pub fn avatar_initial(&self) -> Option<char> {
        self.display_name.chars().next()
    }

    /// Distance rounded to two decimals for display.
    pub fn distance_label(&self) -> String {
        format!("{:.2}", self.total_distance_km)
    }
}

/// An immutable normalized leaderboard result for one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardSnapshot {
    pub scope: Scope,
    pub rows: Vec<LeaderboardRow>,
    pub aggregate_distance_km: f64,
    pub aggregate_activities: u64,
    pub member_count: usize,
}

impl LeaderboardSnapshot {
    /// Builds a snapshot whose aggregates cover exactly the given rows.
    pub fn from_rows(scope: Scope, rows: Vec<LeaderboardRow>) -> Self {
        let aggregate_distance_km = rows.iter().map(|r| r.total_distance_km).sum();
        let aggregate_activities = rows.iter().map(|r| r.activity_count).sum();
        let member_count = rows.len();
        Self {
            scope,
            rows,
            aggregate_distance_km,
            aggregate_activities,
            member_count,
        }
    }

    pub fn empty(scope: Scope) -> Self {
        Self::from_rows(scope, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//=========================================================================================
// Chat
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
}

/// One entry of the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub author: Author,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            author: Author::Bot,
            text: text.into(),
        }
    }
}

/// Opaque correlation token sent with every chat query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub const PREFIX: &'static str = "session_";

    /// Derives the id from the moment the controller started.
    pub fn from_start_time(started_at: DateTime<Utc>) -> Self {
        Self(format!("{}{}", Self::PREFIX, started_at.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional narrowing filters attached to a chat query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatFilters {
    pub member: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

/// A fully assembled `/strava/ask` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub query: String,
    pub with_answer: bool,
    pub session_id: SessionId,
    pub member: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl AskRequest {
    /// Query string pairs; filters are only present when they carry a value.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("query", self.query.clone()),
            ("with_answer", self.with_answer.to_string()),
            ("session_id", self.session_id.to_string()),
        ];
        let filters = [
            ("member", &self.member),
            ("month", &self.month),
            ("year", &self.year),
        ];
        for (key, value) in filters {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }
        pairs
    }
}

/// The normalized answer extracted from a loosely shaped backend reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerPayload {
    pub text: String,
    pub reference_count: usize,
}

//=========================================================================================
// Backend status
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Error,
    Offline,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "API OK",
            HealthStatus::Error => "API Error",
            HealthStatus::Offline => "Offline",
        }
    }
}

/// Counts reported by a successful `/strava/refresh`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: u64,
    pub skipped: u64,
}
