//! crates/club_dashboard_core/src/ports.rs
//!
//! Defines the contracts (traits) between the dashboard core and the outside
//! world. The backend and the display surface are both external
//! collaborators; the core only ever talks to them through these traits.

use crate::domain::{AskRequest, ChatTurn, HealthStatus, LeaderboardSnapshot, PeriodQuery, Scope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The request never produced an HTTP response (DNS, refused, timeout, ...).
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Could not decode response: {0}")]
    Decode(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// What came back from the backend: the status and, if it parsed, the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl BackendReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait BackendService: Send + Sync {
    /// `GET {base}/health/`, returning the HTTP status.
    async fn health(&self) -> PortResult<u16>;

    /// `GET {base}/strava/leaderboard` with the period as query parameters.
    async fn leaderboard(&self, period: &PeriodQuery) -> PortResult<BackendReply>;

    /// `POST {base}/strava/refresh`.
    async fn refresh(&self) -> PortResult<BackendReply>;

    /// `GET {base}/strava/ask` with the assembled query parameters.
    async fn ask(&self, request: &AskRequest) -> PortResult<BackendReply>;
}

/// The thin view-update surface the controller drives.
pub trait DashboardView: Send + Sync {
    fn set_status(&self, status: HealthStatus);
    fn render_members(&self, snapshot: &LeaderboardSnapshot);
    fn render_leaderboard(&self, snapshot: &LeaderboardSnapshot);
    /// The leaderboard fetch failed; show the "unavailable" state.
    fn leaderboard_unavailable(&self, scope: Scope);
    fn set_active_filter(&self, scope: Scope);
    /// `markup` is the sanitized rendering of `turn.text`.
    fn append_turn(&self, turn: &ChatTurn, markup: &str);
    fn show_typing(&self);
    fn hide_typing(&self);
    /// Free-form text outside the chat transcript (help, command errors).
    fn notice(&self, text: &str);
}

/// Source of "now" for period resolution.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
