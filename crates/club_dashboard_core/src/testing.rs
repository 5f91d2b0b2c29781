//! In-memory fakes of the ports, shared by the unit tests.

use crate::domain::{
    AskRequest, Author, ChatTurn, HealthStatus, LeaderboardSnapshot, PeriodQuery, Scope,
};
use crate::ports::{BackendReply, BackendService, Clock, DashboardView, PortError, PortResult};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Mutex;

/// A scripted backend. `None` for a canned reply means "transport failure".
pub struct FakeBackend {
    health: Option<u16>,
    leaderboard: Option<BackendReply>,
    refresh: Option<BackendReply>,
    ask: Option<BackendReply>,
    leaderboard_queries: Mutex<Vec<PeriodQuery>>,
    ask_requests: Mutex<Vec<AskRequest>>,
}

impl FakeBackend {
    pub fn offline() -> Self {
        Self {
            health: None,
            leaderboard: None,
            refresh: None,
            ask: None,
            leaderboard_queries: Mutex::new(Vec::new()),
            ask_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_health(status: u16) -> Self {
        Self {
            health: Some(status),
            ..Self::offline()
        }
    }

    pub fn with_leaderboard(status: u16, body: Option<Value>) -> Self {
        Self {
            leaderboard: Some(BackendReply { status, body }),
            ..Self::with_health(200)
        }
    }

    pub fn with_ask(status: u16, body: Option<Value>) -> Self {
        Self {
            ask: Some(BackendReply { status, body }),
            ..Self::with_health(200)
        }
    }

    pub fn and_refresh(mut self, status: u16, body: Option<Value>) -> Self {
        self.refresh = Some(BackendReply { status, body });
        self
    }

    pub fn leaderboard_queries(&self) -> Vec<PeriodQuery> {
        self.leaderboard_queries.lock().unwrap().clone()
    }

    pub fn ask_requests(&self) -> Vec<AskRequest> {
        self.ask_requests.lock().unwrap().clone()
    }

    fn canned(reply: &Option<BackendReply>) -> PortResult<BackendReply> {
        reply
            .clone()
            .ok_or_else(|| PortError::Transport("connection refused".to_string()))
    }
}

#[async_trait]
impl BackendService for FakeBackend {
    async fn health(&self) -> PortResult<u16> {
        self.health
            .ok_or_else(|| PortError::Transport("connection refused".to_string()))
    }

    async fn leaderboard(&self, period: &PeriodQuery) -> PortResult<BackendReply> {
        self.leaderboard_queries.lock().unwrap().push(*period);
        Self::canned(&self.leaderboard)
    }

    async fn refresh(&self) -> PortResult<BackendReply> {
        Self::canned(&self.refresh)
    }

    async fn ask(&self, request: &AskRequest) -> PortResult<BackendReply> {
        self.ask_requests.lock().unwrap().push(request.clone());
        Self::canned(&self.ask)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Status(HealthStatus),
    Members(LeaderboardSnapshot),
    Leaderboard(LeaderboardSnapshot),
    Unavailable(Scope),
    ActiveFilter(Scope),
    Turn(Author, String),
    TypingShown,
    TypingHidden,
    Notice(String),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl DashboardView for RecordingView {
    fn set_status(&self, status: HealthStatus) {
        self.record(ViewEvent::Status(status));
    }
    fn render_members(&self, snapshot: &LeaderboardSnapshot) {
        self.record(ViewEvent::Members(snapshot.clone()));
    }
    fn render_leaderboard(&self, snapshot: &LeaderboardSnapshot) {
        self.record(ViewEvent::Leaderboard(snapshot.clone()));
    }
    fn leaderboard_unavailable(&self, scope: Scope) {
        self.record(ViewEvent::Unavailable(scope));
    }
    fn set_active_filter(&self, scope: Scope) {
        self.record(ViewEvent::ActiveFilter(scope));
    }
    fn append_turn(&self, turn: &ChatTurn, markup: &str) {
        self.record(ViewEvent::Turn(turn.author, markup.to_string()));
    }
    fn show_typing(&self) {
        self.record(ViewEvent::TypingShown);
    }
    fn hide_typing(&self) {
        self.record(ViewEvent::TypingHidden);
    }
    fn notice(&self, text: &str) {
        self.record(ViewEvent::Notice(text.to_string()));
    }
}

pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        Self(Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
