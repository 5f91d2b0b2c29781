//! crates/club_dashboard_core/src/controller.rs
//!
//! The dashboard's control loop. Each public method is one external trigger
//! (health check, filter change, refresh, send) and runs to completion
//! before the next one starts, so state is plain owned data.
//!
//! Superseded requests are not cancelled: if two leaderboard loads overlap
//! in a host that runs them concurrently, whichever resolves last wins.

use crate::chat::{ChatReply, ChatSession};
use crate::domain::{
    ChatFilters, ChatTurn, HealthStatus, LeaderboardSnapshot, RefreshSummary, Scope, SessionId,
};
use crate::leaderboard::LeaderboardService;
use crate::normalize::{refresh_error_reason, refresh_summary, reports_error_status};
use crate::ports::{BackendService, Clock, DashboardView};
use crate::sanitize;
use std::sync::Arc;
use tracing::{error, info, warn};

const REFRESH_STARTED: &str = "Refreshing data from the sheet...";
const REFRESH_UNREACHABLE: &str = "Could not reach the API. Make sure the backend is running.";
const UNKNOWN_ERROR: &str = "Unknown error";

/// How a `/strava/refresh` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed(RefreshSummary),
    Failed(String),
    Unreachable,
}

impl RefreshOutcome {
    pub fn display_text(&self) -> String {
        match self {
            RefreshOutcome::Refreshed(summary) => format!(
                "Data refreshed. updated={} skipped={}",
                summary.updated, summary.skipped
            ),
            RefreshOutcome::Failed(reason) => format!("Failed to refresh data: {}", reason),
            RefreshOutcome::Unreachable => REFRESH_UNREACHABLE.to_string(),
        }
    }
}

/// Everything a controller needs from its host, passed in explicitly.
pub struct DashboardContext {
    pub backend: Arc<dyn BackendService>,
    pub view: Arc<dyn DashboardView>,
    pub clock: Arc<dyn Clock>,
    pub members_limit: usize,
}

pub struct DashboardController {
    backend: Arc<dyn BackendService>,
    view: Arc<dyn DashboardView>,
    clock: Arc<dyn Clock>,
    leaderboard: LeaderboardService,
    chat: ChatSession,
    filters: ChatFilters,
    active_scope: Scope,
    transcript: Vec<ChatTurn>,
}

impl DashboardController {
    /// Creates the controller and its chat session. The session id is taken
    /// from the clock once, here, and never changes afterwards.
    pub fn new(ctx: DashboardContext) -> Self {
        let session_id = SessionId::from_start_time(ctx.clock.now());
        info!("Dashboard controller started with {}", session_id);
        Self {
            leaderboard: LeaderboardService::with_members_limit(
                ctx.backend.clone(),
                ctx.members_limit,
            ),
            chat: ChatSession::new(ctx.backend.clone(), session_id),
            backend: ctx.backend,
            view: ctx.view,
            clock: ctx.clock,
            filters: ChatFilters::default(),
            active_scope: Scope::Week,
            transcript: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        self.chat.session_id()
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn active_scope(&self) -> Scope {
        self.active_scope
    }

    pub fn set_filters(&mut self, filters: ChatFilters) {
        self.filters = filters;
    }

    pub fn filters_mut(&mut self) -> &mut ChatFilters {
        &mut self.filters
    }

    /// Shows text on the view without adding it to the transcript.
    pub fn notify(&self, text: &str) {
        self.view.notice(text);
    }

    //=====================================================================================
    // Triggers
    //=====================================================================================

    /// Probes `/health/`; on success the initial data is loaded as well.
    pub async fn check_health(&mut self) -> HealthStatus {
        let status = match self.backend.health().await {
            Ok(code) if (200..300).contains(&code) => HealthStatus::Ok,
            Ok(code) => {
                warn!("Health check returned HTTP {}", code);
                HealthStatus::Error
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                HealthStatus::Offline
            }
        };
        self.view.set_status(status);
        if status == HealthStatus::Ok {
            self.load_initial_data().await;
        }
        status
    }

    /// Members view first, then the Month leaderboard.
    pub async fn load_initial_data(&mut self) {
        self.load_members().await;
        self.load_leaderboard(Scope::Month).await;
    }

    pub async fn load_members(&mut self) -> LeaderboardSnapshot {
        let snapshot = self.leaderboard.fetch_members(self.clock.now()).await;
        self.view.render_members(&snapshot);
        snapshot
    }

    /// Loads the full leaderboard for `scope` and marks it as the active filter.
    pub async fn load_leaderboard(&mut self, scope: Scope) -> LeaderboardSnapshot {
        let snapshot = match self.leaderboard.try_fetch(scope, self.clock.now(), None).await {
            Ok(snapshot) => {
                self.view.render_leaderboard(&snapshot);
                snapshot
            }
            Err(e) => {
                error!("Failed to load {} leaderboard: {}", scope, e);
                self.view.leaderboard_unavailable(scope);
                LeaderboardSnapshot::empty(scope)
            }
        };
        self.active_scope = scope;
        self.view.set_active_filter(scope);
        snapshot
    }

    /// A filter button was pressed.
    pub async fn filter_leaderboard(&mut self, scope: Scope) -> LeaderboardSnapshot {
        self.active_scope = scope;
        self.view.set_active_filter(scope);
        self.load_leaderboard(scope).await
    }

    /// Asks the backend to resync its data, reporting progress in the transcript.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        self.push_turn(ChatTurn::bot(REFRESH_STARTED));

        let outcome = match self.backend.refresh().await {
            Ok(reply) if reply.is_success() && !reports_error_status(reply.body.as_ref()) => {
                RefreshOutcome::Refreshed(refresh_summary(reply.body.as_ref()))
            }
            Ok(reply) => {
                warn!("Refresh failed with HTTP {}", reply.status);
                RefreshOutcome::Failed(
                    refresh_error_reason(reply.body.as_ref())
                        .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                )
            }
            Err(e) => {
                warn!("Refresh request failed: {}", e);
                RefreshOutcome::Unreachable
            }
        };

        self.push_turn(ChatTurn::bot(outcome.display_text()));
        if let RefreshOutcome::Refreshed(summary) = &outcome {
            info!("Refresh done: updated={} skipped={}", summary.updated, summary.skipped);
            self.load_initial_data().await;
        }
        outcome
    }

    /// Sends a chat message. Blank input is ignored entirely.
    pub async fn send(&mut self, query: &str) -> Option<ChatReply> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.push_turn(ChatTurn::user(trimmed));
        self.view.show_typing();

        let reply = self.chat.ask(trimmed, &self.filters).await;

        self.view.hide_typing();
        if let Some(reply) = &reply {
            self.push_turn(ChatTurn::bot(reply.display_text()));
        }
        reply
    }

    fn push_turn(&mut self, turn: ChatTurn) {
        let markup = sanitize::render(&turn.text);
        self.view.append_turn(&turn, &markup);
        self.transcript.push(turn);
    }
}
