//! crates/club_dashboard_core/src/leaderboard.rs
//!
//! Fetches and normalizes leaderboard snapshots.
//!
//! Two views read the same endpoint with different truncation:
//! the members view keeps at most `members_limit` rows of the Month scope,
//! the leaderboard view keeps every row for the selected scope. In both
//! cases the aggregates cover only the rows that were kept.

use crate::domain::{LeaderboardSnapshot, Scope};
use crate::normalize::{normalize_rows, MEMBERS_VIEW_LIMIT};
use crate::period;
use crate::ports::{BackendService, PortError, PortResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct LeaderboardService {
    backend: Arc<dyn BackendService>,
    members_limit: usize,
}

impl LeaderboardService {
    pub fn new(backend: Arc<dyn BackendService>) -> Self {
        Self::with_members_limit(backend, MEMBERS_VIEW_LIMIT)
    }

    pub fn with_members_limit(backend: Arc<dyn BackendService>, members_limit: usize) -> Self {
        Self {
            backend,
            members_limit,
        }
    }

    /// Full leaderboard for `scope`. Any failure yields an empty snapshot.
    pub async fn fetch_leaderboard(&self, scope: Scope, now: DateTime<Utc>) -> LeaderboardSnapshot {
        self.try_fetch(scope, now, None)
            .await
            .unwrap_or_else(|_| LeaderboardSnapshot::empty(scope))
    }

    /// Month leaderboard cut to the members-view limit. Any failure yields an empty snapshot.
    pub async fn fetch_members(&self, now: DateTime<Utc>) -> LeaderboardSnapshot {
        self.try_fetch(Scope::Month, now, Some(self.members_limit))
            .await
            .unwrap_or_else(|_| LeaderboardSnapshot::empty(Scope::Month))
    }

    /// Like [`fetch_leaderboard`](Self::fetch_leaderboard) but reports failures,
    /// so callers can tell "no rows" from "could not load".
    pub async fn try_fetch(
        &self,
        scope: Scope,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> PortResult<LeaderboardSnapshot> {
        let query = period::resolve(scope, now);
        debug!(?query, "Fetching leaderboard");

        let reply = self.backend.leaderboard(&query).await.map_err(|e| {
            warn!("Leaderboard fetch for {} failed: {}", scope, e);
            e
        })?;

        if !reply.is_success() {
            warn!("Leaderboard fetch for {} returned HTTP {}", scope, reply.status);
        }

        let body = reply.body.ok_or_else(|| {
            warn!("Leaderboard reply for {} was not JSON", scope);
            PortError::Decode("leaderboard body is not JSON".to_string())
        })?;

        let rows = normalize_rows(&body, limit);
        debug!("Leaderboard {} normalized to {} rows", scope, rows.len());
        Ok(LeaderboardSnapshot::from_rows(scope, rows))
    }
}
